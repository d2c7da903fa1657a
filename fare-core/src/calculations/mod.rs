//! Fare difference calculations.
//!
//! [`derivation`] turns a coerced form snapshot into a [`DerivedState`]; the
//! helpers in [`common`] handle rounding, formatting, and failure isolation.
//!
//! [`DerivedState`]: crate::models::DerivedState

pub mod common;
pub mod derivation;

pub use common::{CalculationError, format_currency};
pub use derivation::derive_state;
