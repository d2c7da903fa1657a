//! Core fare-difference engine.
//!
//! Pure, synchronous building blocks shared by every front end: the coerced
//! input models, the derivation engine, the bounded tax-row registry, the
//! clipboard summary, and the calculator limits.

pub mod calculations;
pub mod config;
pub mod models;
pub mod registry;
pub mod summary;

pub use calculations::{derive_state, format_currency};
pub use config::{CalculatorConfig, ConfigError};
pub use models::*;
pub use registry::{AddedRow, MAX_TAX_ROWS, MIN_TAX_ROWS, RegistryError, RowRegistry};
pub use summary::{SummaryDisplay, build_summary};
