//! Common utility functions for fare calculations.
//!
//! This module provides the arithmetic and formatting helpers shared by the
//! derivation engine and the summary exporter: checked decimal arithmetic,
//! the isolated-failure wrapper, rounding, and currency formatting.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::error;

/// Errors raised while computing a single derived value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculationError {
    /// A decimal operation exceeded the representable range.
    #[error("arithmetic overflow while computing {0}")]
    Overflow(&'static str),
}

/// Adds two values, reporting overflow as a [`CalculationError`].
pub fn checked_add(
    a: Decimal,
    b: Decimal,
    what: &'static str,
) -> Result<Decimal, CalculationError> {
    a.checked_add(b).ok_or(CalculationError::Overflow(what))
}

/// Subtracts `b` from `a`, reporting overflow as a [`CalculationError`].
pub fn checked_sub(
    a: Decimal,
    b: Decimal,
    what: &'static str,
) -> Result<Decimal, CalculationError> {
    a.checked_sub(b).ok_or(CalculationError::Overflow(what))
}

/// Runs one sub-calculation, falling back to zero if it fails.
///
/// The failure is logged and swallowed so that sibling values can still be
/// computed.
pub fn safe_calculation<F>(
    label: &'static str,
    calculation: F,
) -> Decimal
where
    F: FnOnce() -> Result<Decimal, CalculationError>,
{
    match calculation() {
        Ok(value) => value,
        Err(err) => {
            error!(value = label, error = %err, "Calculation error; defaulting to zero");
            Decimal::ZERO
        }
    }
}

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fare_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fare_core::calculations::common::max;
///
/// assert_eq!(max(dec!(-30.00), dec!(0.00)), dec!(0.00));
/// assert_eq!(max(dec!(55.00), dec!(0.00)), dec!(55.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Formats a value for display: two decimals, no currency symbol.
///
/// Values that round to zero always render as `0.00`, never `-0.00`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fare_core::calculations::common::format_currency;
///
/// assert_eq!(format_currency(dec!(50)), "50.00");
/// assert_eq!(format_currency(dec!(-5.005)), "-5.01");
/// assert_eq!(format_currency(dec!(-0.001)), "0.00");
/// ```
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_half_up(value);
    if rounded.is_zero() {
        return "0.00".to_string();
    }
    format!("{rounded:.2}")
}
