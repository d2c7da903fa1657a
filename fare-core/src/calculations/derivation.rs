//! Derivation of fare-difference totals from one snapshot of the form.
//!
//! # Derived values
//!
//! | Value              | Rule |
//! |--------------------|------|
//! | base fare diff     | new base fare − old base fare, plus airline penalty and service fee when flexibility is `No` |
//! | row difference     | new tax amount − old tax amount, for every active row |
//! | tax breakdown      | row difference keyed by tax type, for typed rows with a non-zero difference (last row wins) |
//! | overall tax diff   | sum of the strictly positive row differences |
//! | total fare diff    | see below, floored at zero |
//!
//! # Total fare difference
//!
//! When the base fare difference is negative (the new fare is cheaper) the
//! base difference is ignored entirely and the total is the penalties plus
//! the overall tax difference. Otherwise it is the base difference plus the
//! overall tax difference. Either way the result is never below zero: a
//! cheaper fare is never refunded against penalties.
//!
//! # Failure isolation
//!
//! Each value is computed with checked arithmetic. A value whose computation
//! fails is logged and replaced with zero; the remaining values are still
//! computed from their own inputs.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fare_core::calculations::derive_state;
//! use fare_core::models::{FareInputs, Flexibility, RowId, TaxRow, TaxType};
//!
//! let inputs = FareInputs {
//!     base_old_fare: dec!(100),
//!     base_new_fare: dec!(150),
//!     flexibility: Flexibility::Yes,
//!     ..Default::default()
//! };
//! let rows = vec![TaxRow {
//!     id: RowId::FIRST,
//!     tax_type: TaxType::normalize("TA"),
//!     old_fare: dec!(10),
//!     new_fare: dec!(15),
//! }];
//!
//! let derived = derive_state(&inputs, &rows);
//!
//! assert_eq!(derived.base_fare_diff, dec!(50));
//! assert_eq!(derived.overall_tax_diff, dec!(5));
//! assert_eq!(derived.total_fare_diff, dec!(55));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{CalculationError, checked_add, checked_sub, max, safe_calculation};
use crate::models::{DerivedState, FareInputs, Penalties, RowId, TaxBreakdown, TaxRow};

/// Intermediate result of the tax-row pass.
struct TaxDifferences {
    breakdown: TaxBreakdown,
    overall: Decimal,
    per_row: Vec<(RowId, Decimal)>,
}

/// Computes the complete derived state for the given inputs and rows.
///
/// Pure apart from logging. `rows` is expected in display order; that order
/// decides which row wins when two rows share a tax type.
pub fn derive_state(
    inputs: &FareInputs,
    rows: &[TaxRow],
) -> DerivedState {
    let penalties = Penalties {
        airline_penalty: inputs.airline_penalty,
        service_fee: inputs.service_fee,
    };

    let base_fare_diff = safe_calculation("base_fare_diff", || base_fare_difference(inputs));

    let taxes = tax_differences(rows);

    let total_fare_diff = safe_calculation("total_fare_diff", || {
        total_fare_difference(base_fare_diff, &penalties, taxes.overall)
    });

    debug!(
        base_fare_diff = %base_fare_diff,
        overall_tax_diff = %taxes.overall,
        total_fare_diff = %total_fare_diff,
        rows = rows.len(),
        "Derived fare difference"
    );

    DerivedState {
        base_fare_diff,
        tax_breakdown: taxes.breakdown,
        overall_tax_diff: taxes.overall,
        total_fare_diff,
        penalties,
        row_differences: taxes.per_row,
    }
}

/// New base fare minus old, with penalties added when flexibility is `No`.
fn base_fare_difference(inputs: &FareInputs) -> Result<Decimal, CalculationError> {
    let diff = checked_sub(inputs.base_new_fare, inputs.base_old_fare, "base_fare_diff")?;

    if !inputs.flexibility.penalties_apply() {
        return Ok(diff);
    }

    let penalties = checked_add(inputs.airline_penalty, inputs.service_fee, "penalties")?;
    checked_add(diff, penalties, "base_fare_diff")
}

/// Walks the rows once, building the breakdown and the positive-only sum.
///
/// A row whose own difference overflows counts as zero; an overflowing sum
/// sets the overall difference to zero without touching the breakdown.
fn tax_differences(rows: &[TaxRow]) -> TaxDifferences {
    let mut breakdown = TaxBreakdown::default();
    let mut per_row = Vec::with_capacity(rows.len());

    for row in rows {
        let diff = safe_calculation("tax_row_diff", || {
            checked_sub(row.new_fare, row.old_fare, "tax_row_diff")
        });

        if !row.tax_type.is_empty() && !diff.is_zero() {
            breakdown.insert(row.tax_type.clone(), diff);
        }

        per_row.push((row.id, diff));
    }

    let overall = safe_calculation("overall_tax_diff", || {
        per_row
            .iter()
            .map(|(_, diff)| *diff)
            .filter(|diff| *diff > Decimal::ZERO)
            .try_fold(Decimal::ZERO, |sum, diff| {
                checked_add(sum, diff, "overall_tax_diff")
            })
    });

    TaxDifferences {
        breakdown,
        overall,
        per_row,
    }
}

/// Applies the floor/fallback policy to produce the amount owed.
fn total_fare_difference(
    base_fare_diff: Decimal,
    penalties: &Penalties,
    overall_tax_diff: Decimal,
) -> Result<Decimal, CalculationError> {
    let unclamped = if base_fare_diff < Decimal::ZERO {
        let charges = checked_add(penalties.airline_penalty, penalties.service_fee, "penalties")?;
        checked_add(charges, overall_tax_diff, "total_fare_diff")?
    } else {
        checked_add(base_fare_diff, overall_tax_diff, "total_fare_diff")?
    };

    Ok(max(unclamped, Decimal::ZERO))
}
