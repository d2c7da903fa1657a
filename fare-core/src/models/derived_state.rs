use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{RowId, TaxType};

/// Snapshot of the two penalty fields taken during a recalculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Penalties {
    pub airline_penalty: Decimal,
    pub service_fee: Decimal,
}

/// Per-tax-type differences in first-seen order.
///
/// Inserting a type that is already present overwrites its value but keeps
/// its original position. No filtering happens here; display code drops
/// zero entries on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    entries: Vec<(TaxType, Decimal)>,
}

impl TaxBreakdown {
    pub fn insert(
        &mut self,
        tax_type: TaxType,
        difference: Decimal,
    ) {
        match self.entries.iter_mut().find(|(t, _)| *t == tax_type) {
            Some(entry) => entry.1 = difference,
            None => self.entries.push((tax_type, difference)),
        }
    }

    pub fn get(
        &self,
        tax_type: &str,
    ) -> Option<Decimal> {
        self.entries
            .iter()
            .find(|(t, _)| t.as_str() == tax_type)
            .map(|(_, d)| *d)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TaxType, Decimal)> {
        self.entries.iter().map(|(t, d)| (t, *d))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything computed from one snapshot of the form.
///
/// Rebuilt from scratch on every recalculation; there is no identity across
/// recalculations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedState {
    /// New base fare minus old, plus penalties when they apply.
    pub base_fare_diff: Decimal,

    pub tax_breakdown: TaxBreakdown,

    /// Sum of the strictly positive row differences.
    pub overall_tax_diff: Decimal,

    /// Amount owed for the change, never negative.
    pub total_fare_diff: Decimal,

    pub penalties: Penalties,

    /// Each active row's own difference, in registry order.
    pub row_differences: Vec<(RowId, Decimal)>,
}

impl DerivedState {
    pub fn row_difference(
        &self,
        id: RowId,
    ) -> Option<Decimal> {
        self.row_differences
            .iter()
            .find(|(row, _)| *row == id)
            .map(|(_, d)| *d)
    }
}
