//! Application state for the fare calculator.
//!
//! This module holds everything the user has typed plus the most recent
//! derived totals. It is owned by the session; nothing here is global.

use fare_core::{
    CalculatorConfig, DerivedState, RegistryError, RowId, RowRegistry, TaxRow, derive_state,
};
use tracing::debug;

use crate::models::{FareForm, TaxRowForm};

/// The form contents, the active tax rows, and the latest derivation.
#[derive(Debug, Clone)]
pub struct AppState {
    pub form: FareForm,
    pub rows: RowRegistry<TaxRowForm>,
    /// Replaced wholesale by [`AppState::recalculate`]; never patched.
    pub derived: DerivedState,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&CalculatorConfig::default())
    }
}

impl AppState {
    /// Create an empty state with a single tax row.
    pub fn new(config: &CalculatorConfig) -> Self {
        Self {
            form: FareForm::default(),
            rows: RowRegistry::with_limits(config.min_tax_rows, config.max_tax_rows),
            derived: DerivedState::default(),
        }
    }

    /// Coerced snapshot of the active rows, in display order.
    pub fn tax_rows(&self) -> Vec<TaxRow> {
        self.rows.iter().map(|(id, row)| row.to_row(id)).collect()
    }

    /// Recompute the derived totals from the current form contents.
    pub fn recalculate(&mut self) -> &DerivedState {
        let inputs = self.form.to_inputs();
        self.derived = derive_state(&inputs, &self.tax_rows());
        debug!(total = %self.derived.total_fare_diff, "Recalculated fare difference");
        &self.derived
    }

    /// Replace every tax row with `rows`, renumbering from 1.
    ///
    /// Fewer rows than the registry floor are padded with empty rows.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::AtCapacity`] when `rows` exceeds the row
    /// ceiling; the existing rows are left untouched in that case.
    pub fn replace_rows(
        &mut self,
        rows: Vec<TaxRowForm>,
    ) -> Result<(), RegistryError> {
        let max = self.rows.max_rows();
        if rows.len() > max {
            return Err(RegistryError::AtCapacity { max });
        }

        self.rows.reset();
        let floor: Vec<RowId> = self.rows.ids().collect();
        for (index, row) in rows.into_iter().enumerate() {
            let id = match floor.get(index) {
                Some(id) => *id,
                None => self.rows.add_row()?.id,
            };
            if let Some(slot) = self.rows.get_mut(id) {
                *slot = row;
            }
        }
        Ok(())
    }

    /// Clear all fields for starting fresh: one empty row, flexibility `Yes`,
    /// zeroed totals.
    pub fn clear(&mut self) {
        self.form = FareForm::default();
        self.rows.reset();
        self.derived = DerivedState::default();
    }
}

#[cfg(test)]
mod tests {
    use fare_core::{Flexibility, RowId};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{FareField, RowField};

    #[test]
    fn recalculate_reads_form_and_rows() {
        let mut state = AppState::default();
        state.form.set_field(FareField::BaseOldFare, "100");
        state.form.set_field(FareField::BaseNewFare, "150");
        let row = state.rows.get_mut(RowId::FIRST).unwrap();
        row.set_field(RowField::TaxType, "ta");
        row.set_field(RowField::OldFare, "10");
        row.set_field(RowField::NewFare, "15");

        let derived = state.recalculate();

        assert_eq!(derived.total_fare_diff, dec!(55));
        assert_eq!(derived.tax_breakdown.get("TA"), Some(dec!(5)));
    }

    #[test]
    fn replace_rows_renumbers_from_one() {
        let mut state = AppState::default();
        state.rows.add_row().unwrap();
        state.rows.add_row().unwrap();
        let rows = vec![
            TaxRowForm {
                tax_type: "YQ".to_string(),
                old_fare: "10".to_string(),
                new_fare: "25".to_string(),
            },
            TaxRowForm {
                tax_type: "US".to_string(),
                ..Default::default()
            },
        ];

        state.replace_rows(rows).unwrap();

        let ids: Vec<u32> = state.rows.ids().map(RowId::get).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(state.rows.get(RowId::FIRST).unwrap().new_fare, "25");
    }

    #[test]
    fn replace_rows_keeps_the_floor_and_the_ceiling() {
        let mut state = AppState::default();

        state.replace_rows(Vec::new()).unwrap();
        assert_eq!(state.rows.len(), 1);

        let too_many = vec![TaxRowForm::default(); 26];
        assert_eq!(
            state.replace_rows(too_many),
            Err(RegistryError::AtCapacity { max: 25 })
        );
        assert_eq!(state.rows.len(), 1);
    }

    #[test]
    fn clear_restores_defaults() {
        let mut state = AppState::default();
        state.form.flexibility = Flexibility::No;
        state.form.set_field(FareField::AirlinePenalty, "20");
        state.rows.add_row().unwrap();
        state.recalculate();

        state.clear();

        assert_eq!(state.form, FareForm::default());
        assert_eq!(state.rows.len(), 1);
        assert_eq!(state.derived, DerivedState::default());
    }
}
