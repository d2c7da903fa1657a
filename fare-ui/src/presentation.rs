//! Headless view model kept in step with the derived state.
//!
//! [`View`] holds the text of every display region the user sees. The
//! derivation engine never touches it; [`View::sync`] projects a
//! [`DerivedState`] onto it after each recalculation. Filtering and sorting
//! of the tax breakdown happen here and only here.

use std::fmt;

use fare_core::{
    CalculatorConfig, DerivedState, Flexibility, RowId, SummaryDisplay, TaxBreakdown,
    format_currency,
};
use rust_decimal::Decimal;

use crate::feedback::{CopyButtonState, Feedback, TooltipAnchor};
use crate::models::FareField;

/// Placeholder shown when no tax type has a non-zero difference.
pub const EMPTY_BREAKDOWN: &str = "No tax differences calculated";

/// How a conditional region is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Hidden,
    Block,
    Flex,
}

impl Layout {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

/// Airline penalty and service fee as shown in the totals section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PenaltySummary {
    pub layout: Layout,
    pub airline_penalty: String,
    pub service_fee: String,
}

impl Default for PenaltySummary {
    fn default() -> Self {
        Self {
            layout: Layout::Hidden,
            airline_penalty: format_currency(Decimal::ZERO),
            service_fee: format_currency(Decimal::ZERO),
        }
    }
}

#[derive(Debug, Clone)]
pub struct View {
    pub total_base_fare: String,
    pub tax_difference: String,
    pub total_fare_diff: String,
    /// Each row's own difference, next to the row.
    pub row_differences: Vec<(RowId, String)>,
    pub penalty_summary: PenaltySummary,
    /// The penalty input fields themselves.
    pub penalty_inputs: Layout,
    pub breakdown: Vec<String>,
    pub max_rows_alert: bool,
    pub field_errors: Vec<(FareField, &'static str)>,
    pub feedback: Feedback,
}

impl View {
    pub fn new(config: &CalculatorConfig) -> Self {
        let zero = format_currency(Decimal::ZERO);
        Self {
            total_base_fare: zero.clone(),
            tax_difference: zero.clone(),
            total_fare_diff: zero,
            row_differences: Vec::new(),
            penalty_summary: PenaltySummary::default(),
            penalty_inputs: Layout::Hidden,
            breakdown: vec![EMPTY_BREAKDOWN.to_string()],
            max_rows_alert: false,
            field_errors: Vec::new(),
            feedback: Feedback::new(config.feedback_duration(), config.tooltip_duration()),
        }
    }

    /// Projects a fresh derivation onto every display region.
    ///
    /// While flexibility is `Yes` the penalty summary is hidden and its
    /// amounts are left as they were.
    pub fn sync(
        &mut self,
        derived: &DerivedState,
        flexibility: Flexibility,
    ) {
        self.total_base_fare = format_currency(derived.base_fare_diff);
        self.tax_difference = format_currency(derived.overall_tax_diff);
        self.total_fare_diff = format_currency(derived.total_fare_diff);

        self.row_differences = derived
            .row_differences
            .iter()
            .map(|(id, diff)| (*id, format_currency(*diff)))
            .collect();

        if flexibility.penalties_apply() {
            self.penalty_summary.layout = Layout::Flex;
            self.penalty_summary.airline_penalty =
                format_currency(derived.penalties.airline_penalty);
            self.penalty_summary.service_fee = format_currency(derived.penalties.service_fee);
            self.penalty_inputs = Layout::Block;
        } else {
            self.penalty_summary.layout = Layout::Hidden;
            self.penalty_inputs = Layout::Hidden;
        }

        self.breakdown = breakdown_lines(&derived.tax_breakdown);
    }

    /// The headline totals, verbatim, for the clipboard summary.
    pub fn summary_display(&self) -> SummaryDisplay {
        SummaryDisplay {
            total_base_fare: self.total_base_fare.clone(),
            tax_difference: self.tax_difference.clone(),
            total_fare_diff: self.total_fare_diff.clone(),
        }
    }

    pub fn row_difference(
        &self,
        id: RowId,
    ) -> Option<&str> {
        self.row_differences
            .iter()
            .find(|(row, _)| *row == id)
            .map(|(_, text)| text.as_str())
    }

    pub fn set_field_error(
        &mut self,
        field: FareField,
        message: &'static str,
    ) {
        self.field_errors.retain(|(f, _)| *f != field);
        self.field_errors.push((field, message));
    }

    pub fn clear_field_errors(&mut self) {
        self.field_errors.clear();
    }

    pub fn field_error(
        &self,
        field: FareField,
    ) -> Option<&'static str> {
        self.field_errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, message)| *message)
    }
}

/// Plain-text rendering of every visible region.
impl fmt::Display for View {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Base Fare Difference:   {}", self.total_base_fare)?;
        if self.penalty_summary.layout.is_visible() {
            writeln!(f, "Airline Penalty:        {}", self.penalty_summary.airline_penalty)?;
            writeln!(f, "Service Fee:            {}", self.penalty_summary.service_fee)?;
        }
        writeln!(f, "Tax Difference:         {}", self.tax_difference)?;
        writeln!(f, "Total Fare Difference:  {}", self.total_fare_diff)?;

        writeln!(f, "Tax rows:")?;
        for (id, diff) in &self.row_differences {
            writeln!(f, "  [{id}] {diff}")?;
        }

        writeln!(f, "Tax breakdown:")?;
        for line in &self.breakdown {
            writeln!(f, "  {line}")?;
        }

        if self.max_rows_alert {
            writeln!(f, "! Maximum number of tax rows reached.")?;
        }
        for (field, message) in &self.field_errors {
            writeln!(f, "! {}: {message}", field.label())?;
        }

        match self.feedback.button() {
            CopyButtonState::Neutral => {}
            CopyButtonState::Success => writeln!(f, "[copy: ok]")?,
            CopyButtonState::Error => writeln!(f, "[copy: error]")?,
        }
        for tip in self.feedback.tooltips() {
            let anchor = match tip.anchor {
                TooltipAnchor::CopyButton => "copy",
                TooltipAnchor::Field(field) => field.label(),
            };
            writeln!(f, "({anchor}) {}", tip.message)?;
        }
        Ok(())
    }
}

/// Breakdown list lines: zero entries dropped, largest difference first.
///
/// Entries with equal differences keep their insertion order.
pub fn breakdown_lines(breakdown: &TaxBreakdown) -> Vec<String> {
    let mut entries: Vec<_> = breakdown.iter().filter(|(_, diff)| !diff.is_zero()).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));

    if entries.is_empty() {
        return vec![EMPTY_BREAKDOWN.to_string()];
    }

    entries
        .into_iter()
        .map(|(tax_type, diff)| {
            let label = if tax_type.is_empty() {
                "Unknown"
            } else {
                tax_type.as_str()
            };
            format!("{label} Tax: {}", format_currency(diff))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use fare_core::{Penalties, TaxType};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn view() -> View {
        View::new(&CalculatorConfig::default())
    }

    #[test]
    fn breakdown_is_sorted_descending_without_zeros() {
        let mut breakdown = TaxBreakdown::default();
        breakdown.insert(TaxType::normalize("XF"), dec!(-4));
        breakdown.insert(TaxType::normalize("US"), dec!(0));
        breakdown.insert(TaxType::normalize("YQ"), dec!(12.5));
        breakdown.insert(TaxType::normalize("AY"), dec!(3));

        assert_eq!(
            breakdown_lines(&breakdown),
            vec!["YQ Tax: 12.50", "AY Tax: 3.00", "XF Tax: -4.00"]
        );
    }

    #[test]
    fn empty_breakdown_shows_placeholder() {
        let mut breakdown = TaxBreakdown::default();
        breakdown.insert(TaxType::normalize("US"), dec!(0));

        assert_eq!(breakdown_lines(&breakdown), vec![EMPTY_BREAKDOWN]);
        assert_eq!(breakdown_lines(&TaxBreakdown::default()), vec![EMPTY_BREAKDOWN]);
    }

    #[test]
    fn untyped_entries_are_labelled_unknown() {
        let mut breakdown = TaxBreakdown::default();
        breakdown.insert(TaxType::default(), dec!(2));

        assert_eq!(breakdown_lines(&breakdown), vec!["Unknown Tax: 2.00"]);
    }

    #[test]
    fn sync_formats_headline_totals() {
        let mut view = view();
        let derived = DerivedState {
            base_fare_diff: dec!(50),
            overall_tax_diff: dec!(5),
            total_fare_diff: dec!(55),
            row_differences: vec![(RowId::FIRST, dec!(5))],
            ..Default::default()
        };

        view.sync(&derived, Flexibility::Yes);

        assert_eq!(view.total_base_fare, "50.00");
        assert_eq!(view.tax_difference, "5.00");
        assert_eq!(view.total_fare_diff, "55.00");
        assert_eq!(view.row_difference(RowId::FIRST), Some("5.00"));
    }

    #[test]
    fn penalty_summary_follows_flexibility() {
        let mut view = view();
        let derived = DerivedState {
            penalties: Penalties {
                airline_penalty: dec!(20),
                service_fee: dec!(10),
            },
            ..Default::default()
        };

        view.sync(&derived, Flexibility::No);
        assert_eq!(view.penalty_summary.layout, Layout::Flex);
        assert_eq!(view.penalty_inputs, Layout::Block);
        assert_eq!(view.penalty_summary.airline_penalty, "20.00");

        let changed = DerivedState {
            penalties: Penalties {
                airline_penalty: dec!(99),
                service_fee: dec!(1),
            },
            ..Default::default()
        };
        view.sync(&changed, Flexibility::Yes);

        assert_eq!(view.penalty_summary.layout, Layout::Hidden);
        assert_eq!(view.penalty_inputs, Layout::Hidden);
        // Hidden amounts are left stale.
        assert_eq!(view.penalty_summary.airline_penalty, "20.00");
        assert_eq!(view.penalty_summary.service_fee, "10.00");
    }

    #[test]
    fn field_errors_replace_per_field() {
        let mut view = view();
        view.set_field_error(FareField::ServiceFee, "first");
        view.set_field_error(FareField::ServiceFee, "Service fee is required.");

        assert_eq!(view.field_errors.len(), 1);
        assert_eq!(
            view.field_error(FareField::ServiceFee),
            Some("Service fee is required.")
        );
    }

    #[test]
    fn display_hides_penalties_when_flexible() {
        let view = view();

        let text = view.to_string();

        assert!(text.contains("Total Fare Difference:  0.00"));
        assert!(text.contains(EMPTY_BREAKDOWN));
        assert!(!text.contains("Airline Penalty"));
    }

    #[test]
    fn display_lists_field_errors_and_copy_state() {
        let mut view = view();
        view.set_field_error(FareField::ServiceFee, "Service fee is required.");
        view.feedback
            .flash_button(CopyButtonState::Error, tokio::time::Instant::now());

        let text = view.to_string();

        assert!(text.contains("! Service Fee: Service fee is required.\n"));
        assert!(text.ends_with("[copy: error]\n"));
    }
}
