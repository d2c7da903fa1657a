//! Plain-text ticket change summary for the clipboard.
//!
//! The three headline totals are copied verbatim from what the user
//! currently sees. The penalty amounts and the tax breakdown come from the
//! derived state. The breakdown is listed in insertion order and is not
//! filtered or sorted.
//!
//! ```text
//! Ticket Change Summary
//! =======================
//! Base Fare Difference: 50.00
//! Overall Tax Difference: 5.00
//! =======================
//! Total Fare Difference: 55.00
//! ***Tax Breakdown****
//! TA: 5.00
//! ```

use std::fmt;

use crate::calculations::format_currency;
use crate::models::{DerivedState, Flexibility};

const TITLE: &str = "Ticket Change Summary";
const RULE: &str = "=======================";
const BREAKDOWN_HEADER: &str = "***Tax Breakdown****";

/// The headline totals exactly as currently displayed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryDisplay {
    pub total_base_fare: String,
    pub tax_difference: String,
    pub total_fare_diff: String,
}

/// Borrowing view over everything the summary needs.
pub struct TicketChangeSummary<'a> {
    display: &'a SummaryDisplay,
    derived: &'a DerivedState,
    flexibility: Flexibility,
}

impl<'a> TicketChangeSummary<'a> {
    pub fn new(
        display: &'a SummaryDisplay,
        derived: &'a DerivedState,
        flexibility: Flexibility,
    ) -> Self {
        Self {
            display,
            derived,
            flexibility,
        }
    }
}

impl fmt::Display for TicketChangeSummary<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "{TITLE}")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Base Fare Difference: {}", self.display.total_base_fare)?;

        if self.flexibility.penalties_apply() {
            let penalties = &self.derived.penalties;
            writeln!(f, "Airline Penalty: {}", format_currency(penalties.airline_penalty))?;
            writeln!(f, "Service Fee: {}", format_currency(penalties.service_fee))?;
        }

        writeln!(f, "Overall Tax Difference: {}", self.display.tax_difference)?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Total Fare Difference: {}", self.display.total_fare_diff)?;
        writeln!(f, "{BREAKDOWN_HEADER}")?;

        for (tax_type, difference) in self.derived.tax_breakdown.iter() {
            writeln!(f, "{tax_type}: {}", format_currency(difference))?;
        }
        Ok(())
    }
}

/// Builds the summary text.
pub fn build_summary(
    display: &SummaryDisplay,
    derived: &DerivedState,
    flexibility: Flexibility,
) -> String {
    TicketChangeSummary::new(display, derived, flexibility).to_string()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{Penalties, TaxBreakdown, TaxType};

    fn display(
        base: &str,
        tax: &str,
        total: &str,
    ) -> SummaryDisplay {
        SummaryDisplay {
            total_base_fare: base.to_string(),
            tax_difference: tax.to_string(),
            total_fare_diff: total.to_string(),
        }
    }

    #[test]
    fn flexible_summary_omits_penalties() {
        let mut breakdown = TaxBreakdown::default();
        breakdown.insert(TaxType::normalize("TA"), dec!(5));
        let derived = DerivedState {
            tax_breakdown: breakdown,
            penalties: Penalties {
                airline_penalty: dec!(99),
                service_fee: dec!(1),
            },
            ..Default::default()
        };

        let text = build_summary(&display("50.00", "5.00", "55.00"), &derived, Flexibility::Yes);

        assert_eq!(
            text,
            "Ticket Change Summary\n\
             =======================\n\
             Base Fare Difference: 50.00\n\
             Overall Tax Difference: 5.00\n\
             =======================\n\
             Total Fare Difference: 55.00\n\
             ***Tax Breakdown****\n\
             TA: 5.00\n"
        );
    }

    #[test]
    fn inflexible_summary_lists_penalties_after_base_fare() {
        let derived = DerivedState {
            penalties: Penalties {
                airline_penalty: dec!(20),
                service_fee: dec!(10.5),
            },
            ..Default::default()
        };

        let text = build_summary(&display("-20.00", "0.00", "30.50"), &derived, Flexibility::No);

        assert_eq!(
            text,
            "Ticket Change Summary\n\
             =======================\n\
             Base Fare Difference: -20.00\n\
             Airline Penalty: 20.00\n\
             Service Fee: 10.50\n\
             Overall Tax Difference: 0.00\n\
             =======================\n\
             Total Fare Difference: 30.50\n\
             ***Tax Breakdown****\n"
        );
    }

    #[test]
    fn breakdown_keeps_insertion_order_and_negative_entries() {
        let mut breakdown = TaxBreakdown::default();
        breakdown.insert(TaxType::normalize("XF"), dec!(-4));
        breakdown.insert(TaxType::normalize("US"), dec!(12.345));
        let derived = DerivedState {
            tax_breakdown: breakdown,
            ..Default::default()
        };

        let text = build_summary(&display("0.00", "12.35", "12.35"), &derived, Flexibility::Yes);

        assert!(text.ends_with("***Tax Breakdown****\nXF: -4.00\nUS: 12.35\n"));
    }

    #[test]
    fn headline_values_are_copied_verbatim() {
        let derived = DerivedState::default();

        let text = build_summary(&display("stale", "1.00", "2.00"), &derived, Flexibility::Yes);

        assert!(text.contains("Base Fare Difference: stale\n"));
    }
}
