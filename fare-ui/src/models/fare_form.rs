use std::fmt;

use fare_core::{FareInputs, Flexibility, RowId, TaxRow, TaxType};

use crate::utils::{coerce_decimal, is_blank};

/// One editable text field of the fare section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FareField {
    BaseOldFare,
    BaseNewFare,
    AirlinePenalty,
    ServiceFee,
}

impl FareField {
    pub fn label(&self) -> &'static str {
        match self {
            Self::BaseOldFare => "Old Base Fare",
            Self::BaseNewFare => "New Base Fare",
            Self::AirlinePenalty => "Airline Penalty",
            Self::ServiceFee => "Service Fee",
        }
    }

    /// Message shown on the field when it is required but empty.
    ///
    /// Only the two penalty fields can be required.
    pub fn required_message(&self) -> Option<&'static str> {
        match self {
            Self::AirlinePenalty => Some("Airline penalty is required."),
            Self::ServiceFee => Some("Service fee is required."),
            Self::BaseOldFare | Self::BaseNewFare => None,
        }
    }
}

/// One editable text field of a tax row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowField {
    TaxType,
    OldFare,
    NewFare,
}

/// Raw text of the fare section, exactly as typed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FareForm {
    pub base_old_fare: String,
    pub base_new_fare: String,
    pub flexibility: Flexibility,
    pub airline_penalty: String,
    pub service_fee: String,
}

impl FareForm {
    pub fn field(
        &self,
        field: FareField,
    ) -> &str {
        match field {
            FareField::BaseOldFare => &self.base_old_fare,
            FareField::BaseNewFare => &self.base_new_fare,
            FareField::AirlinePenalty => &self.airline_penalty,
            FareField::ServiceFee => &self.service_fee,
        }
    }

    pub fn set_field(
        &mut self,
        field: FareField,
        value: impl Into<String>,
    ) {
        let slot = match field {
            FareField::BaseOldFare => &mut self.base_old_fare,
            FareField::BaseNewFare => &mut self.base_new_fare,
            FareField::AirlinePenalty => &mut self.airline_penalty,
            FareField::ServiceFee => &mut self.service_fee,
        };
        *slot = value.into();
    }

    /// Coerces the text into the engine's input snapshot.
    pub fn to_inputs(&self) -> FareInputs {
        FareInputs {
            base_old_fare: coerce_decimal(&self.base_old_fare),
            base_new_fare: coerce_decimal(&self.base_new_fare),
            flexibility: self.flexibility,
            airline_penalty: coerce_decimal(&self.airline_penalty),
            service_fee: coerce_decimal(&self.service_fee),
        }
    }

    /// Penalty fields that are required under the current flexibility but
    /// left blank. Always empty when flexibility is `Yes`.
    pub fn missing_penalties(&self) -> Vec<FareField> {
        if !self.flexibility.penalties_apply() {
            return Vec::new();
        }
        [FareField::AirlinePenalty, FareField::ServiceFee]
            .into_iter()
            .filter(|field| is_blank(self.field(*field)))
            .collect()
    }
}

impl fmt::Display for FareForm {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Old base fare:   {}", self.base_old_fare)?;
        writeln!(f, "New base fare:   {}", self.base_new_fare)?;
        writeln!(f, "Flexibility:     {}", self.flexibility)?;
        writeln!(f, "Airline penalty: {}", self.airline_penalty)?;
        writeln!(f, "Service fee:     {}", self.service_fee)
    }
}

/// Raw text of one tax row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaxRowForm {
    pub tax_type: String,
    pub old_fare: String,
    pub new_fare: String,
}

impl TaxRowForm {
    pub fn set_field(
        &mut self,
        field: RowField,
        value: impl Into<String>,
    ) {
        let slot = match field {
            RowField::TaxType => &mut self.tax_type,
            RowField::OldFare => &mut self.old_fare,
            RowField::NewFare => &mut self.new_fare,
        };
        *slot = value.into();
    }

    pub fn to_row(
        &self,
        id: RowId,
    ) -> TaxRow {
        TaxRow {
            id,
            tax_type: TaxType::normalize(&self.tax_type),
            old_fare: coerce_decimal(&self.old_fare),
            new_fare: coerce_decimal(&self.new_fare),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn to_inputs_coerces_malformed_fields_to_zero() {
        let form = FareForm {
            base_old_fare: "abc".to_string(),
            base_new_fare: "1,250.50".to_string(),
            ..Default::default()
        };

        let inputs = form.to_inputs();

        assert_eq!(inputs.base_old_fare, dec!(0));
        assert_eq!(inputs.base_new_fare, dec!(1250.50));
        assert_eq!(inputs.airline_penalty, dec!(0));
    }

    #[test]
    fn missing_penalties_only_when_inflexible() {
        let mut form = FareForm::default();
        assert!(form.missing_penalties().is_empty());

        form.flexibility = Flexibility::No;
        form.set_field(FareField::ServiceFee, "15");

        assert_eq!(form.missing_penalties(), vec![FareField::AirlinePenalty]);
    }

    #[test]
    fn whitespace_penalty_counts_as_missing() {
        let form = FareForm {
            flexibility: Flexibility::No,
            airline_penalty: "  ".to_string(),
            service_fee: "0".to_string(),
            ..Default::default()
        };

        assert_eq!(form.missing_penalties(), vec![FareField::AirlinePenalty]);
    }

    #[test]
    fn row_form_normalizes_tax_type() {
        let mut row = TaxRowForm::default();
        row.set_field(RowField::TaxType, "yqx");
        row.set_field(RowField::NewFare, "7.5");

        let coerced = row.to_row(RowId::FIRST);

        assert_eq!(coerced.tax_type.as_str(), "YQ");
        assert_eq!(coerced.old_fare, dec!(0));
        assert_eq!(coerced.new_fare, dec!(7.5));
    }
}
