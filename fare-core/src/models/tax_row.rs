use std::{fmt, num::ParseIntError, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable identifier of a tax row.
///
/// Ids start at 1 and are handed out by the row registry; they stay attached
/// to a row until it is removed and are never renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowId(u32);

impl RowId {
    pub const FIRST: RowId = RowId(1);

    /// Returns `None` for zero, which is never a valid row id.
    pub fn new(value: u32) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for RowId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when text cannot be read as a [`RowId`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseRowIdError {
    #[error("invalid row id: {0}")]
    Invalid(#[from] ParseIntError),

    #[error("row ids start at 1")]
    Zero,
}

impl FromStr for RowId {
    type Err = ParseRowIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s.trim().parse()?;
        RowId::new(value).ok_or(ParseRowIdError::Zero)
    }
}

/// Normalized tax code, e.g. `YQ` or `US`.
///
/// At most [`TaxType::MAX_LEN`] characters, upper-cased. Longer input is
/// truncated the same way a `maxlength` text box would.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaxType(String);

impl TaxType {
    pub const MAX_LEN: usize = 2;

    pub fn normalize(raw: &str) -> Self {
        Self(
            raw.trim()
                .chars()
                .take(Self::MAX_LEN)
                .flat_map(char::to_uppercase)
                .collect(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TaxType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One coerced tax line: a single tax category's old and new amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRow {
    pub id: RowId,
    pub tax_type: TaxType,
    pub old_fare: Decimal,
    pub new_fare: Decimal,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn tax_type_is_upper_cased() {
        assert_eq!(TaxType::normalize("yq").as_str(), "YQ");
    }

    #[test]
    fn tax_type_is_truncated_to_two_characters() {
        assert_eq!(TaxType::normalize("usd").as_str(), "US");
    }

    #[test]
    fn tax_type_ignores_surrounding_whitespace() {
        assert_eq!(TaxType::normalize("  xf ").as_str(), "XF");
        assert!(TaxType::normalize("   ").is_empty());
    }

    #[test]
    fn row_id_rejects_zero() {
        assert_eq!(RowId::new(0), None);
        assert_eq!("0".parse::<RowId>(), Err(ParseRowIdError::Zero));
    }

    #[test]
    fn row_id_parses_positive_numbers() {
        assert_eq!("7".parse::<RowId>().map(RowId::get), Ok(7));
        assert!("seven".parse::<RowId>().is_err());
    }
}
