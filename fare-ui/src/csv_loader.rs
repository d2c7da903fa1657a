//! CSV loader for tax rows.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does **not** matter. Every
//! column is optional; a missing column or an empty cell reads as an empty
//! field, exactly like an untouched text box.
//!
//! | Column     | Type    | Notes                                        |
//! |------------|---------|----------------------------------------------|
//! | `tax_type` | string  | Two-letter code, e.g. `YQ`; normalized later |
//! | `old_fare` | decimal | e.g. `25.00` or `1,250.50`                   |
//! | `new_fare` | decimal |                                              |
//!
//! ### Example
//!
//! ```csv
//! tax_type,old_fare,new_fare
//! YQ,10.00,25.00
//! US,5.60,5.60
//! XF,,4.50
//! ```
//!
//! Rows are kept as text so that loading a file and typing the same values
//! by hand produce identical state. Amounts are still checked here: a cell
//! that would silently coerce to zero is rejected instead.

use std::path::Path;

use serde::Deserialize;

use crate::models::TaxRowForm;
use crate::utils::parse_decimal;

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CsvRow {
    tax_type: Option<String>,
    old_fare: Option<String>,
    new_fare: Option<String>,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading tax rows from CSV.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The CSV is structurally invalid (ragged rows, bad quoting, etc.).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("failed to read CSV file: {0}")]
    Io(#[from] std::io::Error),

    /// An amount cell is not a number. `row` is 1-based (header = row 0).
    #[error("invalid amount '{value}' in column '{column}' on row {row}")]
    InvalidAmount {
        value: String,
        column: &'static str,
        row: usize,
    },

    #[error("{count} tax rows exceed the limit of {max}")]
    TooManyRows { count: usize, max: usize },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn check_amount(
    value: &str,
    column: &'static str,
    row: usize,
) -> Result<(), CsvLoadError> {
    parse_decimal(value)
        .map(|_| ())
        .map_err(|_| CsvLoadError::InvalidAmount {
            value: value.to_string(),
            column,
            row,
        })
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<TaxRowForm, CsvLoadError> {
    let form = TaxRowForm {
        tax_type: row.tax_type.unwrap_or_default(),
        old_fare: row.old_fare.unwrap_or_default(),
        new_fare: row.new_fare.unwrap_or_default(),
    };
    check_amount(&form.old_fare, "old_fare", row_number)?;
    check_amount(&form.new_fare, "new_fare", row_number)?;
    Ok(form)
}

/// Parse CSV text and return the rows in file order.
///
/// # Errors
///
/// * [`CsvLoadError::Parse`] if the CSV is structurally invalid.
/// * [`CsvLoadError::InvalidAmount`] if an amount cell is not a number.
/// * [`CsvLoadError::TooManyRows`] if there are more than `max_rows` rows.
pub fn load_from_str(
    input: &str,
    max_rows: usize,
) -> Result<Vec<TaxRowForm>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    let rows = reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| convert_row(result?, idx + 1))
        .collect::<Result<Vec<_>, _>>()?;

    if rows.len() > max_rows {
        return Err(CsvLoadError::TooManyRows {
            count: rows.len(),
            max: max_rows,
        });
    }

    tracing::debug!(count = rows.len(), "Loaded tax rows from CSV");
    Ok(rows)
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(
    path: &Path,
    max_rows: usize,
) -> Result<Vec<TaxRowForm>, CsvLoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents, max_rows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MAX: usize = 25;

    #[test]
    fn test_rows_keep_their_text() {
        let csv = "\
tax_type,old_fare,new_fare
yq,10.00,25.00
US,\"1,250.50\",5
";
        let rows = load_from_str(csv, MAX).expect("should parse");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].tax_type, "yq");
        assert_eq!(rows[0].new_fare, "25.00");
        assert_eq!(rows[1].old_fare, "1,250.50");
    }

    #[test]
    fn test_empty_cells_and_missing_columns_read_as_blank() {
        let csv = "\
new_fare,tax_type
4.50,XF
,
";
        let rows = load_from_str(csv, MAX).expect("should parse");

        assert_eq!(
            rows,
            vec![
                TaxRowForm {
                    tax_type: "XF".to_string(),
                    old_fare: String::new(),
                    new_fare: "4.50".to_string(),
                },
                TaxRowForm::default(),
            ]
        );
    }

    #[test]
    fn test_non_numeric_amount_reports_row_and_column() {
        let csv = "\
tax_type,old_fare,new_fare
YQ,1,2
US,1,lots
";
        match load_from_str(csv, MAX).unwrap_err() {
            CsvLoadError::InvalidAmount { value, column, row } => {
                assert_eq!(value, "lots");
                assert_eq!(column, "new_fare");
                assert_eq!(row, 2);
            }
            other => panic!("expected InvalidAmount, got {:?}", other),
        }
    }

    #[test]
    fn test_ragged_row_is_a_parse_error() {
        let csv = "tax_type,old_fare,new_fare\nYQ,1\n";
        assert!(matches!(
            load_from_str(csv, MAX),
            Err(CsvLoadError::Parse(_))
        ));
    }

    #[test]
    fn test_row_limit_is_enforced() {
        let csv = "tax_type,old_fare,new_fare\nYQ,1,2\nUS,1,2\nXF,1,2\n";
        match load_from_str(csv, 2).unwrap_err() {
            CsvLoadError::TooManyRows { count, max } => {
                assert_eq!(count, 3);
                assert_eq!(max, 2);
            }
            other => panic!("expected TooManyRows, got {:?}", other),
        }
    }

    #[test]
    fn test_header_only_yields_no_rows() {
        let rows = load_from_str("tax_type,old_fare,new_fare\n", MAX).expect("valid");
        assert!(rows.is_empty());
        assert!(load_from_str("", MAX).expect("valid").is_empty());
    }
}
