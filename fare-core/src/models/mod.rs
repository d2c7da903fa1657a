mod derived_state;
mod fare_inputs;
mod flexibility;
mod tax_row;

pub use derived_state::{DerivedState, Penalties, TaxBreakdown};
pub use fare_inputs::FareInputs;
pub use flexibility::Flexibility;
pub use tax_row::{ParseRowIdError, RowId, TaxRow, TaxType};
