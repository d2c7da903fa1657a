mod fare_form;

pub use fare_form::{FareField, FareForm, RowField, TaxRowForm};
