//! Fare scenarios stored as TOML.
//!
//! A scenario is a pre-filled form: the fare fields, flexibility, and tax
//! rows. Amounts may be written as strings (kept verbatim, so `"1,250.50"`
//! works) or as bare numbers.
//!
//! ```toml
//! base_old_fare = "100.00"
//! base_new_fare = 150
//! flexibility = "No"
//! airline_penalty = 25
//! service_fee = "10.50"
//!
//! [[tax_rows]]
//! tax_type = "YQ"
//! old_fare = 10
//! new_fare = 25
//! ```

use std::{fmt, path::Path};

use fare_core::{Flexibility, RegistryError};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::{
    models::{FareForm, TaxRowForm},
    state::AppState,
};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid scenario: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid flexibility '{0}', expected \"Yes\" or \"No\"")]
    InvalidFlexibility(String),

    #[error(transparent)]
    TooManyRows(#[from] RegistryError),
}

/// An amount as written in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl fmt::Display for RawAmount {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
        }
    }
}

fn text(amount: &Option<RawAmount>) -> String {
    amount.as_ref().map(RawAmount::to_string).unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScenarioRow {
    pub tax_type: Option<String>,
    pub old_fare: Option<RawAmount>,
    pub new_fare: Option<RawAmount>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub base_old_fare: Option<RawAmount>,
    pub base_new_fare: Option<RawAmount>,
    pub flexibility: Option<String>,
    pub airline_penalty: Option<RawAmount>,
    pub service_fee: Option<RawAmount>,
    pub tax_rows: Vec<ScenarioRow>,
}

impl Scenario {
    pub fn from_toml_str(input: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(input)?)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    fn flexibility(&self) -> Result<Flexibility, ScenarioError> {
        match self.flexibility.as_deref() {
            None => Ok(Flexibility::default()),
            Some(raw) => Flexibility::parse(raw.trim())
                .ok_or_else(|| ScenarioError::InvalidFlexibility(raw.to_string())),
        }
    }

    /// The fare section as the user would have typed it.
    pub fn form(&self) -> Result<FareForm, ScenarioError> {
        Ok(FareForm {
            base_old_fare: text(&self.base_old_fare),
            base_new_fare: text(&self.base_new_fare),
            flexibility: self.flexibility()?,
            airline_penalty: text(&self.airline_penalty),
            service_fee: text(&self.service_fee),
        })
    }

    pub fn rows(&self) -> Vec<TaxRowForm> {
        self.tax_rows
            .iter()
            .map(|row| TaxRowForm {
                tax_type: row.tax_type.clone().unwrap_or_default(),
                old_fare: text(&row.old_fare),
                new_fare: text(&row.new_fare),
            })
            .collect()
    }

    /// Replaces the form and rows of `state`. Does not recalculate.
    ///
    /// Nothing is changed when the scenario is invalid.
    pub fn apply(
        &self,
        state: &mut AppState,
    ) -> Result<(), ScenarioError> {
        let form = self.form()?;
        state.replace_rows(self.rows())?;
        state.form = form;
        info!(rows = state.rows.len(), flexibility = %state.form.flexibility, "Applied scenario");
        Ok(())
    }
}
