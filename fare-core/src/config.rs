//! Limits and timings for the calculator.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registry::{MAX_TAX_ROWS, MIN_TAX_ROWS};

/// Errors that can occur when validating a [`CalculatorConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// At least one tax row must always exist.
    #[error("minimum tax rows must be at least 1, got {0}")]
    InvalidMinTaxRows(usize),

    /// The ceiling must not be below the floor.
    #[error("maximum tax rows ({max}) must not be less than minimum tax rows ({min})")]
    InvalidMaxTaxRows { min: usize, max: usize },

    /// The debounce quiescence window must be positive.
    #[error("debounce delay must be positive")]
    InvalidDebounceDelay,

    /// Copy feedback and tooltips must stay visible for some time.
    #[error("{0} duration must be positive")]
    InvalidFeedbackDuration(&'static str),
}

/// Tunable limits for the row registry and the interactive session.
///
/// Every field has a default, so a configuration file only needs to name the
/// values it changes.
///
/// # Example
///
/// ```
/// use fare_core::config::CalculatorConfig;
///
/// let config = CalculatorConfig::default();
///
/// assert_eq!(config.max_tax_rows, 25);
/// assert_eq!(config.debounce_delay().as_millis(), 300);
/// assert_eq!(config.validate(), Ok(()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Most tax rows that may be active at once.
    pub max_tax_rows: usize,

    /// Fewest tax rows that may be active at once.
    pub min_tax_rows: usize,

    /// Quiescence window before an edit triggers a recalculation.
    pub debounce_delay_ms: u64,

    /// How long the copy control shows success or error before reverting.
    pub feedback_duration_ms: u64,

    /// How long a tooltip stays visible.
    pub tooltip_duration_ms: u64,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            max_tax_rows: MAX_TAX_ROWS,
            min_tax_rows: MIN_TAX_ROWS,
            debounce_delay_ms: 300,
            feedback_duration_ms: 1000,
            tooltip_duration_ms: 2000,
        }
    }
}

impl CalculatorConfig {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - `min_tax_rows` is zero
    /// - `max_tax_rows` is less than `min_tax_rows`
    /// - any duration is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_tax_rows == 0 {
            return Err(ConfigError::InvalidMinTaxRows(self.min_tax_rows));
        }
        if self.max_tax_rows < self.min_tax_rows {
            return Err(ConfigError::InvalidMaxTaxRows {
                min: self.min_tax_rows,
                max: self.max_tax_rows,
            });
        }
        if self.debounce_delay_ms == 0 {
            return Err(ConfigError::InvalidDebounceDelay);
        }
        if self.feedback_duration_ms == 0 {
            return Err(ConfigError::InvalidFeedbackDuration("feedback"));
        }
        if self.tooltip_duration_ms == 0 {
            return Err(ConfigError::InvalidFeedbackDuration("tooltip"));
        }
        Ok(())
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_delay_ms)
    }

    pub fn feedback_duration(&self) -> Duration {
        Duration::from_millis(self.feedback_duration_ms)
    }

    pub fn tooltip_duration(&self) -> Duration {
        Duration::from_millis(self.tooltip_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn validate_accepts_defaults() {
        assert_eq!(CalculatorConfig::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_zero_min_rows() {
        let config = CalculatorConfig {
            min_tax_rows: 0,
            ..Default::default()
        };

        assert_eq!(config.validate(), Err(ConfigError::InvalidMinTaxRows(0)));
    }

    #[test]
    fn validate_rejects_max_below_min() {
        let config = CalculatorConfig {
            min_tax_rows: 3,
            max_tax_rows: 2,
            ..Default::default()
        };

        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidMaxTaxRows { min: 3, max: 2 })
        );
    }

    #[test]
    fn validate_rejects_zero_durations() {
        let no_debounce = CalculatorConfig {
            debounce_delay_ms: 0,
            ..Default::default()
        };
        let no_tooltip = CalculatorConfig {
            tooltip_duration_ms: 0,
            ..Default::default()
        };

        assert_eq!(
            no_debounce.validate(),
            Err(ConfigError::InvalidDebounceDelay)
        );
        assert_eq!(
            no_tooltip.validate(),
            Err(ConfigError::InvalidFeedbackDuration("tooltip"))
        );
    }
}
