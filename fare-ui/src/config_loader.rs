//! Reads [`CalculatorConfig`] from an optional TOML file.

use std::path::Path;

use fare_core::{CalculatorConfig, ConfigError};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Parses and validates configuration text. Omitted keys keep their defaults.
pub fn parse_config(input: &str) -> Result<CalculatorConfig, ConfigLoadError> {
    let config: CalculatorConfig = toml::from_str(input)?;
    config.validate()?;
    Ok(config)
}

/// Loads the configuration at `path`, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<CalculatorConfig, ConfigLoadError> {
    let Some(path) = path else {
        debug!("No config file given; using defaults");
        return Ok(CalculatorConfig::default());
    };

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config = parse_config(&contents)?;
    info!(path = %path.display(), ?config, "Loaded calculator config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_path_means_defaults() {
        assert_eq!(load_config(None).unwrap(), CalculatorConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_named_keys() {
        let config = parse_config("max_tax_rows = 10\ndebounce_delay_ms = 50\n").unwrap();

        assert_eq!(config.max_tax_rows, 10);
        assert_eq!(config.debounce_delay_ms, 50);
        assert_eq!(config.min_tax_rows, 1);
        assert_eq!(config.feedback_duration_ms, 1000);
    }

    #[test]
    fn invalid_limits_are_rejected() {
        let result = parse_config("min_tax_rows = 5\nmax_tax_rows = 2\n");

        assert!(matches!(
            result,
            Err(ConfigLoadError::Invalid(ConfigError::InvalidMaxTaxRows { min: 5, max: 2 }))
        ));
    }

    #[test]
    fn wrong_types_are_parse_errors() {
        assert!(matches!(
            parse_config("max_tax_rows = \"many\""),
            Err(ConfigLoadError::Parse(_))
        ));
    }

    #[test]
    fn unreadable_file_reports_the_path() {
        let err = load_config(Some(Path::new("/no/such/fare.toml"))).unwrap_err();

        assert!(err.to_string().contains("/no/such/fare.toml"));
    }
}
