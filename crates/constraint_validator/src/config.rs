//! Engine configuration.

use crate::ConfigError;
use serde::{Deserialize, Serialize};

/// Settings for a [`ConstraintEngine`](crate::ConstraintEngine).
///
/// Deserializable from TOML or YAML; missing keys take their defaults.
///
/// ```toml
/// expose_original_error = false
/// max_errors = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Attach the structured violation as `originalError` to default errors
    pub expose_original_error: bool,

    /// Maximum number of errors reported per request
    pub max_errors: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            expose_original_error: true,
            max_errors: None,
        }
    }
}

impl EngineConfig {
    /// Creates a new builder for `EngineConfig`.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_errors == Some(0) {
            return Err(ConfigError::invalid(
                "max_errors",
                "must be greater than zero",
            ));
        }

        Ok(())
    }
}

/// Builder for `EngineConfig`.
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Sets whether default errors carry `originalError`.
    pub fn expose_original_error(mut self, expose: bool) -> Self {
        self.config.expose_original_error = expose;
        self
    }

    /// Caps the number of errors reported per request.
    pub fn max_errors(mut self, max: usize) -> Self {
        self.config.max_errors = Some(max);
        self
    }

    /// Builds and validates the configuration.
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(config.expose_original_error);
        assert_eq!(config.max_errors, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::builder()
            .expose_original_error(false)
            .max_errors(5)
            .build()
            .unwrap();
        assert_eq!(
            config,
            EngineConfig {
                expose_original_error: false,
                max_errors: Some(5),
            }
        );
    }

    #[test]
    fn test_zero_max_errors_rejected() {
        let err = EngineConfig::builder().max_errors(0).build().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid configuration for 'max_errors': must be greater than zero"
        );
    }

    #[test]
    fn test_deserialize_partial() {
        let config: EngineConfig = serde_json::from_str(r#"{"max_errors": 2}"#).unwrap();
        assert!(config.expose_original_error);
        assert_eq!(config.max_errors, Some(2));
    }
}
