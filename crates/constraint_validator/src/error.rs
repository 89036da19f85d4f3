//! Error types for engine construction.

use constraint_core::SchemaError;
use thiserror::Error;

/// Invalid engine configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A setting has an unusable value
    #[error("Invalid configuration for '{field}': {message}")]
    InvalidValue {
        /// The offending setting
        field: &'static str,
        /// What is wrong with it
        message: String,
    },
}

impl ConfigError {
    /// Creates a new invalid value error.
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }
}

/// Errors that can occur while building a [`ConstraintEngine`](crate::ConstraintEngine).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The schema's constraint declarations are invalid
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The engine configuration is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
}
