//! Error types for the constraint engine.
//!
//! This module defines the build-time schema errors, the input-coercion
//! errors raised through a scalar's parse path, and the structured
//! [`ConstraintError`] payload carried by constraint violations.

use crate::{ConstraintKind, Threshold};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable error code carried by every constraint violation.
pub const CONSTRAINT_ERROR_CODE: &str = "ERR_GRAPHQL_CONSTRAINT_VALIDATION";

/// Result type for schema construction.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// One violated constraint: the kind and its declared threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintContext {
    /// The failing constraint kind
    pub arg: ConstraintKind,
    /// The declared threshold
    pub value: Threshold,
}

/// A structured constraint violation.
///
/// Serializes as `{message, code, fieldName, context: [{arg, value}]}`.
/// Validation is fail-fast, so `context` holds exactly one entry.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct ConstraintError {
    /// Reason produced by the failing validator
    pub message: String,
    /// Always [`CONSTRAINT_ERROR_CODE`]
    pub code: String,
    /// Name of the field, argument or input field whose value failed
    pub field_name: String,
    /// The violated constraint
    pub context: Vec<ConstraintContext>,
}

impl ConstraintError {
    /// Creates a violation error for one failing constraint.
    pub fn new(
        field_name: impl Into<String>,
        kind: ConstraintKind,
        threshold: Threshold,
        message: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            code: CONSTRAINT_ERROR_CODE.to_string(),
            field_name: field_name.into(),
            context: vec![ConstraintContext {
                arg: kind,
                value: threshold,
            }],
        }
    }

    /// Returns the first (and only) violated constraint kind.
    pub fn kind(&self) -> Option<ConstraintKind> {
        self.context.first().map(|c| c.arg)
    }
}

/// Errors raised by a scalar's input or output coercion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoercionError {
    /// The value does not have the scalar's shape
    #[error("{message}")]
    Invalid {
        /// Description of the type mismatch
        message: String,
    },

    /// The value has the right shape but violates a declared constraint
    #[error(transparent)]
    Constraint(#[from] ConstraintError),
}

impl CoercionError {
    /// Creates a new type-mismatch error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Returns the constraint violation, if this is one.
    pub fn as_constraint(&self) -> Option<&ConstraintError> {
        match self {
            Self::Constraint(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

/// Errors raised while building or transforming a schema.
///
/// These are fatal: a schema that produces one is never usable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// A type reference names no known type
    #[error("Unknown type '{type_name}' referenced by {coordinate}")]
    UnknownType {
        /// Declaration holding the reference
        coordinate: String,
        /// The unresolved type name
        type_name: String,
    },

    /// Two type definitions share a name
    #[error("Duplicate type definition '{0}'")]
    DuplicateType(String),

    /// A type reference could not be parsed
    #[error("Invalid type reference '{0}'")]
    InvalidTypeRef(String),

    /// A constraint annotation targets a non-scalar type
    #[error("Constraint on {coordinate} targets non-scalar type '{type_name}'")]
    NotAScalar {
        /// Constrained declaration
        coordinate: String,
        /// The non-scalar type
        type_name: String,
    },

    /// A constraint annotation declares an argument outside the closed set
    #[error("Unknown constraint argument '{argument}' on {coordinate}")]
    UnknownArgument {
        /// Constrained declaration
        coordinate: String,
        /// The unknown argument name
        argument: String,
    },

    /// A constraint annotation declares no constraint kind
    #[error("Constraint on {0} declares no constraint arguments")]
    EmptyConstraint(String),

    /// More than one constraint annotation on one declaration
    #[error("Constraint declared more than once on {0}")]
    RepeatedConstraint(String),

    /// A constraint kind does not apply to the declaration's scalar
    #[error("Constraint '{kind}' on {coordinate} is not applicable to scalar '{scalar}'")]
    IncompatibleConstraint {
        /// Constrained declaration
        coordinate: String,
        /// The incompatible kind
        kind: ConstraintKind,
        /// The base scalar name
        scalar: String,
    },

    /// A threshold has the wrong shape for its kind
    #[error("Invalid threshold for '{kind}' on {coordinate}: expected {expected}, got {actual}")]
    InvalidThreshold {
        /// Constrained declaration
        coordinate: String,
        /// The constraint kind
        kind: ConstraintKind,
        /// Expected threshold shape
        expected: &'static str,
        /// The declared value
        actual: String,
    },

    /// `uniqueTypeName` is not a valid type name
    #[error("Invalid uniqueTypeName on {coordinate}: {actual}")]
    InvalidTypeName {
        /// Constrained declaration
        coordinate: String,
        /// The declared value
        actual: String,
    },

    /// `multipleOf: 0`
    #[error("multipleOf on {0} must be non-zero")]
    ZeroMultipleOf(String),

    /// The `pattern` threshold is not a valid regular expression
    #[error("Invalid pattern on {coordinate}: {error}")]
    InvalidPattern {
        /// Constrained declaration
        coordinate: String,
        /// Regex compilation error
        error: String,
    },

    /// The `format` threshold names no known format
    #[error("Invalid format type {format} on {coordinate}")]
    InvalidFormat {
        /// Constrained declaration
        coordinate: String,
        /// The unknown format name
        format: String,
    },

    /// A declared `uniqueTypeName` is already used by another type
    #[error("Wrapped scalar name '{0}' is already used by another type")]
    DuplicateTypeName(String),
}

impl SchemaError {
    /// Creates a new unknown type error.
    pub fn unknown_type(coordinate: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::UnknownType {
            coordinate: coordinate.into(),
            type_name: type_name.into(),
        }
    }

    /// Creates a new invalid threshold error.
    pub fn invalid_threshold(
        coordinate: impl Into<String>,
        kind: ConstraintKind,
        expected: &'static str,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidThreshold {
            coordinate: coordinate.into(),
            kind,
            expected,
            actual: actual.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_constraint_error_serialized_shape() {
        let err = ConstraintError::new(
            "title",
            ConstraintKind::Min,
            Threshold::Number(3.0),
            "Must be at least 3",
        );

        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({
                "message": "Must be at least 3",
                "code": "ERR_GRAPHQL_CONSTRAINT_VALIDATION",
                "fieldName": "title",
                "context": [{"arg": "min", "value": 3}],
            })
        );
        assert_eq!(err.kind(), Some(ConstraintKind::Min));
    }

    #[test]
    fn test_coercion_error_displays_reason() {
        let err = CoercionError::from(ConstraintError::new(
            "name",
            ConstraintKind::MaxLength,
            Threshold::Number(4.0),
            "Must be no more than 4 characters in length",
        ));
        assert_eq!(err.to_string(), "Must be no more than 4 characters in length");
        assert!(err.as_constraint().is_some());
        assert!(CoercionError::invalid("bad").as_constraint().is_none());
    }

    #[test]
    fn test_schema_error_messages() {
        let err = SchemaError::InvalidFormat {
            coordinate: "User.email".to_string(),
            format: "phone".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid format type phone on User.email");
    }
}
