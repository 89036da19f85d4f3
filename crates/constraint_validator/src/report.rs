//! Boundary error reporting.
//!
//! Turns an input-coercion failure into the error object returned to the
//! caller. By default that is a [`BoundaryError`] with the host's generic
//! invalid-value message; a caller-supplied hook may replace the error for
//! constraint violations entirely.

use constraint_core::{CoercionError, ConstraintError};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Hook remapping a constraint violation to an arbitrary error object.
pub type FormatErrorFn = Arc<dyn Fn(&ConstraintError) -> serde_json::Value + Send + Sync>;

/// Where and why coercion of one variable failed.
#[derive(Debug, Clone, PartialEq)]
pub struct InputFailure {
    /// Path to the failing value, starting with the variable name (`input.tags[1]`)
    pub path: String,
    /// Type expected at `path`
    pub expected_type: String,
    /// The underlying error
    pub error: CoercionError,
}

impl InputFailure {
    /// Creates a failure at `path`.
    pub fn new(path: impl Into<String>, expected_type: impl Into<String>, error: CoercionError) -> Self {
        Self {
            path: path.into(),
            expected_type: expected_type.into(),
            error,
        }
    }
}

/// The default error object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryError {
    /// Human-readable message
    pub message: String,

    /// The structured violation, for constraint failures
    #[serde(rename = "originalError", skip_serializing_if = "Option::is_none")]
    pub original_error: Option<ConstraintError>,
}

/// An error as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportedError {
    /// Default shape
    Default(BoundaryError),
    /// Whatever the formatting hook returned
    Custom(serde_json::Value),
}

impl ReportedError {
    /// Creates a default error with no original error attached.
    pub fn message(message: impl Into<String>) -> Self {
        ReportedError::Default(BoundaryError {
            message: message.into(),
            original_error: None,
        })
    }

    /// Returns the default-shape error, if this is one.
    pub fn as_default(&self) -> Option<&BoundaryError> {
        match self {
            ReportedError::Default(err) => Some(err),
            ReportedError::Custom(_) => None,
        }
    }

    /// Serializes the error as JSON.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            ReportedError::Default(err) => {
                serde_json::to_value(err).unwrap_or(serde_json::Value::Null)
            }
            ReportedError::Custom(value) => value.clone(),
        }
    }
}

/// Formats input failures for the boundary.
#[derive(Clone)]
pub struct ErrorReporter {
    hook: Option<FormatErrorFn>,
    expose_original_error: bool,
}

impl fmt::Debug for ErrorReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorReporter")
            .field("hook", &self.hook.is_some())
            .field("expose_original_error", &self.expose_original_error)
            .finish()
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorReporter {
    /// Creates a reporter producing the default error shape.
    pub fn new() -> Self {
        Self {
            hook: None,
            expose_original_error: true,
        }
    }

    /// Installs a formatting hook for constraint violations.
    pub fn with_hook(mut self, hook: FormatErrorFn) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Controls whether default errors carry `originalError`.
    pub fn expose_original_error(mut self, expose: bool) -> Self {
        self.expose_original_error = expose;
        self
    }

    /// Reports the failure of variable `variable`, whose full value was `value`.
    pub fn report(&self, variable: &str, value: &serde_json::Value, failure: &InputFailure) -> ReportedError {
        let violation = failure.error.as_constraint();

        if let (Some(hook), Some(violation)) = (&self.hook, violation) {
            return ReportedError::Custom(hook(violation));
        }

        ReportedError::Default(BoundaryError {
            message: default_message(variable, value, failure),
            original_error: violation.filter(|_| self.expose_original_error).cloned(),
        })
    }
}

/// `Variable "$var" got invalid value {value}; Expected type "T" at "path"; reason`
pub fn default_message(variable: &str, value: &serde_json::Value, failure: &InputFailure) -> String {
    format!(
        "Variable \"${variable}\" got invalid value {value}; Expected type \"{}\" at \"{}\"; {}",
        failure.expected_type, failure.path, failure.error
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use constraint_core::{ConstraintKind, Threshold};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn min_failure() -> InputFailure {
        InputFailure::new(
            "input.title",
            "Int_min_3",
            CoercionError::from(ConstraintError::new(
                "title",
                ConstraintKind::Min,
                Threshold::Number(3.0),
                "Must be at least 3",
            )),
        )
    }

    #[test]
    fn test_default_shape() {
        let reported = ErrorReporter::new().report("input", &json!({"title": 2}), &min_failure());

        assert_eq!(
            reported.to_json(),
            json!({
                "message": "Variable \"$input\" got invalid value {\"title\":2}; Expected type \"Int_min_3\" at \"input.title\"; Must be at least 3",
                "originalError": {
                    "message": "Must be at least 3",
                    "code": "ERR_GRAPHQL_CONSTRAINT_VALIDATION",
                    "fieldName": "title",
                    "context": [{"arg": "min", "value": 3}],
                },
            })
        );
    }

    #[test]
    fn test_hook_replaces_constraint_errors() {
        let hook: FormatErrorFn = Arc::new(|err: &ConstraintError| json!({"code": err.code, "kind": err.kind()}));
        let reported = ErrorReporter::new()
            .with_hook(hook)
            .report("input", &json!({"title": 2}), &min_failure());

        assert_eq!(
            reported,
            ReportedError::Custom(json!({"code": "ERR_GRAPHQL_CONSTRAINT_VALIDATION", "kind": "min"}))
        );
    }

    #[test]
    fn test_hook_does_not_touch_type_errors() {
        let hook: FormatErrorFn = Arc::new(|_: &ConstraintError| json!("custom"));
        let failure = InputFailure::new(
            "title",
            "Int_min_3",
            CoercionError::invalid("Int cannot represent non-integer value: \"x\""),
        );
        let reported = ErrorReporter::new()
            .with_hook(hook)
            .report("title", &json!("x"), &failure);

        let default = reported.as_default().unwrap();
        assert!(default.message.ends_with("Int cannot represent non-integer value: \"x\""));
        assert_eq!(default.original_error, None);
        assert_eq!(reported.to_json().get("originalError"), None);
    }

    #[test]
    fn test_original_error_can_be_hidden() {
        let reported = ErrorReporter::new()
            .expose_original_error(false)
            .report("input", &json!({"title": 2}), &min_failure());
        assert_eq!(reported.as_default().unwrap().original_error, None);
    }
}
