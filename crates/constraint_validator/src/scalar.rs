//! Constrained scalars.
//!
//! A [`ConstrainedScalar`] decorates a base scalar's coercer: input coercion
//! runs the base first and validates the result, output coercion is the
//! base's unchanged.

use crate::ResolvedConstraints;
use constraint_core::{Coercer, CoercionError, ConstraintError, ScalarKind, Value};
use std::sync::Arc;

/// A scalar wrapping a base scalar with a set of constraints.
#[derive(Debug, Clone)]
pub struct ConstrainedScalar {
    name: String,
    base: Arc<dyn Coercer>,
    constraints: Arc<ResolvedConstraints>,
}

impl ConstrainedScalar {
    /// Wraps `base` under the type name `name`.
    pub fn new(
        name: impl Into<String>,
        base: Arc<dyn Coercer>,
        constraints: ResolvedConstraints,
    ) -> Self {
        Self {
            name: name.into(),
            base,
            constraints: Arc::new(constraints),
        }
    }

    /// Returns the decorated scalar.
    pub fn base(&self) -> &Arc<dyn Coercer> {
        &self.base
    }

    /// Returns the constraints enforced on input.
    pub fn constraints(&self) -> &ResolvedConstraints {
        &self.constraints
    }
}

impl Coercer for ConstrainedScalar {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ScalarKind {
        self.base.kind()
    }

    fn parse_value(&self, value: &Value, field_name: &str) -> Result<Value, CoercionError> {
        // type errors from the base surface unchanged
        let coerced = self.base.parse_value(value, field_name)?;

        self.constraints.check(&coerced).map_err(|violation| {
            ConstraintError::new(
                field_name,
                violation.kind,
                violation.threshold,
                violation.reason,
            )
        })?;

        Ok(coerced)
    }

    fn serialize(&self, value: &Value) -> Result<Value, CoercionError> {
        self.base.serialize(value)
    }

    fn description(&self) -> Option<&str> {
        self.base.description()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use constraint_core::{BuiltinScalar, ConstraintKind, ConstraintSpec, Threshold};
    use pretty_assertions::assert_eq;

    fn wrapped(base: BuiltinScalar, spec: ConstraintSpec) -> ConstrainedScalar {
        let constraints = ResolvedConstraints::resolve("BookInput.title", &spec, &base).unwrap();
        ConstrainedScalar::new(spec.type_name(base.name()), Arc::new(base), constraints)
    }

    #[test]
    fn test_accepts_valid_values() {
        let scalar = wrapped(
            BuiltinScalar::INT,
            ConstraintSpec::new().with(ConstraintKind::Min, 3i64),
        );
        assert_eq!(scalar.name(), "Int_min_3");
        assert_eq!(scalar.kind(), ScalarKind::Int);
        assert_eq!(scalar.parse_value(&Value::Int(3), "title"), Ok(Value::Int(3)));
    }

    #[test]
    fn test_constraint_violation_names_the_field() {
        let scalar = wrapped(
            BuiltinScalar::INT,
            ConstraintSpec::new().with(ConstraintKind::Min, 3i64),
        );
        let err = scalar.parse_value(&Value::Int(2), "title").unwrap_err();
        assert_eq!(
            err,
            CoercionError::Constraint(ConstraintError::new(
                "title",
                ConstraintKind::Min,
                Threshold::Number(3.0),
                "Must be at least 3",
            ))
        );
    }

    #[test]
    fn test_type_errors_pass_through_unchanged() {
        let scalar = wrapped(
            BuiltinScalar::INT,
            ConstraintSpec::new().with(ConstraintKind::Min, 3i64),
        );
        let value = Value::from("three");
        assert_eq!(
            scalar.parse_value(&value, "title"),
            BuiltinScalar::INT.parse_value(&value, "title")
        );
    }

    #[test]
    fn test_null_is_not_validated() {
        let scalar = wrapped(
            BuiltinScalar::STRING,
            ConstraintSpec::new().with(ConstraintKind::MinLength, 5i64),
        );
        assert_eq!(scalar.parse_value(&Value::Null, "title"), Ok(Value::Null));
    }

    #[test]
    fn test_output_is_not_validated() {
        let scalar = wrapped(
            BuiltinScalar::INT,
            ConstraintSpec::new().with(ConstraintKind::Max, 3i64),
        );
        assert_eq!(scalar.serialize(&Value::Int(100)), Ok(Value::Int(100)));
    }

    #[test]
    fn test_validates_coerced_value() {
        // ID coerces integers to strings before the length check
        let scalar = wrapped(
            BuiltinScalar::ID,
            ConstraintSpec::new().with(ConstraintKind::MaxLength, 3i64),
        );
        assert_eq!(
            scalar.parse_value(&Value::Int(123), "id"),
            Ok(Value::String("123".to_string()))
        );
        assert!(scalar.parse_value(&Value::Int(1234), "id").is_err());
    }
}
