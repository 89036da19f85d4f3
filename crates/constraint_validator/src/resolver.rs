//! Constraint spec resolution.
//!
//! Turns the raw arguments of a `@constraint(...)` directive into a
//! [`ConstraintSpec`], then compiles that spec against a base scalar into
//! [`ResolvedConstraints`]: the ordered list of active validators. Every
//! problem with a declaration is reported here, at build time.

use crate::format::Format;
use crate::validators;
use constraint_core::{
    Coercer, ConstraintKind, ConstraintSpec, Directive, SchemaError, Threshold,
    UNIQUE_TYPE_NAME_ARG, Value,
};
use regex::Regex;

fn is_type_name(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Extracts the constraint spec declared by a `@constraint` directive.
///
/// Checks argument names and threshold shapes. Compatibility with the
/// decorated scalar is checked later by [`ResolvedConstraints::resolve`].
///
/// # Errors
///
/// - `UnknownArgument` for names outside the closed set of kinds
/// - `InvalidThreshold` for a threshold of the wrong shape
/// - `InvalidTypeName` for a malformed `uniqueTypeName`
/// - `EmptyConstraint` when no kind is declared
pub fn extract_spec(coordinate: &str, directive: &Directive) -> Result<ConstraintSpec, SchemaError> {
    let mut spec = ConstraintSpec::new();

    for (name, value) in &directive.arguments {
        if name == UNIQUE_TYPE_NAME_ARG {
            match value {
                Value::String(type_name) if is_type_name(type_name) => {
                    spec = spec.with_unique_type_name(type_name.clone());
                }
                other => {
                    return Err(SchemaError::InvalidTypeName {
                        coordinate: coordinate.to_string(),
                        actual: other.to_string(),
                    });
                }
            }
            continue;
        }

        let kind: ConstraintKind = name.parse().map_err(|_| SchemaError::UnknownArgument {
            coordinate: coordinate.to_string(),
            argument: name.clone(),
        })?;

        spec.insert(kind, threshold_for(coordinate, kind, value)?);
    }

    if spec.is_empty() {
        return Err(SchemaError::EmptyConstraint(coordinate.to_string()));
    }

    Ok(spec)
}

fn threshold_for(
    coordinate: &str,
    kind: ConstraintKind,
    value: &Value,
) -> Result<Threshold, SchemaError> {
    let invalid = |expected| SchemaError::invalid_threshold(coordinate, kind, expected, value.to_string());

    match kind {
        ConstraintKind::MinLength | ConstraintKind::MaxLength => match value {
            Value::Int(n) if *n >= 0 => Ok(Threshold::from(*n)),
            Value::Float(f) if *f >= 0.0 && f.fract() == 0.0 => Ok(Threshold::Number(*f)),
            _ => Err(invalid("a non-negative integer")),
        },
        kind if kind.is_numeric() => match value {
            Value::Int(n) => Ok(Threshold::from(*n)),
            Value::Float(f) if f.is_finite() => Ok(Threshold::Number(*f)),
            _ => Err(invalid("a number")),
        },
        _ => match value {
            Value::String(s) => Ok(Threshold::Text(s.clone())),
            _ => Err(invalid("a string")),
        },
    }
}

/// A compiled validator.
#[derive(Debug, Clone)]
enum Rule {
    Min(f64),
    Max(f64),
    ExclusiveMin(f64),
    ExclusiveMax(f64),
    MultipleOf(f64),
    MinLength(usize),
    MaxLength(usize),
    StartsWith(String),
    EndsWith(String),
    Contains(String),
    NotContains(String),
    Pattern(Regex),
    Format(Format),
}

impl Rule {
    /// Runs the validator. Values of a shape the rule does not apply to pass.
    fn check(&self, value: &Value) -> Result<(), String> {
        match self {
            Rule::Min(t) => value.as_f64().map_or(Ok(()), |v| validators::min(v, *t)),
            Rule::Max(t) => value.as_f64().map_or(Ok(()), |v| validators::max(v, *t)),
            Rule::ExclusiveMin(t) => value
                .as_f64()
                .map_or(Ok(()), |v| validators::exclusive_min(v, *t)),
            Rule::ExclusiveMax(t) => value
                .as_f64()
                .map_or(Ok(()), |v| validators::exclusive_max(v, *t)),
            Rule::MultipleOf(t) => value
                .as_f64()
                .map_or(Ok(()), |v| validators::multiple_of(v, *t)),
            Rule::MinLength(t) => value
                .as_str()
                .map_or(Ok(()), |s| validators::min_length(s, *t)),
            Rule::MaxLength(t) => value
                .as_str()
                .map_or(Ok(()), |s| validators::max_length(s, *t)),
            Rule::StartsWith(t) => value
                .as_str()
                .map_or(Ok(()), |s| validators::starts_with(s, t)),
            Rule::EndsWith(t) => value.as_str().map_or(Ok(()), |s| validators::ends_with(s, t)),
            Rule::Contains(t) => value.as_str().map_or(Ok(()), |s| validators::contains(s, t)),
            Rule::NotContains(t) => value
                .as_str()
                .map_or(Ok(()), |s| validators::not_contains(s, t)),
            Rule::Pattern(regex) => value
                .as_str()
                .map_or(Ok(()), |s| validators::pattern(s, regex)),
            Rule::Format(format) => value.as_str().map_or(Ok(()), |s| format.check(s)),
        }
    }
}

/// A failed validator: which constraint, its threshold, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// The failing kind
    pub kind: ConstraintKind,
    /// Its declared threshold
    pub threshold: Threshold,
    /// Human-readable reason
    pub reason: String,
}

#[derive(Debug, Clone)]
struct ActiveConstraint {
    kind: ConstraintKind,
    threshold: Threshold,
    rule: Rule,
}

/// The active validators for one spec, in canonical order.
#[derive(Debug, Clone)]
pub struct ResolvedConstraints {
    spec: ConstraintSpec,
    active: Vec<ActiveConstraint>,
}

impl ResolvedConstraints {
    /// Compiles `spec` for values of the `base` scalar.
    ///
    /// # Errors
    ///
    /// - `IncompatibleConstraint` when a kind does not apply to the scalar
    /// - `ZeroMultipleOf` for `multipleOf: 0`
    /// - `InvalidPattern` when `pattern` does not compile
    /// - `InvalidFormat` for an unknown format name
    pub fn resolve(
        coordinate: &str,
        spec: &ConstraintSpec,
        base: &dyn Coercer,
    ) -> Result<Self, SchemaError> {
        let scalar_kind = base.kind();
        let mut active = Vec::with_capacity(spec.len());

        for (kind, threshold) in spec.iter() {
            let compatible = if kind.is_numeric() {
                scalar_kind.is_numeric()
            } else {
                scalar_kind.is_textual()
            };
            if !compatible {
                return Err(SchemaError::IncompatibleConstraint {
                    coordinate: coordinate.to_string(),
                    kind,
                    scalar: base.name().to_string(),
                });
            }

            let rule = compile(coordinate, kind, threshold)?;
            active.push(ActiveConstraint {
                kind,
                threshold: threshold.clone(),
                rule,
            });
        }

        if active.is_empty() {
            return Err(SchemaError::EmptyConstraint(coordinate.to_string()));
        }

        Ok(Self {
            spec: spec.clone(),
            active,
        })
    }

    /// Returns the spec these constraints were compiled from.
    pub fn spec(&self) -> &ConstraintSpec {
        &self.spec
    }

    /// Returns the active kinds in validation order.
    pub fn kinds(&self) -> impl Iterator<Item = ConstraintKind> + '_ {
        self.active.iter().map(|c| c.kind)
    }

    /// Runs every validator in canonical order and stops at the first failure.
    ///
    /// Null is never validated.
    pub fn check(&self, value: &Value) -> Result<(), Violation> {
        if value.is_null() {
            return Ok(());
        }

        for constraint in &self.active {
            if let Err(reason) = constraint.rule.check(value) {
                return Err(Violation {
                    kind: constraint.kind,
                    threshold: constraint.threshold.clone(),
                    reason,
                });
            }
        }

        Ok(())
    }
}

fn compile(coordinate: &str, kind: ConstraintKind, threshold: &Threshold) -> Result<Rule, SchemaError> {
    let shape = |expected| {
        SchemaError::invalid_threshold(coordinate, kind, expected, threshold.to_string())
    };
    let number = || threshold.as_f64().ok_or_else(|| shape("a number"));
    let text = || {
        threshold
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| shape("a string"))
    };
    let length = || {
        threshold
            .as_f64()
            .filter(|n| *n >= 0.0 && n.fract() == 0.0)
            .map(|n| n as usize)
            .ok_or_else(|| shape("a non-negative integer"))
    };

    Ok(match kind {
        ConstraintKind::Min => Rule::Min(number()?),
        ConstraintKind::Max => Rule::Max(number()?),
        ConstraintKind::ExclusiveMin => Rule::ExclusiveMin(number()?),
        ConstraintKind::ExclusiveMax => Rule::ExclusiveMax(number()?),
        ConstraintKind::MultipleOf => {
            let divisor = number()?;
            if divisor == 0.0 {
                return Err(SchemaError::ZeroMultipleOf(coordinate.to_string()));
            }
            Rule::MultipleOf(divisor)
        }
        ConstraintKind::MinLength => Rule::MinLength(length()?),
        ConstraintKind::MaxLength => Rule::MaxLength(length()?),
        ConstraintKind::StartsWith => Rule::StartsWith(text()?),
        ConstraintKind::EndsWith => Rule::EndsWith(text()?),
        ConstraintKind::Contains => Rule::Contains(text()?),
        ConstraintKind::NotContains => Rule::NotContains(text()?),
        ConstraintKind::Pattern => {
            let source = text()?;
            let regex = Regex::new(&source).map_err(|e| SchemaError::InvalidPattern {
                coordinate: coordinate.to_string(),
                error: e.to_string(),
            })?;
            Rule::Pattern(regex)
        }
        ConstraintKind::Format => {
            let name = text()?;
            let format = name.parse::<Format>().map_err(|format| SchemaError::InvalidFormat {
                coordinate: coordinate.to_string(),
                format,
            })?;
            Rule::Format(format)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use constraint_core::BuiltinScalar;
    use pretty_assertions::assert_eq;

    fn directive(args: &[(&str, Value)]) -> Directive {
        args.iter().fold(Directive::new("constraint"), |d, (name, value)| {
            d.with_argument(*name, value.clone())
        })
    }

    fn resolve(args: &[(&str, Value)], base: BuiltinScalar) -> Result<ResolvedConstraints, SchemaError> {
        let spec = extract_spec("BookInput.title", &directive(args))?;
        ResolvedConstraints::resolve("BookInput.title", &spec, &base)
    }

    #[test]
    fn test_extract_spec() {
        let spec = extract_spec(
            "BookInput.title",
            &directive(&[
                ("maxLength", Value::Int(64)),
                ("minLength", Value::Int(1)),
                ("uniqueTypeName", Value::from("Title")),
            ]),
        )
        .unwrap();

        assert_eq!(spec.len(), 2);
        assert_eq!(spec.get(ConstraintKind::MinLength), Some(&Threshold::Number(1.0)));
        assert_eq!(spec.unique_type_name(), Some("Title"));
    }

    #[test]
    fn test_unknown_argument() {
        let err = extract_spec("A.b", &directive(&[("minimum", Value::Int(1))])).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownArgument {
                coordinate: "A.b".to_string(),
                argument: "minimum".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_constraint() {
        assert_eq!(
            extract_spec("A.b", &directive(&[])),
            Err(SchemaError::EmptyConstraint("A.b".to_string()))
        );
        assert_eq!(
            extract_spec("A.b", &directive(&[("uniqueTypeName", Value::from("X"))])),
            Err(SchemaError::EmptyConstraint("A.b".to_string()))
        );
    }

    #[test]
    fn test_threshold_shapes() {
        let cases = [
            ("min", Value::from("3")),
            ("multipleOf", Value::Boolean(true)),
            ("minLength", Value::Int(-1)),
            ("maxLength", Value::Float(2.5)),
            ("pattern", Value::Int(1)),
            ("format", Value::Null),
        ];
        for (name, value) in cases {
            let result = extract_spec("A.b", &directive(&[(name, value)]));
            assert!(
                matches!(result, Err(SchemaError::InvalidThreshold { .. })),
                "{name}: {result:?}"
            );
        }
    }

    #[test]
    fn test_invalid_unique_type_name() {
        let result = extract_spec(
            "A.b",
            &directive(&[("min", Value::Int(1)), ("uniqueTypeName", Value::from("my type"))]),
        );
        assert!(matches!(result, Err(SchemaError::InvalidTypeName { .. })));
    }

    #[test]
    fn test_incompatible_kinds() {
        let err = resolve(&[("minLength", Value::Int(1))], BuiltinScalar::INT).unwrap_err();
        assert_eq!(
            err,
            SchemaError::IncompatibleConstraint {
                coordinate: "BookInput.title".to_string(),
                kind: ConstraintKind::MinLength,
                scalar: "Int".to_string(),
            }
        );
        assert!(resolve(&[("min", Value::Int(1))], BuiltinScalar::STRING).is_err());
        assert!(resolve(&[("min", Value::Int(1))], BuiltinScalar::BOOLEAN).is_err());
        assert!(resolve(&[("format", Value::from("uuid"))], BuiltinScalar::ID).is_ok());
    }

    #[test]
    fn test_zero_multiple_of() {
        assert_eq!(
            resolve(&[("multipleOf", Value::Int(0))], BuiltinScalar::INT).unwrap_err(),
            SchemaError::ZeroMultipleOf("BookInput.title".to_string())
        );
    }

    #[test]
    fn test_bad_pattern_and_format() {
        assert!(matches!(
            resolve(&[("pattern", Value::from("(unclosed"))], BuiltinScalar::STRING),
            Err(SchemaError::InvalidPattern { .. })
        ));
        let err = resolve(&[("format", Value::from("phone"))], BuiltinScalar::STRING).unwrap_err();
        assert_eq!(err.to_string(), "Invalid format type phone on BookInput.title");
    }

    #[test]
    fn test_check_is_fail_fast_in_canonical_order() {
        let resolved = resolve(
            &[
                ("multipleOf", Value::Int(2)),
                ("max", Value::Int(10)),
                ("min", Value::Int(5)),
            ],
            BuiltinScalar::INT,
        )
        .unwrap();

        assert_eq!(
            resolved.kinds().collect::<Vec<_>>(),
            vec![ConstraintKind::Min, ConstraintKind::Max, ConstraintKind::MultipleOf]
        );

        // 3 violates both min and multipleOf; min comes first
        let violation = resolved.check(&Value::Int(3)).unwrap_err();
        assert_eq!(violation.kind, ConstraintKind::Min);
        assert_eq!(violation.reason, "Must be at least 5");

        let violation = resolved.check(&Value::Int(7)).unwrap_err();
        assert_eq!(violation.kind, ConstraintKind::MultipleOf);
        assert_eq!(violation.threshold, Threshold::Number(2.0));

        assert!(resolved.check(&Value::Int(8)).is_ok());
        assert!(resolved.check(&Value::Null).is_ok());
    }

    #[test]
    fn test_check_same_value_is_deterministic() {
        let resolved = resolve(
            &[("minLength", Value::Int(3)), ("contains", Value::from("x"))],
            BuiltinScalar::STRING,
        )
        .unwrap();
        let first = resolved.check(&Value::from("ab"));
        for _ in 0..10 {
            assert_eq!(resolved.check(&Value::from("ab")), first);
        }
    }
}
