//! Input value coercion.
//!
//! Coerces an inbound value against a declared input type, recursing through
//! non-null and list wrappers and input objects and delegating leaf values to
//! the schema's scalar coercers. This is the channel constraint violations
//! travel through: a wrapped scalar's error surfaces here like any type error.

use crate::InputFailure;
use constraint_core::{CoercionError, Schema, TypeDefinition, TypeRef, Value};
use std::collections::BTreeMap;

/// Coerces `value` against `type_ref`.
///
/// `field_name` is the declaration the value belongs to and `path` locates
/// the value for error messages.
pub fn coerce_input(
    schema: &Schema,
    type_ref: &TypeRef,
    value: &Value,
    field_name: &str,
    path: &str,
) -> Result<Value, InputFailure> {
    match type_ref {
        TypeRef::NonNull(inner) => {
            if value.is_null() {
                return Err(InputFailure::new(
                    path,
                    type_ref.to_string(),
                    CoercionError::invalid(format!(
                        "Expected non-nullable type \"{type_ref}\" not to be null"
                    )),
                ));
            }
            coerce_input(schema, inner, value, field_name, path)
        }
        _ if value.is_null() => Ok(Value::Null),
        TypeRef::List(inner) => match value {
            Value::List(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| coerce_input(schema, inner, item, field_name, &format!("{path}[{i}]")))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            // a single value is promoted to a one-item list
            _ => Ok(Value::List(vec![coerce_input(
                schema, inner, value, field_name, path,
            )?])),
        },
        TypeRef::Named(name) => coerce_named(schema, name, value, field_name, path),
    }
}

fn coerce_named(
    schema: &Schema,
    name: &str,
    value: &Value,
    field_name: &str,
    path: &str,
) -> Result<Value, InputFailure> {
    let fail = |message: String| InputFailure::new(path, name, CoercionError::invalid(message));

    match schema.get_type(name) {
        Some(TypeDefinition::Scalar(scalar)) => scalar
            .coercer
            .parse_value(value, field_name)
            .map_err(|error| InputFailure::new(path, name, error)),
        Some(TypeDefinition::InputObject(input)) => {
            let Value::Object(fields) = value else {
                return Err(fail(format!("Expected type \"{name}\" to be an object")));
            };

            if let Some(unknown) = fields.keys().find(|key| input.field(key).is_none()) {
                return Err(fail(format!(
                    "Field \"{unknown}\" is not defined by type \"{name}\""
                )));
            }

            let mut coerced = BTreeMap::new();
            for field in &input.fields {
                match fields.get(&field.name) {
                    Some(field_value) => {
                        let field_path = format!("{path}.{}", field.name);
                        let value = coerce_input(
                            schema,
                            &field.value_type,
                            field_value,
                            &field.name,
                            &field_path,
                        )?;
                        coerced.insert(field.name.clone(), value);
                    }
                    None => {
                        if let Some(default) = &field.default_value {
                            coerced.insert(field.name.clone(), default.clone());
                        } else if field.value_type.is_non_null() {
                            return Err(fail(format!(
                                "Field \"{name}.{}\" of required type \"{}\" was not provided",
                                field.name, field.value_type
                            )));
                        }
                    }
                }
            }
            Ok(Value::Object(coerced))
        }
        Some(TypeDefinition::Object(_)) => {
            Err(fail(format!("Type \"{name}\" is not an input type")))
        }
        None => Err(fail(format!("Unknown type \"{name}\""))),
    }
}

/// Serializes a result value through the output coercers of `type_ref`.
///
/// Output values are never validated against constraints.
pub fn serialize_output(
    schema: &Schema,
    type_ref: &TypeRef,
    value: &Value,
) -> Result<Value, CoercionError> {
    if value.is_null() {
        return Ok(Value::Null);
    }

    match type_ref {
        TypeRef::NonNull(inner) => serialize_output(schema, inner, value),
        TypeRef::List(inner) => match value {
            Value::List(items) => items
                .iter()
                .map(|item| serialize_output(schema, inner, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            _ => serialize_output(schema, inner, value),
        },
        TypeRef::Named(name) => match schema.scalar(name) {
            Some(coercer) => coercer.serialize(value),
            None => Ok(value.clone()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apply_constraints;
    use constraint_core::{InputObjectBuilder, InputValueBuilder, SchemaBuilder};
    use pretty_assertions::assert_eq;

    fn schema() -> Schema {
        let schema = SchemaBuilder::new()
            .input_object(
                InputObjectBuilder::new("BookInput")
                    .field(
                        InputValueBuilder::new("title", "String!")
                            .constraint(|c| c.with_argument("minLength", 3))
                            .build(),
                    )
                    .field(
                        InputValueBuilder::new("tags", "[String!]")
                            .constraint(|c| c.with_argument("maxLength", 5))
                            .build(),
                    )
                    .field(InputValueBuilder::new("pages", "Int").default_value(100).build())
                    .build(),
            )
            .build()
            .unwrap();
        apply_constraints(&schema).unwrap()
    }

    fn book_input() -> TypeRef {
        "BookInput!".parse().unwrap()
    }

    fn object(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn test_coerces_valid_input_with_defaults() {
        let coerced = coerce_input(
            &schema(),
            &book_input(),
            &object(serde_json::json!({"title": "Dune", "tags": "sf"})),
            "input",
            "input",
        )
        .unwrap();

        assert_eq!(
            coerced,
            object(serde_json::json!({"title": "Dune", "tags": ["sf"], "pages": 100}))
        );
    }

    #[test]
    fn test_constraint_failure_carries_path_and_field() {
        let failure = coerce_input(
            &schema(),
            &book_input(),
            &object(serde_json::json!({"title": "Dune", "tags": ["ok", "too long"]})),
            "input",
            "input",
        )
        .unwrap_err();

        assert_eq!(failure.path, "input.tags[1]");
        assert_eq!(failure.expected_type, "String_maxLength_5");
        let violation = failure.error.as_constraint().unwrap();
        assert_eq!(violation.field_name, "tags");
        assert_eq!(violation.message, "Must be no more than 5 characters in length");
    }

    #[test]
    fn test_structural_errors() {
        let schema = schema();

        let missing = coerce_input(&schema, &book_input(), &object(serde_json::json!({})), "input", "input")
            .unwrap_err();
        assert_eq!(
            missing.error.to_string(),
            "Field \"BookInput.title\" of required type \"String_minLength_3!\" was not provided"
        );

        let unknown = coerce_input(
            &schema,
            &book_input(),
            &object(serde_json::json!({"title": "Dune", "isbn": "x"})),
            "input",
            "input",
        )
        .unwrap_err();
        assert_eq!(
            unknown.error.to_string(),
            "Field \"isbn\" is not defined by type \"BookInput\""
        );

        let null = coerce_input(&schema, &book_input(), &Value::Null, "input", "input").unwrap_err();
        assert_eq!(null.expected_type, "BookInput!");
        assert!(null.error.as_constraint().is_none());
    }

    #[test]
    fn test_serialize_output_skips_validation() {
        let schema = schema();
        let ty: TypeRef = "[String_maxLength_5]".parse().unwrap();
        let value = Value::List(vec![Value::from("much too long")]);
        assert_eq!(serialize_output(&schema, &ty, &value), Ok(value.clone()));
    }
}
