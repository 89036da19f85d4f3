//! End-to-end checks driven by YAML schema documents.

use constraint_core::SchemaError;
use constraint_parser::parse_yaml;
use constraint_validator::{
    ConstraintEngine, EngineError, Request, STATUS_BAD_REQUEST, STATUS_OK, apply_constraints,
};
use pretty_assertions::assert_eq;
use serde_json::json;

/// A schema whose `echo(value: String)` argument carries `constraint`.
fn echo_schema(constraint: &str) -> String {
    format!(
        r#"
query: Query
types:
  - name: Query
    kind: object
    fields:
      - name: echo
        type: String
        arguments:
          - name: value
            type: String
            constraint: '{constraint}'
"#
    )
}

fn echo_engine(constraint: &str) -> ConstraintEngine {
    let schema = parse_yaml(&echo_schema(constraint)).unwrap();
    ConstraintEngine::builder(schema)
        .resolver("echo", |args| args.get("value").cloned().unwrap_or_default())
        .build()
        .unwrap()
}

fn build_error(constraint: &str) -> SchemaError {
    let schema = parse_yaml(&echo_schema(constraint)).unwrap();
    match ConstraintEngine::builder(schema).build() {
        Err(EngineError::Schema(err)) => err,
        other => panic!("expected a schema error, got {other:?}"),
    }
}

/// Runs `echo` with `value` and returns the reason of the reported error, if any.
fn reason(engine: &ConstraintEngine, value: &str) -> Option<String> {
    let response = engine.execute(&Request::query("echo").variable("value", value));
    if response.status == STATUS_OK {
        assert_eq!(response.data, Some(json!({"echo": value})));
        return None;
    }
    assert_eq!(response.status, STATUS_BAD_REQUEST);
    let error = response.errors[0].as_default().unwrap();
    Some(error.original_error.as_ref().unwrap().message.clone())
}

#[test]
fn test_string_kinds() {
    let cases = [
        ("@constraint(minLength: 3)", "abc", "ab", "Must be at least 3 characters in length"),
        ("@constraint(maxLength: 3)", "abc", "abcd", "Must be no more than 3 characters in length"),
        ("@constraint(startsWith: \"foo\")", "foobar", "barfoo", "Must start with foo"),
        ("@constraint(endsWith: \"foo\")", "barfoo", "foobar", "Must end with foo"),
        ("@constraint(contains: \"oo\")", "book", "bark", "Must contain oo"),
        ("@constraint(notContains: \"oo\")", "bark", "book", "Must not contain oo"),
        ("@constraint(pattern: \"^[a-z]+$\")", "abc", "ab1", "Must match ^[a-z]+$"),
    ];

    for (constraint, valid, invalid, expected) in cases {
        let engine = echo_engine(constraint);
        assert_eq!(reason(&engine, valid), None, "{constraint} with {valid}");
        assert_eq!(
            reason(&engine, invalid).as_deref(),
            Some(expected),
            "{constraint} with {invalid}"
        );
    }
}

#[test]
fn test_lengths_count_characters() {
    let engine = echo_engine("@constraint(maxLength: 3)");
    assert_eq!(reason(&engine, "été"), None);
}

#[test]
fn test_formats() {
    let cases = [
        ("byte", "aGVsbG8=", "not base64!", "Must be in byte format"),
        ("date-time", "2018-11-13T20:20:39+00:00", "2018-11-13", "Must be a date-time in RFC 3339 format"),
        ("date", "2018-11-13", "2018-13-45", "Must be a date in ISO 8601 format"),
        ("email", "reader@example.com", "reader", "Must be in email format"),
        ("ipv4", "127.0.0.1", "300.1.1.1", "Must be in IP v4 format"),
        ("ipv6", "::1", "127.0.0.1", "Must be in IP v6 format"),
        ("uri", "https://example.com/books", "not a uri", "Must be in URI format"),
        ("uuid", "123e4567-e89b-12d3-a456-426614174000", "123e4567", "Must be in UUID format"),
    ];

    for (format, valid, invalid, expected) in cases {
        let engine = echo_engine(&format!("@constraint(format: \"{format}\")"));
        assert_eq!(reason(&engine, valid), None, "{format} with {valid}");
        assert_eq!(
            reason(&engine, invalid).as_deref(),
            Some(expected),
            "{format} with {invalid}"
        );
    }
}

#[test]
fn test_null_is_never_validated() {
    let engine = echo_engine("@constraint(minLength: 3)");
    let response = engine.execute(&Request::query("echo").variable("value", serde_json::Value::Null));
    assert_eq!(response.status, STATUS_OK);
    assert_eq!(response.data, Some(json!({"echo": null})));
}

#[test]
fn test_build_errors() {
    assert!(matches!(
        build_error("@constraint(minimum: 3)"),
        SchemaError::UnknownArgument { .. }
    ));
    assert!(matches!(
        build_error("@constraint(min: 3)"),
        SchemaError::IncompatibleConstraint { .. }
    ));
    assert!(matches!(
        build_error("@constraint(minLength: \"three\")"),
        SchemaError::InvalidThreshold { .. }
    ));
    assert!(matches!(
        build_error("@constraint(pattern: \"[a-z\")"),
        SchemaError::InvalidPattern { .. }
    ));
    assert!(matches!(
        build_error("@constraint(format: \"phone\")"),
        SchemaError::InvalidFormat { .. }
    ));
    assert!(matches!(
        build_error("@constraint(uniqueTypeName: \"Short\")"),
        SchemaError::EmptyConstraint(_)
    ));
}

#[test]
fn test_zero_multiple_of_is_rejected() {
    let yaml = r#"
query: Query
types:
  - name: Query
    kind: object
    fields:
      - name: page
        type: Int
        arguments:
          - name: size
            type: Int
            constraint: { multipleOf: 0 }
"#;
    let schema = parse_yaml(yaml).unwrap();
    let err = apply_constraints(&schema).unwrap_err();
    assert_eq!(err, SchemaError::ZeroMultipleOf("Query.page(size:)".to_string()));
}

#[test]
fn test_shared_declarations_share_one_scalar() {
    let yaml = r#"
mutation: Mutation
types:
  - name: Mutation
    kind: object
    fields:
      - name: rename
        type: String
        arguments:
          - name: from
            type: String!
            constraint: "@constraint(maxLength: 5)"
          - name: to
            type: String!
            constraint: "@constraint(maxLength: 5)"
"#;
    let schema = apply_constraints(&parse_yaml(yaml).unwrap()).unwrap();
    let printed = schema.to_sdl();

    assert!(printed.contains("scalar String_maxLength_5"));
    assert!(printed.contains("from: String_maxLength_5!"));
    assert!(printed.contains("to: String_maxLength_5!"));
    assert_eq!(printed.matches("scalar String_maxLength_5").count(), 1);
    assert!(!printed.contains("@constraint"));
}

#[test]
fn test_transforming_twice_is_stable() {
    let yaml = echo_schema("@constraint(minLength: 2, maxLength: 8)");
    let once = apply_constraints(&parse_yaml(&yaml).unwrap()).unwrap();
    let twice = apply_constraints(&once).unwrap();
    assert_eq!(once.to_sdl(), twice.to_sdl());
}

#[test]
fn test_nested_list_paths() {
    let yaml = r#"
mutation: Mutation
types:
  - name: Mutation
    kind: object
    fields:
      - name: tag
        type: Boolean
        arguments:
          - name: input
            type: TagInput!
  - name: TagInput
    kind: input
    fields:
      - name: tags
        type: "[String!]"
        constraint: "@constraint(minLength: 2)"
"#;
    let engine = ConstraintEngine::builder(parse_yaml(yaml).unwrap()).build().unwrap();
    let response = engine.execute(
        &Request::mutation("tag").variable("input", json!({"tags": ["ok", "x"]})),
    );

    assert_eq!(response.status, STATUS_BAD_REQUEST);
    let message = &response.errors[0].as_default().unwrap().message;
    assert!(message.contains("at \"input.tags[1]\""), "{message}");
    assert!(message.ends_with("; Must be at least 2 characters in length"));
}
