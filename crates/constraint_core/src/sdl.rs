//! SDL printing.
//!
//! Renders a [`Schema`] in schema definition language. Built-in scalars are
//! omitted; every other type is printed in name order.

use crate::{
    Directive, FieldDefinition, InputValueDefinition, Schema, TypeDefinition, Value,
};
use std::fmt::Write;

/// Renders a value as a literal.
pub fn print_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => serde_json::Value::String(s.clone()).to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::List(items) => format!(
            "[{}]",
            items.iter().map(print_value).collect::<Vec<_>>().join(", ")
        ),
        Value::Object(map) => format!(
            "{{{}}}",
            map.iter()
                .map(|(k, v)| format!("{k}: {}", print_value(v)))
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

fn print_directives(directives: &[Directive]) -> String {
    let mut out = String::new();
    for directive in directives {
        out.push_str(" @");
        out.push_str(&directive.name);
        if !directive.arguments.is_empty() {
            let args: Vec<String> = directive
                .arguments
                .iter()
                .map(|(name, value)| format!("{name}: {}", print_value(value)))
                .collect();
            let _ = write!(out, "({})", args.join(", "));
        }
    }
    out
}

fn print_description(out: &mut String, description: Option<&str>, indent: &str) {
    if let Some(description) = description {
        let _ = writeln!(
            out,
            "{indent}{}",
            serde_json::Value::String(description.to_string())
        );
    }
}

fn print_input_value(value: &InputValueDefinition) -> String {
    let mut out = format!("{}: {}", value.name, value.value_type);
    if let Some(default) = &value.default_value {
        let _ = write!(out, " = {}", print_value(default));
    }
    out.push_str(&print_directives(&value.directives));
    out
}

fn print_field(out: &mut String, field: &FieldDefinition) {
    print_description(out, field.description.as_deref(), "  ");
    let _ = write!(out, "  {}", field.name);
    if !field.arguments.is_empty() {
        let args: Vec<String> = field.arguments.iter().map(print_input_value).collect();
        let _ = write!(out, "({})", args.join(", "));
    }
    let _ = writeln!(
        out,
        ": {}{}",
        field.field_type,
        print_directives(&field.directives)
    );
}

impl Schema {
    /// Renders the schema as SDL.
    pub fn to_sdl(&self) -> String {
        let mut out = String::new();

        if self.query_type().is_some() || self.mutation_type().is_some() {
            out.push_str("schema {\n");
            if let Some(query) = self.query_type() {
                let _ = writeln!(out, "  query: {query}");
            }
            if let Some(mutation) = self.mutation_type() {
                let _ = writeln!(out, "  mutation: {mutation}");
            }
            out.push_str("}\n");
        }

        for definition in self.types() {
            match definition {
                TypeDefinition::Scalar(scalar) => {
                    if crate::BuiltinScalar::is_builtin_name(&scalar.name) {
                        continue;
                    }
                    out.push('\n');
                    print_description(&mut out, scalar.coercer.description(), "");
                    let _ = writeln!(out, "scalar {}", scalar.name);
                }
                TypeDefinition::Object(object) => {
                    out.push('\n');
                    print_description(&mut out, object.description.as_deref(), "");
                    let _ = writeln!(out, "type {} {{", object.name);
                    for field in &object.fields {
                        print_field(&mut out, field);
                    }
                    out.push_str("}\n");
                }
                TypeDefinition::InputObject(input) => {
                    out.push('\n');
                    print_description(&mut out, input.description.as_deref(), "");
                    let _ = writeln!(out, "input {} {{", input.name);
                    for field in &input.fields {
                        print_description(&mut out, field.description.as_deref(), "  ");
                        let _ = writeln!(out, "  {}", print_input_value(field));
                    }
                    out.push_str("}\n");
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldBuilder, InputObjectBuilder, InputValueBuilder, ObjectTypeBuilder, SchemaBuilder};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_print_schema() {
        let schema = SchemaBuilder::new()
            .mutation(
                ObjectTypeBuilder::new("Mutation")
                    .field(
                        FieldBuilder::new("createBook", "String")
                            .argument(InputValueBuilder::new("input", "BookInput!").build())
                            .build(),
                    )
                    .build(),
            )
            .input_object(
                InputObjectBuilder::new("BookInput")
                    .description("A new book")
                    .field(
                        InputValueBuilder::new("title", "Int!")
                            .constraint(|c| c.with_argument("min", 3))
                            .build(),
                    )
                    .field(InputValueBuilder::new("tag", "String").default_value("new").build())
                    .build(),
            )
            .build()
            .unwrap();

        let expected = r#"schema {
  mutation: Mutation
}

"A new book"
input BookInput {
  title: Int! @constraint(min: 3)
  tag: String = "new"
}

type Mutation {
  createBook(input: BookInput!): String
}
"#;
        assert_eq!(schema.to_sdl(), expected);
    }

    #[test]
    fn test_print_values() {
        let value = Value::Object(
            [
                ("a".to_string(), Value::List(vec![Value::Int(1), Value::Float(2.5)])),
                ("b".to_string(), Value::String("x\"y".to_string())),
            ]
            .into_iter()
            .collect(),
        );
        assert_eq!(print_value(&value), r#"{a: [1, 2.5], b: "x\"y"}"#);
    }
}
