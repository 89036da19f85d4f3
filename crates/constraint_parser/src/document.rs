//! Schema documents.
//!
//! The serialized form of a schema as written in YAML or TOML files. A
//! document is converted into a [`Schema`] with [`SchemaDocument::into_schema`],
//! which parses type references and directive annotations and checks that
//! every referenced type exists.

use crate::{ParserError, Result, directive};
use constraint_core::{
    CONSTRAINT_DIRECTIVE, CustomScalar, Directive, FieldDefinition, InputObjectTypeDefinition,
    InputValueDefinition, ObjectTypeDefinition, ScalarTypeDefinition, Schema, TypeDefinition,
    TypeRef, Value,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A schema as written in a document.
///
/// # Example
///
/// ```yaml
/// mutation: Mutation
/// types:
///   - name: Mutation
///     kind: object
///     fields:
///       - name: createBook
///         type: String
///         arguments:
///           - name: input
///             type: BookInput!
///   - name: BookInput
///     kind: input
///     fields:
///       - name: title
///         type: Int!
///         constraint: "@constraint(min: 3)"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Name of the root query type
    #[serde(default)]
    pub query: Option<String>,

    /// Name of the root mutation type
    #[serde(default)]
    pub mutation: Option<String>,

    /// Type definitions
    #[serde(default)]
    pub types: Vec<TypeDocument>,
}

/// Kind of a documented type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// Object (output) type
    Object,
    /// Input-object type
    Input,
    /// Custom scalar, passed through unchanged
    Scalar,
}

/// One type definition in a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDocument {
    /// Type name
    pub name: String,

    /// Type kind
    pub kind: TypeKind,

    /// Optional human-readable description
    #[serde(default)]
    pub description: Option<String>,

    /// Fields (object) or input fields (input)
    #[serde(default)]
    pub fields: Vec<FieldDocument>,
}

/// A field, argument or input field in a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDocument {
    /// Field name
    pub name: String,

    /// Type reference in SDL syntax (e.g. "Int!", "[String!]")
    #[serde(rename = "type")]
    pub field_type: String,

    /// Optional human-readable description
    #[serde(default)]
    pub description: Option<String>,

    /// Default value (arguments and input fields only)
    #[serde(default)]
    pub default: Option<serde_json::Value>,

    /// Arguments (object fields only)
    #[serde(default)]
    pub arguments: Vec<FieldDocument>,

    /// Constraint declaration, as an annotation or as an argument map
    #[serde(default)]
    pub constraint: Option<ConstraintDocument>,

    /// Other directive annotations, e.g. "@deprecated"
    #[serde(default)]
    pub directives: Vec<String>,
}

/// A constraint declaration in a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstraintDocument {
    /// Annotation syntax: `"@constraint(min: 3, max: 10)"`
    Annotation(String),
    /// Argument map: `{ min: 3, max: 10 }`
    Arguments(BTreeMap<String, serde_json::Value>),
}

impl SchemaDocument {
    /// Converts the document into a schema.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid type syntax, invalid directive syntax,
    /// duplicate types, or references to unknown types.
    pub fn into_schema(self) -> Result<Schema> {
        let mut schema = Schema::new();

        for ty in self.types {
            let definition = match ty.kind {
                TypeKind::Scalar => {
                    if !ty.fields.is_empty() {
                        return Err(ParserError::InvalidDocument(format!(
                            "scalar '{}' cannot declare fields",
                            ty.name
                        )));
                    }
                    let mut scalar = CustomScalar::new(&ty.name);
                    if let Some(description) = ty.description {
                        scalar = scalar.with_description(description);
                    }
                    TypeDefinition::Scalar(ScalarTypeDefinition {
                        name: ty.name,
                        coercer: Arc::new(scalar),
                    })
                }
                TypeKind::Object => {
                    let fields = ty
                        .fields
                        .into_iter()
                        .map(|field| convert_field(&ty.name, field))
                        .collect::<Result<Vec<_>>>()?;
                    TypeDefinition::Object(ObjectTypeDefinition {
                        name: ty.name,
                        description: ty.description,
                        fields,
                    })
                }
                TypeKind::Input => {
                    let fields = ty
                        .fields
                        .into_iter()
                        .map(|field| {
                            let coordinate = format!("{}.{}", ty.name, field.name);
                            if !field.arguments.is_empty() {
                                return Err(ParserError::InvalidDocument(format!(
                                    "input field {coordinate} cannot declare arguments"
                                )));
                            }
                            convert_input_value(&coordinate, field)
                        })
                        .collect::<Result<Vec<_>>>()?;
                    TypeDefinition::InputObject(InputObjectTypeDefinition {
                        name: ty.name,
                        description: ty.description,
                        fields,
                    })
                }
            };
            schema.add_type(definition)?;
        }

        if let Some(query) = self.query {
            schema.set_query_type(query);
        }
        if let Some(mutation) = self.mutation {
            schema.set_mutation_type(mutation);
        }
        schema.validate_references()?;

        Ok(schema)
    }
}

fn convert_field(type_name: &str, field: FieldDocument) -> Result<FieldDefinition> {
    let coordinate = format!("{type_name}.{}", field.name);
    if field.default.is_some() {
        return Err(ParserError::InvalidDocument(format!(
            "field {coordinate} cannot declare a default value"
        )));
    }

    let arguments = field
        .arguments
        .into_iter()
        .map(|arg| {
            let coordinate = format!("{coordinate}({}:)", arg.name);
            if !arg.arguments.is_empty() {
                return Err(ParserError::InvalidDocument(format!(
                    "argument {coordinate} cannot declare arguments"
                )));
            }
            convert_input_value(&coordinate, arg)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(FieldDefinition {
        field_type: field.field_type.parse::<TypeRef>()?,
        directives: convert_directives(&coordinate, field.constraint, &field.directives)?,
        name: field.name,
        description: field.description,
        arguments,
    })
}

fn convert_input_value(coordinate: &str, field: FieldDocument) -> Result<InputValueDefinition> {
    Ok(InputValueDefinition {
        value_type: field.field_type.parse::<TypeRef>()?,
        directives: convert_directives(coordinate, field.constraint, &field.directives)?,
        default_value: field.default.map(Value::from),
        name: field.name,
        description: field.description,
    })
}

fn convert_directives(
    coordinate: &str,
    constraint: Option<ConstraintDocument>,
    annotations: &[String],
) -> Result<Vec<Directive>> {
    let mut directives = Vec::new();

    match constraint {
        Some(ConstraintDocument::Annotation(text)) => {
            let parsed = directive::parse_directive(&text).map_err(|source| ParserError::Syntax {
                coordinate: coordinate.to_string(),
                source,
            })?;
            if parsed.name != CONSTRAINT_DIRECTIVE {
                return Err(ParserError::InvalidDocument(format!(
                    "expected @{CONSTRAINT_DIRECTIVE} on {coordinate}, found @{}",
                    parsed.name
                )));
            }
            directives.push(parsed);
        }
        Some(ConstraintDocument::Arguments(arguments)) => {
            directives.push(Directive {
                name: CONSTRAINT_DIRECTIVE.to_string(),
                arguments: arguments
                    .into_iter()
                    .map(|(name, value)| (name, Value::from(value)))
                    .collect(),
            });
        }
        None => {}
    }

    for annotation in annotations {
        let parsed =
            directive::parse_directives(annotation).map_err(|source| ParserError::Syntax {
                coordinate: coordinate.to_string(),
                source,
            })?;
        directives.extend(parsed);
    }

    Ok(directives)
}
