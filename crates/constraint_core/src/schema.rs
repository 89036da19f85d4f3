//! Schema model.
//!
//! A minimal typed schema: scalar, object and input-object types, fields with
//! arguments, input fields, type references and directives. This is the
//! graph the constraint transformer walks and the request-coercion harness
//! executes against.

use crate::{BuiltinScalar, Coercer, SchemaError, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A reference to a type, possibly wrapped in list and non-null modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A named type (`Int`, `BookInput`)
    Named(String),
    /// A non-null wrapper (`Int!`)
    NonNull(Box<TypeRef>),
    /// A list wrapper (`[Int]`)
    List(Box<TypeRef>),
}

impl TypeRef {
    /// Creates a named type reference.
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    /// Wraps a type reference in non-null.
    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }

    /// Wraps a type reference in a list.
    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    /// Returns the innermost named type.
    pub fn base_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::NonNull(inner) | TypeRef::List(inner) => inner.base_name(),
        }
    }

    /// Returns true for a non-null reference.
    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    /// Returns a copy with the innermost named type replaced, keeping every wrapper.
    pub fn with_base_name(&self, name: &str) -> TypeRef {
        match self {
            TypeRef::Named(_) => TypeRef::Named(name.to_string()),
            TypeRef::NonNull(inner) => TypeRef::non_null(inner.with_base_name(name)),
            TypeRef::List(inner) => TypeRef::list(inner.with_base_name(name)),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
        }
    }
}

fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parses SDL type syntax: `Int`, `Int!`, `[String!]!`.
impl FromStr for TypeRef {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || SchemaError::InvalidTypeRef(s.to_string());

        if let Some(inner) = trimmed.strip_suffix('!') {
            let inner: TypeRef = inner.parse().map_err(|_| invalid())?;
            if inner.is_non_null() {
                return Err(invalid());
            }
            return Ok(TypeRef::non_null(inner));
        }

        if let Some(inner) = trimmed.strip_prefix('[') {
            let inner = inner.strip_suffix(']').ok_or_else(invalid)?;
            return Ok(TypeRef::list(inner.parse().map_err(|_| invalid())?));
        }

        if is_name(trimmed) {
            Ok(TypeRef::named(trimmed))
        } else {
            Err(invalid())
        }
    }
}

/// A directive applied to a declaration, e.g. `@constraint(min: 3)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Directive {
    /// Directive name without the `@`
    pub name: String,
    /// Arguments by name
    pub arguments: BTreeMap<String, Value>,
}

impl Directive {
    /// Creates a directive without arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: BTreeMap::new(),
        }
    }

    /// Adds an argument.
    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }
}

/// An argument or input-field declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct InputValueDefinition {
    /// Argument / input field name
    pub name: String,
    /// Optional human-readable description
    pub description: Option<String>,
    /// Declared input type
    pub value_type: TypeRef,
    /// Value used when the caller omits this input
    pub default_value: Option<Value>,
    /// Applied directives
    pub directives: Vec<Directive>,
}

/// A field declaration on an object type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    /// Field name
    pub name: String,
    /// Optional human-readable description
    pub description: Option<String>,
    /// Declared output type
    pub field_type: TypeRef,
    /// Field arguments
    pub arguments: Vec<InputValueDefinition>,
    /// Applied directives
    pub directives: Vec<Directive>,
}

impl FieldDefinition {
    /// Looks up an argument by name.
    pub fn argument(&self, name: &str) -> Option<&InputValueDefinition> {
        self.arguments.iter().find(|arg| arg.name == name)
    }
}

/// A scalar type backed by a coercer.
#[derive(Debug, Clone)]
pub struct ScalarTypeDefinition {
    /// Type name
    pub name: String,
    /// Coercion functions
    pub coercer: Arc<dyn Coercer>,
}

/// An object (output) type.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectTypeDefinition {
    /// Type name
    pub name: String,
    /// Optional human-readable description
    pub description: Option<String>,
    /// Fields in declaration order
    pub fields: Vec<FieldDefinition>,
}

impl ObjectTypeDefinition {
    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// An input-object type.
#[derive(Debug, Clone, PartialEq)]
pub struct InputObjectTypeDefinition {
    /// Type name
    pub name: String,
    /// Optional human-readable description
    pub description: Option<String>,
    /// Input fields in declaration order
    pub fields: Vec<InputValueDefinition>,
}

impl InputObjectTypeDefinition {
    /// Looks up an input field by name.
    pub fn field(&self, name: &str) -> Option<&InputValueDefinition> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Any named type definition.
#[derive(Debug, Clone)]
pub enum TypeDefinition {
    /// Scalar type
    Scalar(ScalarTypeDefinition),
    /// Object type
    Object(ObjectTypeDefinition),
    /// Input-object type
    InputObject(InputObjectTypeDefinition),
}

impl TypeDefinition {
    /// Returns the type name.
    pub fn name(&self) -> &str {
        match self {
            TypeDefinition::Scalar(def) => &def.name,
            TypeDefinition::Object(def) => &def.name,
            TypeDefinition::InputObject(def) => &def.name,
        }
    }

    /// Returns true if values of this type may appear in inputs.
    pub fn is_input_type(&self) -> bool {
        matches!(self, TypeDefinition::Scalar(_) | TypeDefinition::InputObject(_))
    }
}

/// The operation kinds a schema exposes root fields for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OperationType {
    /// Read operation
    #[default]
    Query,
    /// Write operation
    Mutation,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationType::Query => f.write_str("query"),
            OperationType::Mutation => f.write_str("mutation"),
        }
    }
}

/// A complete schema: named types plus root operation types.
///
/// The built-in scalars are always present. Cloning is cheap for scalars,
/// whose coercers are shared.
#[derive(Debug, Clone)]
pub struct Schema {
    types: BTreeMap<String, TypeDefinition>,
    query_type: Option<String>,
    mutation_type: Option<String>,
}

impl Schema {
    /// Creates a schema containing only the built-in scalars.
    pub fn new() -> Self {
        let types = BuiltinScalar::ALL
            .iter()
            .map(|scalar| {
                (
                    scalar.name().to_string(),
                    TypeDefinition::Scalar(ScalarTypeDefinition {
                        name: scalar.name().to_string(),
                        coercer: Arc::new(*scalar),
                    }),
                )
            })
            .collect();

        Self {
            types,
            query_type: None,
            mutation_type: None,
        }
    }

    /// Adds a type definition, rejecting duplicates.
    pub fn add_type(&mut self, definition: TypeDefinition) -> Result<(), SchemaError> {
        let name = definition.name().to_string();
        if self.types.contains_key(&name) {
            return Err(SchemaError::DuplicateType(name));
        }
        self.types.insert(name, definition);
        Ok(())
    }

    /// Inserts or replaces a type definition, returning the previous one.
    pub fn replace_type(&mut self, definition: TypeDefinition) -> Option<TypeDefinition> {
        self.types.insert(definition.name().to_string(), definition)
    }

    /// Sets the root query type name.
    pub fn set_query_type(&mut self, name: impl Into<String>) {
        self.query_type = Some(name.into());
    }

    /// Sets the root mutation type name.
    pub fn set_mutation_type(&mut self, name: impl Into<String>) {
        self.mutation_type = Some(name.into());
    }

    /// Returns the root query type name.
    pub fn query_type(&self) -> Option<&str> {
        self.query_type.as_deref()
    }

    /// Returns the root mutation type name.
    pub fn mutation_type(&self) -> Option<&str> {
        self.mutation_type.as_deref()
    }

    /// Returns the root type name for an operation.
    pub fn root_type(&self, operation: OperationType) -> Option<&str> {
        match operation {
            OperationType::Query => self.query_type(),
            OperationType::Mutation => self.mutation_type(),
        }
    }

    /// Looks up a type by name.
    pub fn get_type(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    /// Iterates over all types, ordered by name.
    pub fn types(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types.values()
    }

    /// Looks up a scalar's coercer by type name.
    pub fn scalar(&self, name: &str) -> Option<&Arc<dyn Coercer>> {
        match self.types.get(name) {
            Some(TypeDefinition::Scalar(def)) => Some(&def.coercer),
            _ => None,
        }
    }

    /// Looks up an object type by name.
    pub fn object(&self, name: &str) -> Option<&ObjectTypeDefinition> {
        match self.types.get(name) {
            Some(TypeDefinition::Object(def)) => Some(def),
            _ => None,
        }
    }

    /// Looks up an input-object type by name.
    pub fn input_object(&self, name: &str) -> Option<&InputObjectTypeDefinition> {
        match self.types.get(name) {
            Some(TypeDefinition::InputObject(def)) => Some(def),
            _ => None,
        }
    }

    /// Looks up a root field for an operation.
    pub fn root_field(&self, operation: OperationType, name: &str) -> Option<&FieldDefinition> {
        self.root_type(operation)
            .and_then(|root| self.object(root))
            .and_then(|root| root.field(name))
    }

    /// Checks that every type reference resolves and that argument and
    /// input-field types are input types.
    pub fn validate_references(&self) -> Result<(), SchemaError> {
        for root in [&self.query_type, &self.mutation_type].into_iter().flatten() {
            if self.object(root).is_none() {
                return Err(SchemaError::unknown_type("schema root", root));
            }
        }

        for definition in self.types.values() {
            match definition {
                TypeDefinition::Scalar(_) => {}
                TypeDefinition::Object(object) => {
                    for field in &object.fields {
                        let coordinate = format!("{}.{}", object.name, field.name);
                        self.resolve(&coordinate, &field.field_type, false)?;
                        for arg in &field.arguments {
                            let coordinate = format!("{coordinate}({}:)", arg.name);
                            self.resolve(&coordinate, &arg.value_type, true)?;
                        }
                    }
                }
                TypeDefinition::InputObject(input) => {
                    for field in &input.fields {
                        let coordinate = format!("{}.{}", input.name, field.name);
                        self.resolve(&coordinate, &field.value_type, true)?;
                    }
                }
            }
        }

        Ok(())
    }

    fn resolve(&self, coordinate: &str, type_ref: &TypeRef, input: bool) -> Result<(), SchemaError> {
        match self.types.get(type_ref.base_name()) {
            None => Err(SchemaError::unknown_type(coordinate, type_ref.base_name())),
            Some(def) if input && !def.is_input_type() => Err(SchemaError::InvalidTypeRef(format!(
                "{coordinate} uses output type '{}' as an input",
                def.name()
            ))),
            Some(_) => Ok(()),
        }
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_type_refs() {
        assert_eq!("Int".parse::<TypeRef>().unwrap(), TypeRef::named("Int"));
        assert_eq!(
            "Int!".parse::<TypeRef>().unwrap(),
            TypeRef::non_null(TypeRef::named("Int"))
        );
        assert_eq!(
            "[String!]!".parse::<TypeRef>().unwrap(),
            TypeRef::non_null(TypeRef::list(TypeRef::non_null(TypeRef::named("String"))))
        );
    }

    #[test]
    fn test_parse_invalid_type_refs() {
        for bad in ["", "Int!!", "[Int", "1Int", "Int-2", "[]"] {
            assert!(bad.parse::<TypeRef>().is_err(), "expected error for {bad:?}");
        }
    }

    #[test]
    fn test_type_ref_display_round_trips() {
        for text in ["Int", "Int!", "[Int]", "[[ID!]]!"] {
            assert_eq!(text.parse::<TypeRef>().unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_with_base_name_keeps_wrappers() {
        let ty: TypeRef = "[Int!]!".parse().unwrap();
        assert_eq!(ty.with_base_name("Int_min_3").to_string(), "[Int_min_3!]!");
        assert_eq!(ty.base_name(), "Int");
    }

    #[test]
    fn test_new_schema_has_builtin_scalars() {
        let schema = Schema::new();
        for name in ["Int", "Float", "String", "Boolean", "ID"] {
            assert!(schema.scalar(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let mut schema = Schema::new();
        let err = schema
            .add_type(TypeDefinition::InputObject(InputObjectTypeDefinition {
                name: "Int".to_string(),
                description: None,
                fields: vec![],
            }))
            .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateType("Int".to_string()));
    }

    #[test]
    fn test_validate_references_reports_unknown_type() {
        let mut schema = Schema::new();
        schema
            .add_type(TypeDefinition::InputObject(InputObjectTypeDefinition {
                name: "BookInput".to_string(),
                description: None,
                fields: vec![InputValueDefinition {
                    name: "title".to_string(),
                    description: None,
                    value_type: "Title!".parse().unwrap(),
                    default_value: None,
                    directives: vec![],
                }],
            }))
            .unwrap();

        assert_eq!(
            schema.validate_references(),
            Err(SchemaError::unknown_type("BookInput.title", "Title"))
        );
    }
}
