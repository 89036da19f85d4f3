//! Builder pattern for creating schemas.
//!
//! This module provides ergonomic builders for constructing schemas and
//! their declarations with a fluent API.

use crate::{
    Coercer, Directive, FieldDefinition, InputObjectTypeDefinition, InputValueDefinition,
    ObjectTypeDefinition, ScalarTypeDefinition, Schema, SchemaError, TypeDefinition, TypeRef,
    Value,
};
use std::sync::Arc;

/// Builder for creating a [`Schema`].
///
/// # Example
///
/// ```rust
/// use constraint_core::{FieldBuilder, InputValueBuilder, ObjectTypeBuilder, SchemaBuilder};
///
/// let schema = SchemaBuilder::new()
///     .query(
///         ObjectTypeBuilder::new("Query")
///             .field(
///                 FieldBuilder::new("book", "String")
///                     .argument(
///                         InputValueBuilder::new("id", "ID!")
///                             .constraint(|c| c.with_argument("minLength", 1))
///                             .build(),
///                     )
///                     .build(),
///             )
///             .build(),
///     )
///     .build()
///     .expect("valid schema");
///
/// assert!(schema.object("Query").is_some());
/// ```
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    types: Vec<TypeDefinition>,
    query_type: Option<String>,
    mutation_type: Option<String>,
}

impl SchemaBuilder {
    /// Creates a new schema builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the root query type.
    pub fn query(mut self, object: ObjectTypeDefinition) -> Self {
        self.query_type = Some(object.name.clone());
        self.types.push(TypeDefinition::Object(object));
        self
    }

    /// Adds the root mutation type.
    pub fn mutation(mut self, object: ObjectTypeDefinition) -> Self {
        self.mutation_type = Some(object.name.clone());
        self.types.push(TypeDefinition::Object(object));
        self
    }

    /// Adds an object type.
    pub fn object(mut self, object: ObjectTypeDefinition) -> Self {
        self.types.push(TypeDefinition::Object(object));
        self
    }

    /// Adds an input-object type.
    pub fn input_object(mut self, input: InputObjectTypeDefinition) -> Self {
        self.types.push(TypeDefinition::InputObject(input));
        self
    }

    /// Adds a custom scalar backed by `coercer`.
    pub fn scalar(mut self, coercer: Arc<dyn Coercer>) -> Self {
        self.types.push(TypeDefinition::Scalar(ScalarTypeDefinition {
            name: coercer.name().to_string(),
            coercer,
        }));
        self
    }

    /// Builds the schema and checks every type reference.
    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut schema = Schema::new();
        for definition in self.types {
            schema.add_type(definition)?;
        }
        if let Some(query) = self.query_type {
            schema.set_query_type(query);
        }
        if let Some(mutation) = self.mutation_type {
            schema.set_mutation_type(mutation);
        }
        schema.validate_references()?;
        Ok(schema)
    }
}

fn parse_type(type_ref: &str) -> TypeRef {
    type_ref
        .parse()
        .unwrap_or_else(|err| panic!("invalid type reference: {err}"))
}

/// Builder for creating an [`ObjectTypeDefinition`].
#[derive(Debug)]
pub struct ObjectTypeBuilder {
    name: String,
    description: Option<String>,
    fields: Vec<FieldDefinition>,
}

impl ObjectTypeBuilder {
    /// Creates a new object type builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    /// Sets the type description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a field.
    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Builds the object type.
    pub fn build(self) -> ObjectTypeDefinition {
        ObjectTypeDefinition {
            name: self.name,
            description: self.description,
            fields: self.fields,
        }
    }
}

/// Builder for creating an [`InputObjectTypeDefinition`].
#[derive(Debug)]
pub struct InputObjectBuilder {
    name: String,
    description: Option<String>,
    fields: Vec<InputValueDefinition>,
}

impl InputObjectBuilder {
    /// Creates a new input-object builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    /// Sets the type description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an input field.
    pub fn field(mut self, field: InputValueDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Builds the input-object type.
    pub fn build(self) -> InputObjectTypeDefinition {
        InputObjectTypeDefinition {
            name: self.name,
            description: self.description,
            fields: self.fields,
        }
    }
}

/// Builder for creating a [`FieldDefinition`].
///
/// # Example
///
/// ```rust
/// use constraint_core::FieldBuilder;
///
/// let field = FieldBuilder::new("rating", "Int")
///     .description("Average rating")
///     .constraint(|c| c.with_argument("min", 0).with_argument("max", 5))
///     .build();
///
/// assert_eq!(field.directives.len(), 1);
/// ```
#[derive(Debug)]
pub struct FieldBuilder {
    name: String,
    field_type: TypeRef,
    description: Option<String>,
    arguments: Vec<InputValueDefinition>,
    directives: Vec<Directive>,
}

impl FieldBuilder {
    /// Creates a new field builder.
    ///
    /// # Panics
    ///
    /// Panics if `field_type` is not valid type syntax.
    pub fn new(name: impl Into<String>, field_type: &str) -> Self {
        Self {
            name: name.into(),
            field_type: parse_type(field_type),
            description: None,
            arguments: Vec::new(),
            directives: Vec::new(),
        }
    }

    /// Sets the field description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an argument.
    pub fn argument(mut self, argument: InputValueDefinition) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Applies a directive.
    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    /// Applies a `@constraint` directive built by `f`.
    pub fn constraint(self, f: impl FnOnce(Directive) -> Directive) -> Self {
        self.directive(f(Directive::new(crate::CONSTRAINT_DIRECTIVE)))
    }

    /// Builds the field.
    pub fn build(self) -> FieldDefinition {
        FieldDefinition {
            name: self.name,
            description: self.description,
            field_type: self.field_type,
            arguments: self.arguments,
            directives: self.directives,
        }
    }
}

/// Builder for creating an [`InputValueDefinition`] (argument or input field).
#[derive(Debug)]
pub struct InputValueBuilder {
    name: String,
    value_type: TypeRef,
    description: Option<String>,
    default_value: Option<Value>,
    directives: Vec<Directive>,
}

impl InputValueBuilder {
    /// Creates a new input value builder.
    ///
    /// # Panics
    ///
    /// Panics if `value_type` is not valid type syntax.
    pub fn new(name: impl Into<String>, value_type: &str) -> Self {
        Self {
            name: name.into(),
            value_type: parse_type(value_type),
            description: None,
            default_value: None,
            directives: Vec::new(),
        }
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the default value.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Applies a directive.
    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    /// Applies a `@constraint` directive built by `f`.
    pub fn constraint(self, f: impl FnOnce(Directive) -> Directive) -> Self {
        self.directive(f(Directive::new(crate::CONSTRAINT_DIRECTIVE)))
    }

    /// Builds the input value.
    pub fn build(self) -> InputValueDefinition {
        InputValueDefinition {
            name: self.name,
            description: self.description,
            value_type: self.value_type,
            default_value: self.default_value,
            directives: self.directives,
        }
    }
}
