//! Schema transformation.
//!
//! Walks every object field, field argument and input field of a schema and
//! rewires each `@constraint`-annotated declaration to a wrapped scalar.
//! The source schema is left untouched; a new one is returned.

use crate::{ConstrainedScalar, ResolvedConstraints, extract_spec};
use constraint_core::{
    CONSTRAINT_DIRECTIVE, Coercer, ConstraintSpec, Directive, ScalarTypeDefinition, Schema,
    SchemaError, TypeDefinition, TypeRef,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// One declaration whose type was replaced by a wrapped scalar.
#[derive(Debug, Clone, PartialEq)]
pub struct RewiredDeclaration {
    /// `Type.field`, `Type.field(arg:)` or `Input.field`
    pub coordinate: String,
    /// The declared type
    pub original: TypeRef,
    /// The type after rewiring, wrappers preserved
    pub rewired: TypeRef,
}

/// Applies constraint annotations to schemas.
///
/// Wrapped scalars are memoized per (base scalar name, constraint spec), so
/// declarations with identical constraints share one scalar instance.
///
/// # Example
///
/// ```rust
/// use constraint_core::{InputObjectBuilder, InputValueBuilder, SchemaBuilder};
/// use constraint_validator::ConstraintTransformer;
///
/// let schema = SchemaBuilder::new()
///     .input_object(
///         InputObjectBuilder::new("BookInput")
///             .field(
///                 InputValueBuilder::new("title", "String!")
///                     .constraint(|c| c.with_argument("minLength", 1))
///                     .build(),
///             )
///             .build(),
///     )
///     .build()
///     .unwrap();
///
/// let mut transformer = ConstraintTransformer::new();
/// let transformed = transformer.apply(&schema).unwrap();
///
/// let title = transformed.input_object("BookInput").unwrap().field("title").unwrap();
/// assert_eq!(title.value_type.to_string(), "String_minLength_1!");
/// assert!(title.directives.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct ConstraintTransformer {
    memo: HashMap<(String, ConstraintSpec), Arc<ConstrainedScalar>>,
    names: HashSet<String>,
    rewired: Vec<RewiredDeclaration>,
}

impl ConstraintTransformer {
    /// Creates a transformer with an empty scalar cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every wrapped scalar built so far, ordered by name.
    pub fn wrapped_scalars(&self) -> Vec<&Arc<ConstrainedScalar>> {
        let mut scalars: Vec<_> = self.memo.values().collect();
        scalars.sort_by(|a, b| a.name().cmp(b.name()));
        scalars
    }

    /// Returns the declarations rewired by the last [`apply`](Self::apply).
    pub fn rewired(&self) -> &[RewiredDeclaration] {
        &self.rewired
    }

    /// Transforms `schema`, returning a new schema without constraint
    /// annotations and with the wrapped scalars registered.
    ///
    /// # Errors
    ///
    /// Any invalid constraint declaration aborts the transform; see
    /// [`extract_spec`] and [`ResolvedConstraints::resolve`]. Additionally:
    ///
    /// - `RepeatedConstraint` when one declaration carries two annotations
    /// - `UnknownType` / `NotAScalar` when the declared type is not a scalar
    /// - `DuplicateTypeName` when a declared `uniqueTypeName` is already taken
    ///
    /// Generated names that collide (sanitization maps different thresholds
    /// to the same characters, or a schema type already has the name) get a
    /// numeric suffix instead.
    pub fn apply(&mut self, schema: &Schema) -> Result<Schema, SchemaError> {
        self.rewired.clear();
        let mut output = schema.clone();
        let mut used: BTreeMap<String, Arc<ConstrainedScalar>> = BTreeMap::new();

        for definition in schema.types() {
            match definition {
                TypeDefinition::Scalar(_) => {}
                TypeDefinition::Object(object) => {
                    let mut object = object.clone();
                    for field in &mut object.fields {
                        let coordinate = format!("{}.{}", object.name, field.name);
                        self.rewire(
                            schema,
                            &coordinate,
                            &mut field.field_type,
                            &mut field.directives,
                            &mut used,
                        )?;
                        for arg in &mut field.arguments {
                            let coordinate = format!("{coordinate}({}:)", arg.name);
                            self.rewire(
                                schema,
                                &coordinate,
                                &mut arg.value_type,
                                &mut arg.directives,
                                &mut used,
                            )?;
                        }
                    }
                    output.replace_type(TypeDefinition::Object(object));
                }
                TypeDefinition::InputObject(input) => {
                    let mut input = input.clone();
                    for field in &mut input.fields {
                        let coordinate = format!("{}.{}", input.name, field.name);
                        self.rewire(
                            schema,
                            &coordinate,
                            &mut field.value_type,
                            &mut field.directives,
                            &mut used,
                        )?;
                    }
                    output.replace_type(TypeDefinition::InputObject(input));
                }
            }
        }

        for (name, scalar) in used {
            let coercer: Arc<dyn Coercer> = scalar;
            match output.get_type(&name) {
                None => {
                    output.replace_type(TypeDefinition::Scalar(ScalarTypeDefinition {
                        name,
                        coercer,
                    }));
                }
                Some(TypeDefinition::Scalar(existing))
                    if std::ptr::addr_eq(Arc::as_ptr(&existing.coercer), Arc::as_ptr(&coercer)) => {}
                Some(_) => return Err(SchemaError::DuplicateTypeName(name)),
            }
        }

        info!(
            "Applied constraints to {} declarations ({} wrapped scalars)",
            self.rewired.len(),
            self.memo.len()
        );

        Ok(output)
    }

    fn rewire(
        &mut self,
        schema: &Schema,
        coordinate: &str,
        type_ref: &mut TypeRef,
        directives: &mut Vec<Directive>,
        used: &mut BTreeMap<String, Arc<ConstrainedScalar>>,
    ) -> Result<(), SchemaError> {
        let Some(index) = directives
            .iter()
            .position(|d| d.name == CONSTRAINT_DIRECTIVE)
        else {
            return Ok(());
        };
        if directives[index + 1..]
            .iter()
            .any(|d| d.name == CONSTRAINT_DIRECTIVE)
        {
            return Err(SchemaError::RepeatedConstraint(coordinate.to_string()));
        }

        let spec = extract_spec(coordinate, &directives[index])?;

        let base_name = type_ref.base_name().to_string();
        let base = match schema.get_type(&base_name) {
            Some(TypeDefinition::Scalar(def)) => Arc::clone(&def.coercer),
            Some(_) => {
                return Err(SchemaError::NotAScalar {
                    coordinate: coordinate.to_string(),
                    type_name: base_name,
                });
            }
            None => return Err(SchemaError::unknown_type(coordinate, base_name)),
        };

        let scalar = self.wrap(schema, coordinate, &base_name, base, spec)?;
        let rewired = type_ref.with_base_name(scalar.name());
        debug!("Rewired {} from {} to {}", coordinate, type_ref, rewired);

        self.rewired.push(RewiredDeclaration {
            coordinate: coordinate.to_string(),
            original: type_ref.clone(),
            rewired: rewired.clone(),
        });
        directives.remove(index);
        *type_ref = rewired;
        used.insert(scalar.name().to_string(), scalar);

        Ok(())
    }

    fn wrap(
        &mut self,
        schema: &Schema,
        coordinate: &str,
        base_name: &str,
        base: Arc<dyn Coercer>,
        spec: ConstraintSpec,
    ) -> Result<Arc<ConstrainedScalar>, SchemaError> {
        let key = (base_name.to_string(), spec);
        if let Some(existing) = self.memo.get(&key) {
            return Ok(Arc::clone(existing));
        }

        let name = if key.1.unique_type_name().is_some() {
            let name = key.1.type_name(base_name);
            if self.names.contains(&name) {
                return Err(SchemaError::DuplicateTypeName(name));
            }
            name
        } else {
            self.free_name(schema, key.1.type_name(base_name))
        };

        let constraints = ResolvedConstraints::resolve(coordinate, &key.1, base.as_ref())?;
        let scalar = Arc::new(ConstrainedScalar::new(name.clone(), base, constraints));
        debug!("Created wrapped scalar {} {}", name, key.1);

        self.names.insert(name);
        self.memo.insert(key, Arc::clone(&scalar));
        Ok(scalar)
    }

    /// Suffixes a generated name with `_2`, `_3`, ... until no other wrapped
    /// scalar or schema type uses it.
    fn free_name(&self, schema: &Schema, generated: String) -> String {
        let taken = |name: &str| self.names.contains(name) || schema.get_type(name).is_some();
        if !taken(&generated) {
            return generated;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{generated}_{n}");
            if !taken(&candidate) {
                debug!("Generated name {} is taken, using {}", generated, candidate);
                return candidate;
            }
            n += 1;
        }
    }
}

/// Transforms `schema` with a fresh [`ConstraintTransformer`].
pub fn apply_constraints(schema: &Schema) -> Result<Schema, SchemaError> {
    ConstraintTransformer::new().apply(schema)
}
