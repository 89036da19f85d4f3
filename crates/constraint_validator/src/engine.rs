//! Request coercion harness.
//!
//! [`ConstraintEngine`] plays the part of a schema's request pipeline: it
//! applies constraints to the schema once, then coerces each request's
//! variables against the root field's arguments, reports failures at the
//! boundary and runs the field resolver.

use crate::{
    ConstraintTransformer, EngineConfig, EngineError, ErrorReporter, FormatErrorFn, ReportedError,
    RewiredDeclaration, coerce_input, serialize_output,
};
use constraint_core::{ConstraintError, OperationType, Schema, Value};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Status of a request whose inputs were accepted.
pub const STATUS_OK: u16 = 200;

/// Status of a request rejected during input coercion.
pub const STATUS_BAD_REQUEST: u16 = 400;

/// Resolves a root field from its coerced arguments.
pub type Resolver = Arc<dyn Fn(&BTreeMap<String, Value>) -> Value + Send + Sync>;

/// A request for one root field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    /// Query or mutation
    pub operation: OperationType,
    /// Root field name
    pub field: String,
    /// Variables, each bound to the argument of the same name
    pub variables: serde_json::Map<String, serde_json::Value>,
}

impl Request {
    /// Creates a query request for `field`.
    pub fn query(field: impl Into<String>) -> Self {
        Self {
            operation: OperationType::Query,
            field: field.into(),
            variables: serde_json::Map::new(),
        }
    }

    /// Creates a mutation request for `field`.
    pub fn mutation(field: impl Into<String>) -> Self {
        Self {
            operation: OperationType::Mutation,
            field: field.into(),
            variables: serde_json::Map::new(),
        }
    }

    /// Binds a variable.
    pub fn variable(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Replaces all variables.
    pub fn variables(mut self, variables: serde_json::Map<String, serde_json::Value>) -> Self {
        self.variables = variables;
        self
    }
}

/// The boundary response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    /// HTTP-style status
    #[serde(skip)]
    pub status: u16,

    /// `{field: result}`, absent when the request was rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Reported errors
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ReportedError>,
}

impl Response {
    fn rejected(errors: Vec<ReportedError>) -> Self {
        Self {
            status: STATUS_BAD_REQUEST,
            data: None,
            errors,
        }
    }

    /// Returns true for a `200` response.
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Serializes the response body as JSON.
    pub fn to_json(&self) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        if let Some(data) = &self.data {
            body.insert("data".to_string(), data.clone());
        }
        if !self.errors.is_empty() {
            body.insert(
                "errors".to_string(),
                self.errors.iter().map(ReportedError::to_json).collect(),
            );
        }
        serde_json::Value::Object(body)
    }
}

/// Executes requests against a constraint-transformed schema.
///
/// # Example
///
/// ```rust
/// use constraint_core::{FieldBuilder, InputValueBuilder, ObjectTypeBuilder, SchemaBuilder};
/// use constraint_validator::{ConstraintEngine, Request};
///
/// let schema = SchemaBuilder::new()
///     .mutation(
///         ObjectTypeBuilder::new("Mutation")
///             .field(
///                 FieldBuilder::new("rate", "Int")
///                     .argument(
///                         InputValueBuilder::new("stars", "Int!")
///                             .constraint(|c| c.with_argument("min", 1).with_argument("max", 5))
///                             .build(),
///                     )
///                     .build(),
///             )
///             .build(),
///     )
///     .build()
///     .unwrap();
///
/// let engine = ConstraintEngine::builder(schema).build().unwrap();
///
/// let response = engine.execute(&Request::mutation("rate").variable("stars", 9));
/// assert_eq!(response.status, 400);
/// ```
pub struct ConstraintEngine {
    schema: Schema,
    reporter: ErrorReporter,
    resolvers: HashMap<String, Resolver>,
    config: EngineConfig,
    rewired: Vec<RewiredDeclaration>,
}

impl fmt::Debug for ConstraintEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintEngine")
            .field("reporter", &self.reporter)
            .field("resolvers", &self.resolvers.keys().collect::<Vec<_>>())
            .field("config", &self.config)
            .field("rewired", &self.rewired.len())
            .finish()
    }
}

impl ConstraintEngine {
    /// Creates a builder for an engine serving `schema`.
    pub fn builder(schema: Schema) -> ConstraintEngineBuilder {
        ConstraintEngineBuilder {
            schema,
            hook: None,
            resolvers: HashMap::new(),
            config: EngineConfig::default(),
        }
    }

    /// Returns the transformed schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the declarations that were rewired to wrapped scalars.
    pub fn rewired(&self) -> &[RewiredDeclaration] {
        &self.rewired
    }

    /// Executes one request.
    ///
    /// Every argument is coerced before the resolver runs; any failure
    /// rejects the whole request with status `400`.
    pub fn execute(&self, request: &Request) -> Response {
        let root = self.schema.root_type(request.operation).unwrap_or_default();
        let Some(field) = self.schema.root_field(request.operation, &request.field) else {
            return Response::rejected(vec![ReportedError::message(format!(
                "Cannot {} field \"{}\" on type \"{root}\"",
                request.operation, request.field
            ))]);
        };

        let mut errors = Vec::new();

        for name in request.variables.keys() {
            if field.argument(name).is_none() {
                errors.push(ReportedError::message(format!(
                    "Unknown argument \"{name}\" on field \"{root}.{}\"",
                    field.name
                )));
            }
        }

        let mut arguments = BTreeMap::new();
        for arg in &field.arguments {
            let raw = request.variables.get(&arg.name);
            let value = match raw {
                Some(json) => Value::from(json.clone()),
                None => match &arg.default_value {
                    Some(default) => {
                        arguments.insert(arg.name.clone(), default.clone());
                        continue;
                    }
                    None if !arg.value_type.is_non_null() => continue,
                    None => {
                        errors.push(ReportedError::message(format!(
                            "Variable \"${}\" of required type \"{}\" was not provided.",
                            arg.name, arg.value_type
                        )));
                        continue;
                    }
                },
            };

            match coerce_input(&self.schema, &arg.value_type, &value, &arg.name, &arg.name) {
                Ok(coerced) => {
                    arguments.insert(arg.name.clone(), coerced);
                }
                Err(failure) => {
                    let json = raw.cloned().unwrap_or(serde_json::Value::Null);
                    errors.push(self.reporter.report(&arg.name, &json, &failure));
                }
            }
        }

        if !errors.is_empty() {
            if let Some(max) = self.config.max_errors {
                errors.truncate(max);
            }
            debug!(
                "Rejected {} {}: {} input errors",
                request.operation,
                request.field,
                errors.len()
            );
            return Response::rejected(errors);
        }

        let result = self
            .resolvers
            .get(&field.name)
            .map(|resolve| resolve(&arguments))
            .unwrap_or_default();

        let (result, errors) = match serialize_output(&self.schema, &field.field_type, &result) {
            Ok(value) => (value, Vec::new()),
            Err(err) => (Value::Null, vec![ReportedError::message(err.to_string())]),
        };

        debug!("Executed {} {}", request.operation, request.field);

        let mut data = serde_json::Map::new();
        data.insert(field.name.clone(), result.to_json());
        Response {
            status: STATUS_OK,
            data: Some(serde_json::Value::Object(data)),
            errors,
        }
    }
}

/// Builder for [`ConstraintEngine`].
pub struct ConstraintEngineBuilder {
    schema: Schema,
    hook: Option<FormatErrorFn>,
    resolvers: HashMap<String, Resolver>,
    config: EngineConfig,
}

impl ConstraintEngineBuilder {
    /// Installs a hook that replaces the boundary error of every constraint violation.
    pub fn format_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ConstraintError) -> serde_json::Value + Send + Sync + 'static,
    {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// Registers the resolver of a root field.
    pub fn resolver<F>(mut self, field: impl Into<String>, resolve: F) -> Self
    where
        F: Fn(&BTreeMap<String, Value>) -> Value + Send + Sync + 'static,
    {
        self.resolvers.insert(field.into(), Arc::new(resolve));
        self
    }

    /// Sets the engine configuration.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Validates the configuration and applies constraints to the schema.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration or any invalid constraint
    /// declaration; no engine is produced in either case.
    pub fn build(self) -> Result<ConstraintEngine, EngineError> {
        self.config.validate()?;

        let mut transformer = ConstraintTransformer::new();
        let schema = transformer.apply(&self.schema)?;

        let mut reporter =
            ErrorReporter::new().expose_original_error(self.config.expose_original_error);
        if let Some(hook) = self.hook {
            reporter = reporter.with_hook(hook);
        }

        info!(
            "Constraint engine ready: {} constrained declarations, {} resolvers",
            transformer.rewired().len(),
            self.resolvers.len()
        );

        Ok(ConstraintEngine {
            schema,
            reporter,
            resolvers: self.resolvers,
            config: self.config,
            rewired: transformer.rewired().to_vec(),
        })
    }
}
