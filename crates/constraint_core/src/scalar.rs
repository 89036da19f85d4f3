//! Scalar coercion.
//!
//! Every scalar type in a [`Schema`](crate::Schema) is backed by a
//! [`Coercer`]: a pair of functions turning inbound values into the scalar's
//! internal representation (`parse_value`) and internal values into their
//! response form (`serialize`). Constrained scalars decorate another coercer.

use crate::{CoercionError, Value};
use std::fmt;

/// Broad classification of a scalar, used for constraint compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// 32-bit signed integer
    Int,
    /// Double-precision float
    Float,
    /// UTF-8 string
    String,
    /// Boolean
    Boolean,
    /// Opaque identifier, serialized as a string
    Id,
    /// Application-defined scalar
    Custom,
}

impl ScalarKind {
    /// Numeric constraints apply to these kinds.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ScalarKind::Int | ScalarKind::Float)
    }

    /// String constraints apply to these kinds.
    pub fn is_textual(&self) -> bool {
        matches!(self, ScalarKind::String | ScalarKind::Id)
    }
}

/// Coercion capability of a scalar type.
pub trait Coercer: Send + Sync + fmt::Debug {
    /// Type name the scalar is registered under.
    fn name(&self) -> &str;

    /// Scalar classification.
    fn kind(&self) -> ScalarKind;

    /// Coerces an inbound value (variable or literal) for `field_name`.
    fn parse_value(&self, value: &Value, field_name: &str) -> Result<Value, CoercionError>;

    /// Coerces an internal value into its response form.
    fn serialize(&self, value: &Value) -> Result<Value, CoercionError>;

    /// Optional description printed in SDL.
    fn description(&self) -> Option<&str> {
        None
    }
}

/// The five built-in scalars: `Int`, `Float`, `String`, `Boolean`, `ID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinScalar {
    kind: ScalarKind,
}

impl BuiltinScalar {
    /// `Int` scalar.
    pub const INT: BuiltinScalar = BuiltinScalar { kind: ScalarKind::Int };
    /// `Float` scalar.
    pub const FLOAT: BuiltinScalar = BuiltinScalar { kind: ScalarKind::Float };
    /// `String` scalar.
    pub const STRING: BuiltinScalar = BuiltinScalar { kind: ScalarKind::String };
    /// `Boolean` scalar.
    pub const BOOLEAN: BuiltinScalar = BuiltinScalar { kind: ScalarKind::Boolean };
    /// `ID` scalar.
    pub const ID: BuiltinScalar = BuiltinScalar { kind: ScalarKind::Id };

    /// All built-in scalars.
    pub const ALL: [BuiltinScalar; 5] = [
        BuiltinScalar::INT,
        BuiltinScalar::FLOAT,
        BuiltinScalar::STRING,
        BuiltinScalar::BOOLEAN,
        BuiltinScalar::ID,
    ];

    /// Returns true if `name` is one of the built-in scalar names.
    pub fn is_builtin_name(name: &str) -> bool {
        BuiltinScalar::ALL.iter().any(|s| s.name() == name)
    }
}

fn int_from_f64(f: f64) -> Option<i64> {
    if f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn coerce_int(value: &Value) -> Result<Value, CoercionError> {
    match value {
        Value::Int(i) if i32::try_from(*i).is_ok() => Ok(Value::Int(*i)),
        Value::Int(_) => Err(CoercionError::invalid(format!(
            "Int cannot represent non 32-bit signed integer value: {value}"
        ))),
        Value::Float(f) => int_from_f64(*f).map(Value::Int).ok_or_else(|| {
            CoercionError::invalid(format!("Int cannot represent non-integer value: {value}"))
        }),
        _ => Err(CoercionError::invalid(format!(
            "Int cannot represent non-integer value: {value}"
        ))),
    }
}

fn coerce_float(value: &Value) -> Result<Value, CoercionError> {
    match value {
        Value::Int(i) => Ok(Value::Float(*i as f64)),
        Value::Float(f) if f.is_finite() => Ok(Value::Float(*f)),
        _ => Err(CoercionError::invalid(format!(
            "Float cannot represent non numeric value: {value}"
        ))),
    }
}

impl Coercer for BuiltinScalar {
    fn name(&self) -> &str {
        match self.kind {
            ScalarKind::Int => "Int",
            ScalarKind::Float => "Float",
            ScalarKind::String => "String",
            ScalarKind::Boolean => "Boolean",
            ScalarKind::Id => "ID",
            ScalarKind::Custom => "Custom",
        }
    }

    fn kind(&self) -> ScalarKind {
        self.kind
    }

    fn parse_value(&self, value: &Value, _field_name: &str) -> Result<Value, CoercionError> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        match self.kind {
            ScalarKind::Int => coerce_int(value),
            ScalarKind::Float => coerce_float(value),
            ScalarKind::String => match value {
                Value::String(_) => Ok(value.clone()),
                _ => Err(CoercionError::invalid(format!(
                    "String cannot represent a non string value: {value}"
                ))),
            },
            ScalarKind::Boolean => match value {
                Value::Boolean(_) => Ok(value.clone()),
                _ => Err(CoercionError::invalid(format!(
                    "Boolean cannot represent a non boolean value: {value}"
                ))),
            },
            ScalarKind::Id => match value {
                Value::String(_) => Ok(value.clone()),
                Value::Int(i) => Ok(Value::String(i.to_string())),
                _ => Err(CoercionError::invalid(format!(
                    "ID cannot represent value: {value}"
                ))),
            },
            ScalarKind::Custom => Ok(value.clone()),
        }
    }

    fn serialize(&self, value: &Value) -> Result<Value, CoercionError> {
        if value.is_null() {
            return Ok(Value::Null);
        }

        match (self.kind, value) {
            (ScalarKind::Int, Value::Boolean(b)) => Ok(Value::Int(i64::from(*b))),
            (ScalarKind::Int, _) => coerce_int(value),
            (ScalarKind::Float, Value::Boolean(b)) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
            (ScalarKind::Float, _) => coerce_float(value),
            (ScalarKind::String, Value::String(_)) => Ok(value.clone()),
            (ScalarKind::String, Value::Int(_) | Value::Float(_) | Value::Boolean(_)) => {
                Ok(Value::String(value.to_string()))
            }
            (ScalarKind::Boolean, Value::Boolean(_)) => Ok(value.clone()),
            (ScalarKind::Boolean, Value::Int(i)) => Ok(Value::Boolean(*i != 0)),
            (ScalarKind::Id, Value::String(_)) => Ok(value.clone()),
            (ScalarKind::Id, Value::Int(i)) => Ok(Value::String(i.to_string())),
            (ScalarKind::Custom, _) => Ok(value.clone()),
            _ => Err(CoercionError::invalid(format!(
                "{} cannot represent value: {value}",
                self.name()
            ))),
        }
    }
}

/// An application-defined scalar that passes values through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomScalar {
    name: String,
    description: Option<String>,
}

impl CustomScalar {
    /// Creates a pass-through custom scalar.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Sets the scalar description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Coercer for CustomScalar {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ScalarKind {
        ScalarKind::Custom
    }

    fn parse_value(&self, value: &Value, _field_name: &str) -> Result<Value, CoercionError> {
        Ok(value.clone())
    }

    fn serialize(&self, value: &Value) -> Result<Value, CoercionError> {
        Ok(value.clone())
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
