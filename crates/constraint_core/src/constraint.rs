//! Constraint kinds, thresholds and constraint specifications.
//!
//! A [`ConstraintSpec`] is the resolved content of one `@constraint(...)`
//! annotation: a mapping from [`ConstraintKind`] to [`Threshold`]. Specs are
//! built once while the schema is constructed and never mutated afterwards.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Name of the directive carrying constraint declarations.
pub const CONSTRAINT_DIRECTIVE: &str = "constraint";

/// The one `@constraint` argument that is not a constraint kind.
pub const UNIQUE_TYPE_NAME_ARG: &str = "uniqueTypeName";

/// The closed set of constraint kinds.
///
/// The declaration order is the canonical validation order: when several
/// constraints on one value fail, the first one in this order is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConstraintKind {
    /// Inclusive lower bound
    Min,
    /// Inclusive upper bound
    Max,
    /// Exclusive lower bound
    ExclusiveMin,
    /// Exclusive upper bound
    ExclusiveMax,
    /// Value must be a multiple of the threshold
    MultipleOf,
    /// Minimum string length in characters
    MinLength,
    /// Maximum string length in characters
    MaxLength,
    /// Required string prefix
    StartsWith,
    /// Required string suffix
    EndsWith,
    /// Required substring
    Contains,
    /// Forbidden substring
    NotContains,
    /// Regular expression the string must match
    Pattern,
    /// Named string format (email, uri, uuid, ...)
    Format,
}

impl ConstraintKind {
    /// All kinds in canonical order.
    pub const ALL: [ConstraintKind; 13] = [
        ConstraintKind::Min,
        ConstraintKind::Max,
        ConstraintKind::ExclusiveMin,
        ConstraintKind::ExclusiveMax,
        ConstraintKind::MultipleOf,
        ConstraintKind::MinLength,
        ConstraintKind::MaxLength,
        ConstraintKind::StartsWith,
        ConstraintKind::EndsWith,
        ConstraintKind::Contains,
        ConstraintKind::NotContains,
        ConstraintKind::Pattern,
        ConstraintKind::Format,
    ];

    /// Returns the argument name used in `@constraint(...)`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::Min => "min",
            ConstraintKind::Max => "max",
            ConstraintKind::ExclusiveMin => "exclusiveMin",
            ConstraintKind::ExclusiveMax => "exclusiveMax",
            ConstraintKind::MultipleOf => "multipleOf",
            ConstraintKind::MinLength => "minLength",
            ConstraintKind::MaxLength => "maxLength",
            ConstraintKind::StartsWith => "startsWith",
            ConstraintKind::EndsWith => "endsWith",
            ConstraintKind::Contains => "contains",
            ConstraintKind::NotContains => "notContains",
            ConstraintKind::Pattern => "pattern",
            ConstraintKind::Format => "format",
        }
    }

    /// Returns true for kinds that apply to numeric scalars.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ConstraintKind::Min
                | ConstraintKind::Max
                | ConstraintKind::ExclusiveMin
                | ConstraintKind::ExclusiveMax
                | ConstraintKind::MultipleOf
        )
    }

    /// Returns true for kinds that apply to string scalars.
    pub fn is_textual(&self) -> bool {
        !self.is_numeric()
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown constraint kind name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownConstraintKind(pub String);

impl fmt::Display for UnknownConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown constraint kind '{}'", self.0)
    }
}

impl std::error::Error for UnknownConstraintKind {}

impl FromStr for ConstraintKind {
    type Err = UnknownConstraintKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConstraintKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownConstraintKind(s.to_string()))
    }
}

/// A declared constraint threshold.
#[derive(Debug, Clone)]
pub enum Threshold {
    /// Numeric threshold (`min: 3`, `maxLength: 64`)
    Number(f64),
    /// Text threshold (`startsWith: "foo"`, `format: "email"`)
    Text(String),
}

impl Threshold {
    /// Returns the numeric threshold, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Threshold::Number(n) => Some(*n),
            Threshold::Text(_) => None,
        }
    }

    /// Returns the text threshold, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Threshold::Number(_) => None,
            Threshold::Text(s) => Some(s),
        }
    }

    /// Integral numbers that fit an `i64` print and serialize as integers.
    fn as_integral(&self) -> Option<i64> {
        match self {
            Threshold::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => Some(*n as i64),
            _ => None,
        }
    }
}

/// Renders the threshold the way it appears in reason strings: `3`, `2.5`, `abc`.
impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::Number(n) => match self.as_integral() {
                Some(i) => write!(f, "{i}"),
                None => write!(f, "{n}"),
            },
            Threshold::Text(s) => f.write_str(s),
        }
    }
}

impl PartialEq for Threshold {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Threshold::Number(a), Threshold::Number(b)) => a.to_bits() == b.to_bits() || a == b,
            (Threshold::Text(a), Threshold::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Threshold {}

impl Hash for Threshold {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Threshold::Number(n) => {
                0u8.hash(state);
                // -0.0 == 0.0, so both must hash alike
                let normalized = if *n == 0.0 { 0.0f64 } else { *n };
                normalized.to_bits().hash(state);
            }
            Threshold::Text(s) => {
                1u8.hash(state);
                s.hash(state);
            }
        }
    }
}

impl Serialize for Threshold {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Threshold::Number(n) => match self.as_integral() {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            Threshold::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Threshold {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Threshold::Number(n),
            Raw::Text(s) => Threshold::Text(s),
        })
    }
}

impl From<f64> for Threshold {
    fn from(n: f64) -> Self {
        Threshold::Number(n)
    }
}

impl From<i64> for Threshold {
    fn from(n: i64) -> Self {
        Threshold::Number(n as f64)
    }
}

impl From<&str> for Threshold {
    fn from(s: &str) -> Self {
        Threshold::Text(s.to_string())
    }
}

impl From<String> for Threshold {
    fn from(s: String) -> Self {
        Threshold::Text(s)
    }
}

/// The constraints declared on one field, argument or input field.
///
/// Iteration always follows the canonical [`ConstraintKind`] order, whatever
/// order the arguments were declared in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ConstraintSpec {
    constraints: BTreeMap<ConstraintKind, Threshold>,
    unique_type_name: Option<String>,
}

impl ConstraintSpec {
    /// Creates an empty spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a constraint, replacing any previous threshold for the same kind.
    pub fn with(mut self, kind: ConstraintKind, threshold: impl Into<Threshold>) -> Self {
        self.insert(kind, threshold);
        self
    }

    /// Inserts a constraint, returning the previous threshold for that kind.
    pub fn insert(
        &mut self,
        kind: ConstraintKind,
        threshold: impl Into<Threshold>,
    ) -> Option<Threshold> {
        self.constraints.insert(kind, threshold.into())
    }

    /// Sets an explicit name for the wrapped scalar built from this spec.
    pub fn with_unique_type_name(mut self, name: impl Into<String>) -> Self {
        self.unique_type_name = Some(name.into());
        self
    }

    /// Returns the explicit wrapped scalar name, if one was declared.
    pub fn unique_type_name(&self) -> Option<&str> {
        self.unique_type_name.as_deref()
    }

    /// Returns the threshold for a kind.
    pub fn get(&self, kind: ConstraintKind) -> Option<&Threshold> {
        self.constraints.get(&kind)
    }

    /// Iterates over constraints in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (ConstraintKind, &Threshold)> {
        self.constraints.iter().map(|(kind, threshold)| (*kind, threshold))
    }

    /// Returns the number of declared constraints.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Returns true if no constraint is declared.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Returns the name of the scalar wrapping `base` with this spec.
    ///
    /// Uses the declared unique name when present, otherwise
    /// `{base}_{kind}_{threshold}...` with every character outside
    /// `[A-Za-z0-9_]` replaced by `_`.
    pub fn type_name(&self, base: &str) -> String {
        if let Some(name) = &self.unique_type_name {
            return name.clone();
        }

        let mut name = base.to_string();
        for (kind, threshold) in self.iter() {
            name.push('_');
            name.push_str(kind.as_str());
            name.push('_');
            name.push_str(&threshold.to_string());
        }

        name.chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect()
    }
}

impl fmt::Display for ConstraintSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(kind, threshold)| match threshold {
                Threshold::Text(s) => format!("{kind}: {s:?}"),
                Threshold::Number(_) => format!("{kind}: {threshold}"),
            })
            .collect();
        write!(f, "({})", parts.join(", "))
    }
}
