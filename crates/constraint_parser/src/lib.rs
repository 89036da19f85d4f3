//! Parser for constraint-annotated schema documents (YAML/TOML formats).
//!
//! This crate turns schema documents into the strongly-typed [`Schema`] and
//! parses the `@constraint(...)` annotation syntax.
//!
//! # Example
//!
//! ```rust
//! use constraint_parser::parse_yaml;
//!
//! let yaml = r#"
//! mutation: Mutation
//! types:
//!   - name: Mutation
//!     kind: object
//!     fields:
//!       - name: createBook
//!         type: String
//!         arguments:
//!           - name: title
//!             type: Int!
//!             constraint: "@constraint(min: 3)"
//! "#;
//!
//! let schema = parse_yaml(yaml).expect("Failed to parse schema");
//! assert_eq!(schema.mutation_type(), Some("Mutation"));
//! ```

mod directive;
mod document;

pub use directive::*;
pub use document::*;

use constraint_core::{Schema, SchemaError};
use serde::de::DeserializeOwned;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during schema parsing.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// Directive annotation syntax error
    #[error("Invalid directive on {coordinate}: {source}")]
    Syntax {
        /// Declaration carrying the annotation
        coordinate: String,
        /// The syntax error
        source: SyntaxError,
    },

    /// Document is well-formed but not a valid schema
    #[error("Invalid schema document: {0}")]
    InvalidDocument(String),

    /// Schema construction failed
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported document file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// Deserialize any document type from a string in the given format.
pub fn from_str_as<T: DeserializeOwned>(content: &str, format: DocumentFormat) -> Result<T> {
    match format {
        DocumentFormat::Yaml => Ok(serde_yaml_ng::from_str(content)?),
        DocumentFormat::Toml => {
            toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))
        }
    }
}

/// Deserialize any document type from a file, detecting the format from its extension.
///
/// Used for schema documents and for engine configuration files alike.
pub fn from_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    from_str_as(&content, format)
}

/// Parse a schema from a YAML string.
///
/// # Arguments
///
/// * `content` - The YAML string to parse
pub fn parse_yaml(content: &str) -> Result<Schema> {
    from_str_as::<SchemaDocument>(content, DocumentFormat::Yaml)?.into_schema()
}

/// Parse a schema from a TOML string.
///
/// # Example
///
/// ```rust
/// use constraint_parser::parse_toml;
///
/// let toml = r#"
/// [[types]]
/// name = "BookInput"
/// kind = "input"
///
/// [[types.fields]]
/// name = "title"
/// type = "String!"
/// constraint = { minLength = 1, maxLength = 64 }
/// "#;
///
/// let schema = parse_toml(toml).unwrap();
/// assert!(schema.input_object("BookInput").is_some());
/// ```
pub fn parse_toml(content: &str) -> Result<Schema> {
    from_str_as::<SchemaDocument>(content, DocumentFormat::Toml)?.into_schema()
}

/// Detect the document format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `DocumentFormat::Yaml`
/// * `.toml` → `DocumentFormat::Toml`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<DocumentFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(DocumentFormat::Yaml),
        "toml" => Ok(DocumentFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a schema from a file with automatic format detection.
///
/// ```no_run
/// use constraint_parser::parse_file;
/// use std::path::Path;
///
/// let schema = parse_file(Path::new("schemas/books.yml")).unwrap();
/// println!("{}", schema.to_sdl());
/// ```
pub fn parse_file(path: &Path) -> Result<Schema> {
    from_file::<SchemaDocument>(path)?.into_schema()
}

#[cfg(test)]
mod tests {
    use super::*;
    use constraint_core::{TypeRef, Value};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_valid_yaml_minimal() {
        let schema = parse_yaml("types: []").expect("Failed to parse valid YAML");
        assert_eq!(schema.query_type(), None);
        assert!(schema.scalar("Int").is_some());
    }

    #[test]
    fn test_parse_yaml_with_constraints() {
        let yaml = r#"
query: Query
types:
  - name: Query
    kind: object
    fields:
      - name: books
        type: "[String!]!"
        arguments:
          - name: first
            type: Int
            default: 10
            constraint: "@constraint(min: 1, max: 100)"
  - name: BookInput
    kind: input
    description: New book
    fields:
      - name: title
        type: String!
        constraint:
          minLength: 3
          pattern: "^[A-Z]"
      - name: isbn
        type: ID
        directives:
          - "@deprecated"
"#;

        let schema = parse_yaml(yaml).expect("Failed to parse YAML with constraints");

        let books = schema.object("Query").unwrap().field("books").unwrap();
        assert_eq!(books.field_type.to_string(), "[String!]!");
        let first = books.argument("first").unwrap();
        assert_eq!(first.value_type, TypeRef::named("Int"));
        assert_eq!(first.default_value, Some(Value::Int(10)));
        assert_eq!(first.directives[0].arguments["max"], Value::Int(100));

        let input = schema.input_object("BookInput").unwrap();
        assert_eq!(input.description.as_deref(), Some("New book"));
        let title = input.field("title").unwrap();
        assert_eq!(title.directives[0].name, "constraint");
        assert_eq!(title.directives[0].arguments["minLength"], Value::Int(3));
        assert_eq!(
            title.directives[0].arguments["pattern"],
            Value::String("^[A-Z]".to_string())
        );
        assert_eq!(input.field("isbn").unwrap().directives[0].name, "deprecated");
    }

    #[test]
    fn test_parse_custom_scalar() {
        let yaml = r#"
types:
  - name: DateTime
    kind: scalar
    description: RFC 3339 timestamp
"#;
        let schema = parse_yaml(yaml).unwrap();
        let scalar = schema.scalar("DateTime").unwrap();
        assert_eq!(scalar.description(), Some("RFC 3339 timestamp"));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let result = parse_yaml("types: [ {name: A, kind: nonsense} ]");
        assert!(matches!(result.unwrap_err(), ParserError::YamlError(_)));
    }

    #[test]
    fn test_parse_unknown_type_reference() {
        let yaml = r#"
types:
  - name: BookInput
    kind: input
    fields:
      - name: author
        type: Author
"#;
        let result = parse_yaml(yaml);
        assert!(matches!(
            result.unwrap_err(),
            ParserError::Schema(SchemaError::UnknownType { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_type_syntax() {
        let yaml = r#"
types:
  - name: BookInput
    kind: input
    fields:
      - name: title
        type: "[String"
"#;
        assert!(matches!(
            parse_yaml(yaml).unwrap_err(),
            ParserError::Schema(SchemaError::InvalidTypeRef(_))
        ));
    }

    #[test]
    fn test_parse_toml_with_annotation() {
        let toml = r#"
mutation = "Mutation"

[[types]]
name = "Mutation"
kind = "object"

[[types.fields]]
name = "rate"
type = "Int"

[[types.fields.arguments]]
name = "stars"
type = "Int!"
constraint = "@constraint(min: 1, max: 5)"
"#;
        let schema = parse_toml(toml).expect("Failed to parse TOML");
        let rate = schema.object("Mutation").unwrap().field("rate").unwrap();
        assert_eq!(rate.arguments[0].directives[0].arguments.len(), 2);
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = parse_toml("types = [");
        assert!(matches!(result.unwrap_err(), ParserError::TomlError(_)));
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(Path::new("a.yml")).unwrap(), DocumentFormat::Yaml);
        assert_eq!(detect_format(Path::new("a.YAML")).unwrap(), DocumentFormat::Yaml);
        assert_eq!(detect_format(Path::new("a.toml")).unwrap(), DocumentFormat::Toml);
        assert!(matches!(
            detect_format(Path::new("a.json")),
            Err(ParserError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            detect_format(Path::new("schema")),
            Err(ParserError::InvalidExtension)
        ));
    }
}
