pub mod check;
pub mod print;
pub mod validate;

use anyhow::{Context, Result};
use constraint_core::Schema;
use constraint_parser::parse_file;
use std::path::Path;

/// Loads a schema document, attaching the path to any failure.
fn load_schema(schema_path: &str) -> Result<Schema> {
    parse_file(Path::new(schema_path))
        .with_context(|| format!("Failed to parse schema file: {}", schema_path))
}
