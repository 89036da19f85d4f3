use anyhow::{Context, Result};
use constraint_validator::apply_constraints;
use tracing::debug;

use super::load_schema;

pub fn execute(schema_path: &str) -> Result<()> {
    let schema = load_schema(schema_path)?;
    let transformed = apply_constraints(&schema)
        .with_context(|| format!("Invalid constraint declarations in {}", schema_path))?;

    debug!("Printing transformed schema for {}", schema_path);
    print!("{}", transformed.to_sdl());

    Ok(())
}
