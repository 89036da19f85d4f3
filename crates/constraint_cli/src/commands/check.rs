use anyhow::{Context, Result};
use constraint_validator::ConstraintTransformer;
use tracing::info;

use super::load_schema;
use crate::output;

pub fn execute(schema_path: &str, format: &str) -> Result<()> {
    info!("Checking schema constraints: {}", schema_path);

    let schema = load_schema(schema_path)?;

    let mut transformer = ConstraintTransformer::new();
    transformer
        .apply(&schema)
        .with_context(|| format!("Invalid constraint declarations in {}", schema_path))?;

    output::print_check_report(&transformer, format);

    Ok(())
}
