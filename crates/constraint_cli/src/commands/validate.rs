use anyhow::{Context, Result, anyhow};
use constraint_core::OperationType;
use constraint_parser::from_file;
use constraint_validator::{ConstraintEngine, EngineConfig, Request};
use std::path::Path;
use tracing::info;

use super::load_schema;
use crate::output;

pub fn execute(
    schema_path: &str,
    field: &str,
    mutation: bool,
    variables: &str,
    config_path: Option<&str>,
    format: &str,
) -> Result<()> {
    info!("Validating request against schema: {}", schema_path);

    let schema = load_schema(schema_path)?;

    let config = match config_path {
        Some(path) => {
            info!("Loading engine configuration: {}", path);
            from_file::<EngineConfig>(Path::new(path))
                .with_context(|| format!("Failed to load configuration file: {}", path))?
        }
        None => EngineConfig::default(),
    };

    let variables = parse_variables(variables)?;

    let engine = ConstraintEngine::builder(schema)
        .config(config)
        .build()
        .with_context(|| format!("Failed to build constraint engine for {}", schema_path))?;

    let request = if mutation {
        Request::mutation(field)
    } else {
        Request::query(field)
    }
    .variables(variables);

    let operation = if mutation {
        OperationType::Mutation
    } else {
        OperationType::Query
    };
    info!("Executing {} {}", operation, field);

    let response = engine.execute(&request);
    output::print_response(&response, format);

    if !response.is_ok() {
        std::process::exit(1);
    }

    Ok(())
}

fn parse_variables(raw: &str) -> Result<serde_json::Map<String, serde_json::Value>> {
    match serde_json::from_str(raw).context("Variables must be valid JSON")? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(anyhow!("Variables must be a JSON object, got {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_variables() {
        let map = parse_variables(r#"{"input": {"title": 3}}"#).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["input"], serde_json::json!({"title": 3}));
    }

    #[test]
    fn test_parse_variables_rejects_non_objects() {
        assert!(parse_variables("[1, 2]").is_err());
        assert!(parse_variables("{").is_err());
    }
}
