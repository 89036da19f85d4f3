use colored::*;
use constraint_core::Coercer;
use constraint_validator::{ConstraintTransformer, ReportedError, Response};
use serde_json::json;

pub fn print_check_report(transformer: &ConstraintTransformer, format: &str) {
    match format {
        "json" => print_json_check(transformer),
        _ => print_text_check(transformer),
    }
}

fn print_text_check(transformer: &ConstraintTransformer) {
    print_success("Constraint declarations are valid");

    let rewired = transformer.rewired();
    if rewired.is_empty() {
        print_info("No constrained declarations found");
        return;
    }

    println!("\n{}", "Constrained declarations:".bold());
    for declaration in rewired {
        println!(
            "  {}: {} -> {}",
            declaration.coordinate,
            declaration.original,
            declaration.rewired.to_string().cyan()
        );
    }

    println!("\n{}", "Wrapped scalars:".bold());
    for scalar in transformer.wrapped_scalars() {
        println!(
            "  {} ({} {})",
            scalar.name().cyan(),
            scalar.base().name(),
            scalar.constraints().spec()
        );
    }

    println!("\n{}", "Summary:".bold());
    println!("  Declarations:    {}", rewired.len());
    println!("  Wrapped scalars: {}", transformer.wrapped_scalars().len());
}

fn print_json_check(transformer: &ConstraintTransformer) {
    let output = json!({
        "valid": true,
        "declarations": transformer
            .rewired()
            .iter()
            .map(|d| json!({
                "coordinate": d.coordinate,
                "original": d.original.to_string(),
                "rewired": d.rewired.to_string(),
            }))
            .collect::<Vec<_>>(),
        "scalars": transformer
            .wrapped_scalars()
            .iter()
            .map(|s| json!({
                "name": s.name(),
                "base": s.base().name(),
                "constraints": s.constraints().spec().to_string(),
            }))
            .collect::<Vec<_>>(),
    });

    print_json(&output);
}

pub fn print_response(response: &Response, format: &str) {
    match format {
        "json" => print_json(&response.to_json()),
        _ => print_text_response(response),
    }
}

fn print_text_response(response: &Response) {
    if response.is_ok() {
        print_success(&format!("Request accepted ({})", response.status));
    } else {
        print_error(&format!("Request rejected ({})", response.status));
    }

    if let Some(data) = &response.data {
        println!("\n{}", "Data:".bold());
        println!("  {}", data);
    }

    if !response.errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for (i, error) in response.errors.iter().enumerate() {
            let line = match error {
                ReportedError::Default(err) => err.message.clone(),
                ReportedError::Custom(value) => value.to_string(),
            };
            println!("  {}. {}", i + 1, line.red());
        }
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", value),
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_error(message: &str) {
    println!("{} {}", "✗".red().bold(), message.red());
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}
