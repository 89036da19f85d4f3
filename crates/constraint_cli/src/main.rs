mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "gcd")]
#[command(version, about = "Constraint directive engine CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a schema's constraint declarations without executing anything
    Check {
        /// Path to the schema file (YAML or TOML)
        schema: String,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Print the transformed schema as SDL
    Print {
        /// Path to the schema file (YAML or TOML)
        schema: String,
    },

    /// Coerce request variables against a root field and report the outcome
    Validate {
        /// Path to the schema file (YAML or TOML)
        schema: String,

        /// Root field to execute
        #[arg(long)]
        field: String,

        /// Execute a mutation field instead of a query field
        #[arg(short, long)]
        mutation: bool,

        /// Variables as a JSON object, bound to arguments by name
        #[arg(long, default_value = "{}")]
        variables: String,

        /// Engine configuration file (YAML or TOML)
        #[arg(short, long)]
        config: Option<String>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    match cli.command {
        Commands::Check { schema, format } => commands::check::execute(&schema, &format),

        Commands::Print { schema } => commands::print::execute(&schema),

        Commands::Validate {
            schema,
            field,
            mutation,
            variables,
            config,
            format,
        } => commands::validate::execute(
            &schema,
            &field,
            mutation,
            &variables,
            config.as_deref(),
            &format,
        ),
    }
}
