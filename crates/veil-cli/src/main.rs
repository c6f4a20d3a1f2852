mod config;
mod logging;
mod mask;
mod report;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use veil_transform::{
    ConfigurationError, TransformContext, TransformError, TransformerRegistry, default_registry,
};

use config::MaskConfig;
use logging::init_logging;
use report::MaskReport;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("config parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("core error: {0}")]
    Core(#[from] veil_core::Error),
    #[error("transformer configuration error: {0}")]
    Config(#[from] ConfigurationError),
    #[error("row {row}: {source}")]
    Row {
        row: u64,
        #[source]
        source: TransformError,
    },
    #[error("row {row}: generated value for '{column}' equals the NULL marker")]
    SentinelCollision { row: u64, column: String },
    #[error("logging setup failed: {0}")]
    Logging(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(name = "veil", version, about = "Mask sensitive columns in tabular data")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply the configured transformers to a CSV file.
    Mask(MaskArgs),
    /// List available transformers and their parameters.
    List(ListArgs),
}

#[derive(Args, Debug)]
struct MaskArgs {
    /// Path to the TOML configuration.
    #[arg(long, default_value = "veil.toml")]
    config: PathBuf,
    /// CSV file with a header row.
    #[arg(long)]
    input: PathBuf,
    /// Destination CSV file.
    #[arg(long)]
    output: PathBuf,
    /// Optional path for a JSON run report.
    #[arg(long)]
    report: Option<PathBuf>,
    /// Append JSON logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Print definitions as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Mask(args) => run_mask(args),
        Command::List(args) => run_list(args),
    };
    if let Err(err) = result {
        error!(error = %err, "command failed");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_mask(args: MaskArgs) -> Result<(), CliError> {
    init_logging(args.log_file.as_deref())?;

    let config = MaskConfig::load(&args.config)?;
    let registry = default_registry()?;
    let ctx = TransformContext::new();
    let mut report = MaskReport::new(Uuid::new_v4().to_string());
    info!(run_id = report.run_id.as_str(), config = %args.config.display(), "run started");

    mask::mask_file(
        &config,
        &registry,
        &ctx,
        &args.input,
        &args.output,
        &mut report,
    )?;

    if let Some(path) = args.report.as_deref() {
        report.write(path)?;
        info!(report = %path.display(), "report written");
    }
    Ok(())
}

fn run_list(args: ListArgs) -> Result<(), CliError> {
    let registry = default_registry()?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&describe(&registry))?);
        return Ok(());
    }

    for definition in registry.definitions() {
        println!("{}: {}", definition.name, definition.description);
        for param in definition.params {
            let required = if param.required { " (required)" } else { "" };
            let default = param
                .default
                .map(|value| format!(" [default: {value}]"))
                .unwrap_or_default();
            println!("  {}{required}{default}: {}", param.key, param.description);
        }
    }
    Ok(())
}

fn describe(registry: &TransformerRegistry) -> serde_json::Value {
    let definitions: Vec<serde_json::Value> = registry
        .definitions()
        .map(|definition| {
            serde_json::json!({
                "name": definition.name,
                "description": definition.description,
                "params": definition.params,
            })
        })
        .collect();
    serde_json::Value::Array(definitions)
}
