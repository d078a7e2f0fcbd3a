mod help;

use std::path::PathBuf;

use argv_schema_core::{RawSchema, Schema, SchemaError};
use argv_schema_parser::{ParseError, ParseOutcome};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

use help::UsageRenderer;

/// Output format for parse results and normalized schemas.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "argv-schema", version)]
#[command(about = "Parse argument vectors against a declarative schema")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse tokens given after `--` against a schema file.
    Parse(ParseArgs),
    /// Normalize a schema file and print the result.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Schema file (.json, .yaml or .yml).
    #[arg(long)]
    schema: PathBuf,
    /// Output format for the parsed values.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Append a catch-all operand with this id.
    #[arg(long, value_name = "ID")]
    catch_all: Option<String>,
    /// Program name shown in rendered help.
    #[arg(long, default_value = "command")]
    program: String,
    /// Tokens to parse.
    #[arg(last = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Schema file (.json, .yaml or .yml).
    #[arg(long)]
    schema: PathBuf,
    /// Output format for the normalized schema.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// 2 for rejected input, 1 for everything else.
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Parse(_) => 2,
            _ => 1,
        }
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Check(args) => run_check(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code());
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run_parse(args: ParseArgs) -> Result<(), CliError> {
    let mut raw = RawSchema::load(&args.schema)?;
    if let Some(id) = &args.catch_all {
        raw = raw.with_catch_all(id);
    }

    let parser = argv_schema_parser::Parser::new(raw)?
        .with_help_renderer(UsageRenderer::new(args.program));
    debug!(schema = %args.schema.display(), tokens = args.tokens.len(), "Running parse");

    match parser.parse(args.tokens)? {
        ParseOutcome::Help(text) => print!("{}", text.unwrap_or_default()),
        ParseOutcome::Args(values) => println!("{}", render(&values, args.format)?),
    }
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), CliError> {
    let schema = Schema::new(RawSchema::load(&args.schema)?)?;
    println!("{}", render(&schema, args.format)?);
    Ok(())
}

fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?.trim_end().to_string()),
    }
}
