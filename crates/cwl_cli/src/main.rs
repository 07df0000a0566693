//! CWL toolkit CLI
//!
//! Validate, inspect and render `CommandLineTool` documents. Nothing is
//! executed.

#![warn(missing_docs)]
#![warn(clippy::all)]

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{eyre, Result, WrapErr};
use cwl_core::shape_name;
use cwl_parse::{parse_command_line_tool_file, ParseError};
use cwl_schema::CommandLineTool;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cwl")]
#[command(about = "Validate and inspect CWL CommandLineTool documents", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a tool document
    Check {
        /// Path to the tool document
        file: PathBuf,
    },
    /// Print the canonical form of a tool document
    Show {
        /// Path to the tool document
        file: PathBuf,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Print the argument vector a job would produce
    Args {
        /// Path to the tool document
        file: PathBuf,
        /// Path to the job document (input identifier to value)
        #[arg(short, long)]
        job: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Check { file } => Ok(check(&file)),
        Commands::Show { file, format } => {
            let tool = load(&file)?;
            println!("{}", render(&tool, format)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Args { file, job } => {
            let tool = load(&file)?;
            let job = load_job(&job)?;
            let argv = build_argv(&tool, &job)?;
            println!("{}", serde_json::to_string(&argv)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn check(file: &Path) -> ExitCode {
    match parse_command_line_tool_file(file) {
        Ok(tool) => {
            println!(
                "ok: {} input(s), {} output(s)",
                tool.inputs().len(),
                tool.outputs().len()
            );
            ExitCode::SUCCESS
        }
        Err(ParseError::Document(err)) => {
            eprintln!("{}: not a valid document: {}", file.display(), err.message);
            ExitCode::FAILURE
        }
        Err(ParseError::Schema(err)) => {
            eprintln!("{}: {} schema violation(s)", file.display(), err.violations.len());
            for violation in &err.violations {
                eprintln!("  {}", violation);
            }
            ExitCode::FAILURE
        }
    }
}

fn load(file: &Path) -> Result<CommandLineTool> {
    parse_command_line_tool_file(file).wrap_err_with(|| format!("failed to load {}", file.display()))
}

fn render(tool: &CommandLineTool, format: Format) -> Result<String> {
    Ok(match format {
        Format::Json => serde_json::to_string_pretty(tool)?,
        Format::Yaml => serde_yaml_ng::to_string(tool)?,
    })
}

fn load_job(path: &Path) -> Result<Map<String, Value>> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read job {}", path.display()))?;
    let value: Value = serde_yaml_ng::from_str(&text)
        .wrap_err_with(|| format!("job {} is not valid YAML", path.display()))?;
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(eyre!(
            "job {} must be a mapping, found {}",
            path.display(),
            shape_name(&other)
        )),
    }
}

/// Command, base arguments, then each input's tokens in declaration order.
/// Inputs with neither a job value nor a default are skipped.
fn build_argv(tool: &CommandLineTool, job: &Map<String, Value>) -> Result<Vec<String>> {
    let mut argv: Vec<String> = tool.command().map(str::to_string).into_iter().collect();
    argv.extend(tool.base_arguments().iter().cloned());

    for input in tool.inputs() {
        let value = input
            .identifier()
            .and_then(|id| job.get(id))
            .filter(|v| !v.is_null())
            .or_else(|| input.parameter().default_value());
        let Some(value) = value else {
            tracing::debug!(identifier = ?input.identifier(), "no value for input, skipped");
            continue;
        };
        let tokens = input.format_arguments(value).wrap_err_with(|| {
            format!(
                "cannot format input `{}`",
                input.identifier().unwrap_or("<anonymous>")
            )
        })?;
        argv.extend(tokens);
    }

    Ok(argv)
}
