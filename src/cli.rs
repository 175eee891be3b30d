// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `hindsight-worker`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "hindsight-worker",
    version,
    about = "Run Hindsight against a browser profile inside a triage ZIP archive.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to a job config file (TOML).
    ///
    /// Default: `Hindsight.toml` in the current working directory, if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Input archive. Repeatable so that a wrong invocation is reported
    /// rather than silently narrowed to one file.
    #[arg(long = "input", value_name = "PATH")]
    pub inputs: Vec<PathBuf>,

    /// Result JSON of a previous job; its output files become the inputs.
    #[arg(long, value_name = "PATH")]
    pub pipe_result: Option<PathBuf>,

    /// Directory for logs, the report and temporary extraction.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Browser profile folder, e.g.
    /// `C:\Users\Ryan\AppData\Local\Google\Chrome\User Data\Default`.
    #[arg(long, value_name = "HINT")]
    pub browser_profile: Option<String>,

    /// Password for an encrypted archive.
    #[arg(long, value_name = "PASSWORD")]
    pub archive_password: Option<String>,

    #[arg(long, value_name = "ID")]
    pub workflow_id: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `HINDSIGHT_WORKER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate inputs and print the plan, but don't extract or run anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Print the task metadata as JSON and exit.
    #[arg(long)]
    pub describe: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
