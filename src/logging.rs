// src/logging.rs

//! Logging setup for `hindsight-worker` using `tracing` + `tracing-subscriber`.
//!
//! The subscriber is driven by an `EnvFilter`, chosen in this order:
//! 1. `--log-level` CLI flag: sets this crate's level, dependencies stay at
//!    `warn`
//! 2. `HINDSIGHT_WORKER_LOG` environment variable, in full `EnvFilter` syntax
//!    (e.g. `info`, `hindsight_worker::exec=debug,info`)
//! 3. `info`
//!
//! Logs are sent to STDERR so that stdout carries only the job result JSON.
//! Every line emitted while a job runs carries that job's span fields
//! (`job_id`, `workflow_id`, ...).

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "HINDSIGHT_WORKER_LOG";

pub const DEFAULT_DIRECTIVES: &str = "info";

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV_VAR).ok();
    let directives = filter_directives(cli_level, env.as_deref());
    let filter = EnvFilter::try_new(&directives)
        .map_err(|e| anyhow!("invalid log filter {directives:?}: {e}"))?;

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("initialising logging: {e}"))?;

    Ok(())
}

/// The filter directives to install. An unparsable environment value is
/// ignored rather than failing startup.
pub fn filter_directives(cli_level: Option<LogLevel>, env: Option<&str>) -> String {
    if let Some(level) = cli_level {
        return format!("warn,{}={}", env!("CARGO_CRATE_NAME"), level_name(level));
    }
    match env.map(str::trim) {
        Some(directives) if !directives.is_empty() && EnvFilter::try_new(directives).is_ok() => {
            directives.to_string()
        }
        _ => DEFAULT_DIRECTIVES.to_string(),
    }
}

fn level_name(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}
