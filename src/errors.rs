// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Every variant is fatal for the job: nothing here is retried internally.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Browser profile path not found in archive: {hint}")]
    NotFound { hint: String },

    #[error("{tool} failed (exit {code}). Tail of log: {tail}")]
    Execution {
        tool: String,
        code: i32,
        tail: String,
    },

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} did not produce a report file. See the attached log for details.")]
    NoReport(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl JobError {
    /// Short machine-friendly name of the error kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            JobError::Validation(_) => "validation",
            JobError::Extraction(_) => "extraction",
            JobError::NotFound { .. } => "not_found",
            JobError::Execution { .. } | JobError::Spawn { .. } => "execution",
            JobError::NoReport(_) => "no_report",
            JobError::ConfigError(_) | JobError::TomlError(_) => "config",
            JobError::IoError(_) | JobError::JsonError(_) | JobError::Other(_) => "internal",
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, JobError>;
