// src/job/mod.rs

//! Job orchestration: one archive in, one report out.
//!
//! A job moves through
//! `Validating → Extracting → ResolvingProfile → Running → CollectingOutput
//! → CleaningUp → Done`, or to `Failed` from any of them. Once an extraction
//! root exists it is removed on every path out of the job.
//!
//! - [`validate`] checks the inputs and profile hint.
//! - [`cleanup`] owns the extraction root.
//! - [`collect`] finds the report the tool wrote.
//! - [`orchestrator`] sequences all of it.

pub mod cleanup;
pub mod collect;
pub mod context;
pub mod orchestrator;
pub mod validate;

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::TaskConfig;
use crate::errors::JobError;
use crate::output::OutputFile;
use crate::types::InputDescriptor;

pub use context::JobContext;
pub use orchestrator::{Job, ReportSpec};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Validating,
    Extracting,
    ResolvingProfile,
    Running,
    CollectingOutput,
    CleaningUp,
    Done,
    Failed,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobState::Validating => "validating",
            JobState::Extracting => "extracting",
            JobState::ResolvingProfile => "resolving profile",
            JobState::Running => "running",
            JobState::CollectingOutput => "collecting output",
            JobState::CleaningUp => "cleaning up",
            JobState::Done => "done",
            JobState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Everything one job run needs from its caller.
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub inputs: Vec<InputDescriptor>,
    /// Exclusive to this job; logs, the report and the extraction root live
    /// here.
    pub output_dir: PathBuf,
    pub task_config: TaskConfig,
    pub context: JobContext,
}

/// A failed job: the error, the stage it happened in, and any artifacts
/// left for the user (typically the execution log).
#[derive(Debug, Error)]
#[error("job failed while {stage}: {error}")]
pub struct JobFailure {
    pub stage: JobState,
    #[source]
    pub error: JobError,
    pub output_files: Vec<OutputFile>,
}
