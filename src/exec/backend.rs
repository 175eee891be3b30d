// src/exec/backend.rs

//! Pluggable tool backend abstraction.
//!
//! The orchestrator talks to a `ToolBackend` instead of spawning processes
//! itself. Production code uses [`ProcessToolBackend`], which wraps
//! [`run_tool`]; tests can provide a backend that writes a canned log and
//! drops (or withholds) a report file without any real subprocess.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use crate::errors::Result;
use crate::exec::command::{ToolCommand, ToolInvocation};
use crate::exec::progress::ProgressSink;

use super::supervisor::run_tool;

/// Everything a backend needs for one run.
#[derive(Clone, Copy)]
pub struct ToolRequest<'a> {
    pub profile_path: &'a Path,
    /// Tool cwd; the report is expected to land here.
    pub working_dir: &'a Path,
    pub log_path: &'a Path,
    pub progress: &'a dyn ProgressSink,
}

/// Trait abstracting how the analysis tool is executed.
pub trait ToolBackend: Send + Sync {
    /// Display name of the tool, used in errors ("Hindsight did not ...").
    fn tool_name(&self) -> &str;

    /// Run the tool once. Implementations must leave a complete log at
    /// `request.log_path` whether they succeed or fail.
    fn run<'a>(
        &'a self,
        request: ToolRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<ToolInvocation>> + Send + 'a>>;
}

/// Real backend used in production: spawns the configured executable.
#[derive(Debug, Clone, Default)]
pub struct ProcessToolBackend {
    command: ToolCommand,
}

impl ProcessToolBackend {
    pub fn new(command: ToolCommand) -> Self {
        Self { command }
    }

    pub fn command(&self) -> &ToolCommand {
        &self.command
    }
}

impl ToolBackend for ProcessToolBackend {
    fn tool_name(&self) -> &str {
        &self.command.name
    }

    fn run<'a>(
        &'a self,
        request: ToolRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<ToolInvocation>> + Send + 'a>> {
        Box::pin(run_tool(
            &self.command,
            request.profile_path,
            request.working_dir,
            request.log_path,
            request.progress,
        ))
    }
}
