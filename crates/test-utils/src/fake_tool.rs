use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use hindsight_worker::errors::{JobError, Result};
use hindsight_worker::exec::{ToolBackend, ToolCommand, ToolInvocation, ToolRequest, PROGRESS_EVENT};

/// A fake analysis tool that:
/// - writes canned lines to the execution log, one progress event each
/// - optionally drops a report file into the working directory
/// - exits with a configurable code
#[derive(Debug, Clone, Default)]
pub struct FakeTool {
    lines: Vec<String>,
    exit_code: i32,
    report_name: Option<String>,
    runs: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakeTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lines(mut self, lines: &[&str]) -> Self {
        self.lines = lines.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn exiting_with(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    pub fn writing_report(mut self, name: &str) -> Self {
        self.report_name = Some(name.to_string());
        self
    }

    /// Profile paths the tool was run against, in order.
    pub fn runs(&self) -> Vec<PathBuf> {
        self.runs.lock().unwrap().clone()
    }
}

impl ToolBackend for FakeTool {
    fn tool_name(&self) -> &str {
        "Hindsight"
    }

    fn run<'a>(
        &'a self,
        request: ToolRequest<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<ToolInvocation>> + Send + 'a>> {
        Box::pin(async move {
            self.runs
                .lock()
                .unwrap()
                .push(request.profile_path.to_path_buf());

            let mut log = String::new();
            for line in &self.lines {
                log.push_str(line);
                log.push('\n');
                request.progress.send_event(PROGRESS_EVENT);
            }
            std::fs::write(request.log_path, &log)?;

            if let Some(name) = &self.report_name {
                std::fs::write(request.working_dir.join(name), b"fake xlsx")?;
            }

            if self.exit_code != 0 {
                return Err(JobError::Execution {
                    tool: self.tool_name().to_string(),
                    code: self.exit_code,
                    tail: log,
                });
            }

            Ok(ToolCommand::hindsight().invocation(request.profile_path))
        })
    }
}
