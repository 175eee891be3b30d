// src/job/context.rs

use tracing::Span;
use uuid::Uuid;

use crate::metadata::{DISPLAY_NAME, TASK_NAME};

/// Request-scoped identifiers bound into every log line of one job.
///
/// The orchestrator future is instrumented with [`JobContext::span`], so
/// concurrent jobs never share logging state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobContext {
    pub job_id: String,
    pub workflow_id: Option<String>,
}

impl JobContext {
    /// New context with a random job id.
    pub fn new(workflow_id: Option<String>) -> Self {
        Self {
            job_id: Uuid::new_v4().to_string(),
            workflow_id,
        }
    }

    pub fn with_job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = job_id.into();
        self
    }

    pub fn span(&self) -> Span {
        tracing::info_span!(
            "job",
            job_id = %self.job_id,
            workflow_id = self.workflow_id.as_deref().unwrap_or("-"),
            task_name = TASK_NAME,
            worker_name = DISPLAY_NAME,
        )
    }
}

impl Default for JobContext {
    fn default() -> Self {
        Self::new(None)
    }
}
