// src/exec/progress.rs

//! Liveness notifications emitted while the analysis tool runs.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

/// Event name sent once per line of tool output.
pub const PROGRESS_EVENT: &str = "task-progress";

/// Receiver of payload-less progress events.
///
/// Any `Fn(&str)` closure is a sink, which keeps tests short.
pub trait ProgressSink: Send + Sync {
    fn send_event(&self, event: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn send_event(&self, event: &str) {
        self(event)
    }
}

/// Sink used by the CLI: counts events and traces them.
#[derive(Debug, Default)]
pub struct LoggingProgress {
    count: AtomicU64,
}

impl LoggingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl ProgressSink for LoggingProgress {
    fn send_event(&self, event: &str) {
        let n = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        trace!(event, n, "progress");
    }
}
