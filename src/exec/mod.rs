// src/exec/mod.rs

//! Process execution layer.
//!
//! This module runs the external analysis tool with
//! `tokio::process::Command` and captures what it prints.
//!
//! - [`command`] describes the fixed command-line shape.
//! - [`supervisor`] spawns the process, streams output into the execution
//!   log and classifies the exit status.
//! - [`progress`] defines the progress sink notified once per output line.
//! - [`backend`] provides the `ToolBackend` trait and the production
//!   `ProcessToolBackend`, which tests can replace with a fake.

pub mod backend;
pub mod command;
pub mod progress;
pub mod supervisor;

pub use backend::{ProcessToolBackend, ToolBackend, ToolRequest};
pub use command::{ToolCommand, ToolInvocation};
pub use progress::{LoggingProgress, ProgressSink, PROGRESS_EVENT};
pub use supervisor::run_tool;
