// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::InputDescriptor;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [job]
/// output_dir = "out"
/// workflow_id = "wf-42"
///
/// [task_config]
/// browser_profile = 'C:\Users\Ryan\AppData\Local\Google\Chrome\User Data\Default'
/// archive_password = "infected"
///
/// [tool]
/// executable = "/opt/hindsight/hindsight.py"
///
/// [[input]]
/// path = "collections/host1.zip"
/// ```
///
/// All sections are optional and have reasonable defaults. Command-line flags
/// override whatever is set here.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub job: JobSection,

    #[serde(default)]
    pub task_config: TaskConfig,

    #[serde(default)]
    pub tool: ToolSection,

    /// Input archives from `[[input]]`. A job accepts exactly one; the check
    /// happens when the job starts, not here.
    #[serde(default)]
    pub input: Vec<InputDescriptor>,
}

/// Validated configuration. Built through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub job: JobSection,
    pub task_config: TaskConfig,
    pub tool: ToolSection,
    pub input: Vec<InputDescriptor>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        job: JobSection,
        task_config: TaskConfig,
        tool: ToolSection,
        input: Vec<InputDescriptor>,
    ) -> Self {
        Self {
            job,
            task_config,
            tool,
            input,
        }
    }
}

/// `[job]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct JobSection {
    /// Where logs, the report and the temporary extraction root go.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    #[serde(default)]
    pub workflow_id: Option<String>,

    /// Fixed job id; a random UUID is used when unset.
    #[serde(default)]
    pub job_id: Option<String>,
}

/// `[task_config]` section: the options a user sets per job.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct TaskConfig {
    /// Password to decrypt the input archive if protected.
    #[serde(default)]
    pub archive_password: Option<String>,

    /// Browser profile folder to parse, e.g.
    /// `C:\Users\Ryan\AppData\Local\Google\Chrome\User Data\Default`.
    /// Required; matching is case sensitive.
    #[serde(default)]
    pub browser_profile: Option<String>,
}

impl TaskConfig {
    /// The password, treating an empty string as absent.
    pub fn effective_password(&self) -> Option<&str> {
        self.archive_password.as_deref().filter(|p| !p.is_empty())
    }
}

/// `[tool]` section: how to run the analysis tool and find its report.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ToolSection {
    #[serde(default = "default_executable")]
    pub executable: String,

    #[serde(default = "default_input_flag")]
    pub input_flag: String,

    /// Name used in logs and error messages.
    #[serde(default = "default_name")]
    pub name: String,

    /// Glob (file name only) matching the tool's default report name.
    #[serde(default = "default_report_pattern")]
    pub report_pattern: String,

    #[serde(default = "default_report_data_type")]
    pub report_data_type: String,

    /// How much of the execution log an execution error carries.
    #[serde(default = "default_log_tail_chars")]
    pub log_tail_chars: usize,
}

fn default_executable() -> String {
    "hindsight.py".to_string()
}

fn default_input_flag() -> String {
    "-i".to_string()
}

fn default_name() -> String {
    "Hindsight".to_string()
}

fn default_report_pattern() -> String {
    "Hindsight Report *.xlsx".to_string()
}

fn default_report_data_type() -> String {
    "openrelik:hindsight:report".to_string()
}

fn default_log_tail_chars() -> usize {
    crate::exec::command::DEFAULT_LOG_TAIL_CHARS
}

impl Default for ToolSection {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            input_flag: default_input_flag(),
            name: default_name(),
            report_pattern: default_report_pattern(),
            report_data_type: default_report_data_type(),
            log_tail_chars: default_log_tail_chars(),
        }
    }
}
