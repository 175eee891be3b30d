// src/exec/command.rs

//! Shape of the analysis tool's command line.

use std::path::Path;

use crate::config::ToolSection;

/// Number of trailing log characters carried by an execution error.
pub const DEFAULT_LOG_TAIL_CHARS: usize = 2000;

/// How to invoke the analysis tool: `<program> <input_flag> <profile>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Executable name or path, resolved through `PATH` when bare.
    pub program: String,
    pub input_flag: String,
    /// Name used in log lines and error messages (e.g. "Hindsight").
    pub name: String,
    pub log_tail_chars: usize,
}

impl ToolCommand {
    /// Defaults for Hindsight: `hindsight.py -i <profile>`.
    pub fn hindsight() -> Self {
        Self {
            program: "hindsight.py".to_string(),
            input_flag: "-i".to_string(),
            name: "Hindsight".to_string(),
            log_tail_chars: DEFAULT_LOG_TAIL_CHARS,
        }
    }

    pub fn from_config(tool: &ToolSection) -> Self {
        Self {
            program: tool.executable.clone(),
            input_flag: tool.input_flag.clone(),
            name: tool.name.clone(),
            log_tail_chars: tool.log_tail_chars,
        }
    }

    /// The full argument vector, program first. The profile path is always a
    /// single argument, spaces included.
    pub fn args_for(&self, profile: &Path) -> Vec<String> {
        vec![
            self.program.clone(),
            self.input_flag.clone(),
            profile.to_string_lossy().into_owned(),
        ]
    }

    /// Command as a user would type it, for audit metadata.
    pub fn human_readable(&self, profile: &Path) -> String {
        format!(
            "{} {} \"{}\"",
            self.program,
            self.input_flag,
            profile.display()
        )
    }

    pub fn invocation(&self, profile: &Path) -> ToolInvocation {
        ToolInvocation {
            args: self.args_for(profile),
            human_readable: self.human_readable(profile),
        }
    }
}

impl Default for ToolCommand {
    fn default() -> Self {
        Self::hindsight()
    }
}

/// What was actually run, returned on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub args: Vec<String>,
    pub human_readable: String,
}

/// Last `max` characters of `text`, never splitting a UTF-8 sequence.
pub fn tail_chars(text: &str, max: usize) -> &str {
    let count = text.chars().count();
    if count <= max {
        return text;
    }
    let idx = text
        .char_indices()
        .nth(count - max)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    &text[idx..]
}
