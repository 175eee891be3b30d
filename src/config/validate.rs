// src/config/validate.rs

use globset::Glob;

use crate::config::model::{ConfigFile, RawConfigFile, ToolSection};
use crate::errors::{JobError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::JobError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(
            raw.job,
            raw.task_config,
            raw.tool,
            raw.input,
        ))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_tool(&cfg.tool)?;
    validate_inputs(cfg)?;
    Ok(())
}

fn validate_tool(tool: &ToolSection) -> Result<()> {
    if tool.executable.trim().is_empty() {
        return Err(JobError::ConfigError(
            "[tool].executable must not be empty".to_string(),
        ));
    }

    if tool.input_flag.trim().is_empty() {
        return Err(JobError::ConfigError(
            "[tool].input_flag must not be empty".to_string(),
        ));
    }

    if tool.report_pattern.contains(['/', '\\']) {
        return Err(JobError::ConfigError(format!(
            "[tool].report_pattern matches file names only; got '{}'",
            tool.report_pattern
        )));
    }

    if let Err(e) = Glob::new(&tool.report_pattern) {
        return Err(JobError::ConfigError(format!(
            "[tool].report_pattern is not a valid glob ({}): {e}",
            tool.report_pattern
        )));
    }

    if tool.log_tail_chars == 0 {
        return Err(JobError::ConfigError(
            "[tool].log_tail_chars must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}

fn validate_inputs(cfg: &RawConfigFile) -> Result<()> {
    for input in cfg.input.iter() {
        if input.path.as_os_str().is_empty() {
            return Err(JobError::ConfigError(
                "[[input]] entries need a non-empty `path`".to_string(),
            ));
        }
    }
    Ok(())
}
