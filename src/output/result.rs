// src/output/result.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::output::OutputRecord;
use crate::types::InputDescriptor;

/// Terminal artifact set of a successful job.
///
/// Only ever built complete; failed jobs return an error instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub output_files: Vec<OutputRecord>,
    #[serde(default)]
    pub workflow_id: Option<String>,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

impl JobResult {
    pub fn new(
        output_files: Vec<OutputRecord>,
        workflow_id: Option<String>,
        command: impl Into<String>,
        meta: BTreeMap<String, String>,
    ) -> Self {
        Self {
            output_files,
            workflow_id,
            command: command.into(),
            meta,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Treat this result's output files as inputs of a follow-up job.
    /// Records without a `path` are skipped.
    pub fn input_descriptors(&self) -> Vec<InputDescriptor> {
        self.output_files
            .iter()
            .filter_map(|record| {
                let path = record.get("path")?;
                Some(InputDescriptor {
                    path: PathBuf::from(path),
                    display_name: record.get("display_name").cloned(),
                })
            })
            .collect()
    }
}
