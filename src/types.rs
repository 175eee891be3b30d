// src/types.rs

//! Plain data types shared between the job pipeline and its collaborators.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Archive extension accepted as job input.
pub const ARCHIVE_EXTENSION: &str = ".zip";

/// Identifies the source archive of a job.
///
/// Deserialises from the `output_files` records of a previous job's result,
/// so only `path` is mandatory; other keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDescriptor {
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl InputDescriptor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Name shown to the user: the explicit display name when present and
    /// non-empty, otherwise the file name of `path`.
    pub fn effective_display_name(&self) -> String {
        match self.display_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}

/// Where an archive was expanded, plus the log the extractor wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub root: PathBuf,
    pub log_path: PathBuf,
}

impl ExtractionResult {
    pub fn root(&self) -> &Path {
        &self.root
    }
}
