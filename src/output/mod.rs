// src/output/mod.rs

//! Output-file registry and the final job result.
//!
//! Artifacts are stored as `<output_dir>/<uuid>.<ext>`; the user-facing name
//! travels separately as `display_name`, so tool-named files in the output
//! directory never collide with registered artifacts.

pub mod result;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use result::JobResult;

/// Plain key/value form of an output file, as embedded in a [`JobResult`].
pub type OutputRecord = BTreeMap<String, String>;

/// A file this job produces (or will produce) in the output directory.
///
/// Creating an `OutputFile` only reserves a path; nothing is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFile {
    pub uuid: String,
    pub display_name: String,
    pub extension: String,
    pub data_type: Option<String>,
    pub path: PathBuf,
}

impl OutputFile {
    pub fn create(dir: &Path, display_name: &str, data_type: Option<&str>) -> Self {
        let uuid = Uuid::new_v4().simple().to_string();
        let extension = extension_of(display_name);
        let file_name = if extension.is_empty() {
            uuid.clone()
        } else {
            format!("{uuid}.{extension}")
        };

        Self {
            path: dir.join(file_name),
            uuid,
            display_name: display_name.to_string(),
            extension,
            data_type: data_type.map(str::to_string),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn to_record(&self) -> OutputRecord {
        let mut record = OutputRecord::new();
        record.insert("uuid".to_string(), self.uuid.clone());
        record.insert("display_name".to_string(), self.display_name.clone());
        record.insert("extension".to_string(), self.extension.clone());
        record.insert("path".to_string(), self.path.to_string_lossy().into_owned());
        if let Some(data_type) = &self.data_type {
            record.insert("data_type".to_string(), data_type.clone());
        }
        record
    }
}

/// Text after the last `.` of a display name, or empty.
fn extension_of(display_name: &str) -> String {
    match display_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.contains(['/', '\\']) => ext.to_string(),
        _ => String::new(),
    }
}
