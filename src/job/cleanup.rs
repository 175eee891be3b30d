// src/job/cleanup.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::fs::FileSystem;

/// Owner of an extraction root; removes it exactly once.
///
/// Removal happens on [`ExtractionRoot::cleanup`] or, if the job future is
/// dropped before that, on drop. Failures are logged, never returned: a
/// failed cleanup must not change the job's outcome.
#[derive(Debug)]
pub struct ExtractionRoot {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    removed: bool,
}

impl ExtractionRoot {
    pub fn new(fs: Arc<dyn FileSystem>, path: PathBuf) -> Self {
        Self {
            fs,
            path,
            removed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cleanup(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if self.removed {
            return;
        }
        self.removed = true;

        if !self.fs.exists(&self.path) {
            debug!(root = %self.path.display(), "extraction root already gone");
            return;
        }
        match self.fs.remove_dir_all(&self.path) {
            Ok(()) => info!(root = %self.path.display(), "removed extraction root"),
            Err(e) => warn!(
                root = %self.path.display(),
                error = %format!("{e:#}"),
                "failed to remove extraction root"
            ),
        }
    }
}

impl Drop for ExtractionRoot {
    fn drop(&mut self) {
        self.remove();
    }
}
