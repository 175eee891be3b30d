use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::bail;
use hindsight_worker::extract::ArchiveExtractor;
use hindsight_worker::types::{ExtractionResult, InputDescriptor};

/// Directory name the fake extracts into, under the destination.
pub const FAKE_ROOT: &str = "extract_fake";

/// A fake extractor that:
/// - creates a fixed directory tree instead of reading the archive
/// - or fails with a configured message
/// - records the password it was called with
#[derive(Debug, Clone, Default)]
pub struct FakeExtractor {
    dirs: Vec<String>,
    fail_with: Option<String>,
    passwords: Arc<Mutex<Vec<Option<String>>>>,
}

impl FakeExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directories (relative, `/`-separated) to create under the root.
    pub fn with_dirs(mut self, dirs: &[&str]) -> Self {
        self.dirs = dirs.iter().map(|d| d.to_string()).collect();
        self
    }

    pub fn failing_with(mut self, message: &str) -> Self {
        self.fail_with = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.passwords.lock().unwrap().len()
    }

    pub fn passwords(&self) -> Vec<Option<String>> {
        self.passwords.lock().unwrap().clone()
    }
}

impl ArchiveExtractor for FakeExtractor {
    fn extract(
        &self,
        input: &InputDescriptor,
        destination: &Path,
        log_path: &Path,
        password: Option<&str>,
    ) -> anyhow::Result<ExtractionResult> {
        self.passwords
            .lock()
            .unwrap()
            .push(password.map(str::to_string));

        std::fs::write(
            log_path,
            format!("fake extraction of {}\n", input.path.display()),
        )?;

        if let Some(message) = &self.fail_with {
            bail!("{message}");
        }

        let root = destination.join(FAKE_ROOT);
        std::fs::create_dir_all(&root)?;
        for dir in &self.dirs {
            std::fs::create_dir_all(root.join(dir))?;
        }

        Ok(ExtractionResult {
            root,
            log_path: log_path.to_path_buf(),
        })
    }
}
