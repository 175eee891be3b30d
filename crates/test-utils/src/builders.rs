#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use hindsight_worker::config::TaskConfig;
use hindsight_worker::job::{JobContext, JobRequest};
use hindsight_worker::types::InputDescriptor;

/// Builder for `JobRequest` to simplify test setup.
///
/// Defaults to a single `triage.zip` input and no profile hint.
pub struct JobRequestBuilder {
    request: JobRequest,
}

impl JobRequestBuilder {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            request: JobRequest {
                inputs: vec![InputDescriptor::new("/evidence/triage.zip")],
                output_dir: output_dir.to_path_buf(),
                task_config: TaskConfig::default(),
                context: JobContext::new(None).with_job_id("test-job"),
            },
        }
    }

    pub fn inputs(mut self, inputs: Vec<InputDescriptor>) -> Self {
        self.request.inputs = inputs;
        self
    }

    pub fn browser_profile(mut self, hint: &str) -> Self {
        self.request.task_config.browser_profile = Some(hint.to_string());
        self
    }

    pub fn archive_password(mut self, password: &str) -> Self {
        self.request.task_config.archive_password = Some(password.to_string());
        self
    }

    pub fn workflow_id(mut self, id: &str) -> Self {
        self.request.context.workflow_id = Some(id.to_string());
        self
    }

    pub fn build(self) -> JobRequest {
        self.request
    }
}

/// Create each `/`-separated relative directory under `root`.
pub fn make_dirs(root: &Path, dirs: &[&str]) -> std::io::Result<Vec<PathBuf>> {
    let mut created = Vec::with_capacity(dirs.len());
    for dir in dirs {
        let path = root.join(dir);
        std::fs::create_dir_all(&path)?;
        created.push(path);
    }
    Ok(created)
}

/// Write an unencrypted ZIP. Entry names ending in `/` become directories.
pub fn write_zip(archive: &Path, entries: &[(&str, &str)]) -> anyhow::Result<()> {
    let file = File::create(archive)?;
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::FileOptions::default();
    for (name, contents) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options)?;
        } else {
            zip.start_file(*name, options)?;
            zip.write_all(contents.as_bytes())?;
        }
    }
    zip.finish()?;
    Ok(())
}
