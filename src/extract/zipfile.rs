// src/extract/zipfile.rs

//! ZIP extraction with optional ZipCrypto decryption.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Component, Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, info, warn};
use uuid::Uuid;
use zip::ZipArchive;

use super::ArchiveExtractor;
use crate::types::{ExtractionResult, InputDescriptor};

/// Expands `.zip` archives into `<destination>/extract_<uuid>`.
#[derive(Debug, Clone, Default)]
pub struct ZipExtractor;

impl ZipExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug, Default)]
struct ExtractSummary {
    files: usize,
    dirs: usize,
    bytes: u64,
}

impl ArchiveExtractor for ZipExtractor {
    fn extract(
        &self,
        input: &InputDescriptor,
        destination: &Path,
        log_path: &Path,
        password: Option<&str>,
    ) -> Result<ExtractionResult> {
        let destination = std::path::absolute(destination)
            .with_context(|| format!("resolving extraction destination {:?}", destination))?;
        let root = destination.join(format!("extract_{}", Uuid::new_v4().simple()));
        let log_file = File::create(log_path)
            .with_context(|| format!("creating extraction log {:?}", log_path))?;
        let mut log = BufWriter::new(log_file);

        writeln!(
            log,
            "extracting {} ({}) into {}",
            input.effective_display_name(),
            input.path.display(),
            root.display()
        )?;

        let outcome = fs::create_dir_all(&root)
            .with_context(|| format!("creating extraction root {:?}", root))
            .and_then(|()| extract_zip(&input.path, &root, password, &mut log));

        match outcome {
            Ok(summary) => {
                writeln!(
                    log,
                    "done: {} files, {} directories, {} bytes",
                    summary.files, summary.dirs, summary.bytes
                )?;
                log.flush()?;
                info!(
                    root = %root.display(),
                    files = summary.files,
                    bytes = summary.bytes,
                    "zip archive extracted"
                );
                Ok(ExtractionResult {
                    root,
                    log_path: log_path.to_path_buf(),
                })
            }
            Err(err) => {
                let _ = writeln!(log, "ERROR: {err:#}");
                let _ = log.flush();
                if root.exists() {
                    if let Err(cleanup_err) = fs::remove_dir_all(&root) {
                        warn!(
                            root = %root.display(),
                            error = %cleanup_err,
                            "failed to remove partial extraction root"
                        );
                    }
                }
                Err(err)
            }
        }
    }
}

fn extract_zip(
    source: &Path,
    target: &Path,
    password: Option<&str>,
    log: &mut impl Write,
) -> Result<ExtractSummary> {
    let file = File::open(source).with_context(|| format!("opening archive {:?}", source))?;
    let mut archive =
        ZipArchive::new(file).with_context(|| format!("reading zip archive {:?}", source))?;
    let mut summary = ExtractSummary::default();

    for index in 0..archive.len() {
        let mut entry = match password {
            Some(password) => archive
                .by_index_decrypt(index, password.as_bytes())
                .with_context(|| format!("reading entry {index} of {:?}", source))?
                .map_err(|_| anyhow!("invalid password for entry {index} of {:?}", source))?,
            None => archive
                .by_index(index)
                .with_context(|| format!("reading entry {index} of {:?}", source))?,
        };

        let entry_path = sanitize_archive_path(entry.name())?;
        let destination = target.join(&entry_path);

        if entry.is_dir() {
            fs::create_dir_all(&destination)
                .with_context(|| format!("creating dir {:?}", destination))?;
            summary.dirs += 1;
            continue;
        }

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating dir {:?}", parent))?;
        }

        let mut output = File::create(&destination)
            .with_context(|| format!("creating file {:?}", destination))?;
        let written = io::copy(&mut entry, &mut output)
            .with_context(|| format!("writing {:?}", destination))?;

        debug!(entry = %entry_path.display(), bytes = written, "extracted entry");
        writeln!(log, "  {}", entry_path.display())?;
        summary.files += 1;
        summary.bytes += written;
    }

    Ok(summary)
}

/// Reject absolute names and `..` so entries cannot escape the root.
fn sanitize_archive_path(entry: &str) -> Result<PathBuf> {
    let path = Path::new(entry);
    if path.is_absolute() || entry.starts_with('/') || entry.starts_with('\\') {
        bail!("archive entry has an absolute path: {entry}");
    }

    let mut sanitized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(segment) => sanitized.push(segment),
            Component::CurDir => {}
            _ => bail!("archive entry escapes the extraction root: {entry}"),
        }
    }

    if sanitized.as_os_str().is_empty() {
        bail!("archive entry has an empty path: {entry:?}");
    }
    Ok(sanitized)
}
