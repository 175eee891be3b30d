// src/extract/mod.rs

//! Archive extraction boundary.
//!
//! The job treats extraction as opaque: an [`ArchiveExtractor`] expands the
//! input somewhere under a destination directory and either returns the
//! root it created or a free-text error. [`zipfile::ZipExtractor`] is the
//! default implementation.
//!
//! Extractors do not report a structured "wrong password" condition, so
//! [`translate_extraction_error`] turns likely password failures into an
//! actionable message.

pub mod zipfile;

use std::path::Path;

use crate::errors::JobError;
use crate::types::{ExtractionResult, InputDescriptor};

pub use zipfile::ZipExtractor;

/// Markers in an extraction failure that suggest an encrypted archive.
const PASSWORD_MARKERS: [&str; 3] = ["password", "protected", "execution error"];

pub const PASSWORD_REQUIRED_MESSAGE: &str =
    "Archive appears to be password-protected; please supply a password.";
pub const PASSWORD_INCORRECT_MESSAGE: &str =
    "Failed to extract archive; the password may be incorrect.";

/// Trait abstracting how an input archive is expanded.
pub trait ArchiveExtractor: Send + Sync {
    /// Expand `input` into a new directory under `destination`, writing a
    /// human-readable log to `log_path`.
    ///
    /// On error no extraction root may be left behind.
    fn extract(
        &self,
        input: &InputDescriptor,
        destination: &Path,
        log_path: &Path,
        password: Option<&str>,
    ) -> anyhow::Result<ExtractionResult>;
}

/// Map an extractor failure onto the job error the user sees.
///
/// - no password and the message smells of encryption: ask for a password;
/// - a password was given: suggest it is wrong;
/// - anything else propagates unchanged.
pub fn translate_extraction_error(err: anyhow::Error, password_supplied: bool) -> JobError {
    let message = format!("{err:#}").to_lowercase();
    let looks_protected = PASSWORD_MARKERS.iter().any(|m| message.contains(m));

    if !password_supplied && looks_protected {
        return JobError::Extraction(PASSWORD_REQUIRED_MESSAGE.to_string());
    }
    if password_supplied {
        return JobError::Extraction(PASSWORD_INCORRECT_MESSAGE.to_string());
    }
    JobError::Other(err)
}
