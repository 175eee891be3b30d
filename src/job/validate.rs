// src/job/validate.rs

//! Checks run before anything touches the filesystem.

use tracing::{error, info};

use crate::errors::{JobError, Result};
use crate::types::{InputDescriptor, ARCHIVE_EXTENSION};

/// The profile hint must be present and non-blank.
pub fn require_profile_hint(hint: Option<&str>) -> Result<&str> {
    match hint {
        Some(hint) if !hint.trim().is_empty() => Ok(hint),
        _ => {
            error!("validation failed: no browser profile supplied");
            Err(JobError::Validation(
                "Browser Profile is required and must point to a Default folder to parse."
                    .to_string(),
            ))
        }
    }
}

/// Ensure exactly one ZIP archive is provided; return it with its display
/// name.
///
/// Several inputs are an error rather than "take the first": the job turns
/// one archive into one report.
pub fn validate_single_zip(inputs: &[InputDescriptor]) -> Result<(InputDescriptor, String)> {
    let input = match inputs {
        [] => {
            error!("validation failed: no input files provided");
            return Err(JobError::Validation(
                "No input files provided; expected exactly one ZIP archive.".to_string(),
            ));
        }
        [input] => input,
        _ => {
            error!(count = inputs.len(), "validation failed: expected exactly one input file");
            return Err(JobError::Validation(format!(
                "Expected exactly one ZIP archive, received {} files.",
                inputs.len()
            )));
        }
    };

    let display_name = input.effective_display_name();
    if !display_name.to_lowercase().ends_with(ARCHIVE_EXTENSION) {
        error!(display_name = %display_name, "validation failed: input file is not a ZIP");
        return Err(JobError::Validation(format!(
            "Input file must be a ZIP archive; received '{display_name}'."
        )));
    }

    info!(display_name = %display_name, "validated single ZIP input");
    Ok((input.clone(), display_name))
}
