// src/resolve/mod.rs

//! Map a profile hint onto a real directory inside an extracted archive.
//!
//! - [`hint`] parses the user's Windows-style path and trims it to the part
//!   starting at `Users`.
//! - [`search`] walks the extraction tree looking for directories ending in
//!   that suffix.
//!
//! Matching is case-sensitive and segment-bounded. When several directories
//! match (several hosts or users in one collection) the lexicographically
//! smallest path wins, so results are reproducible.

pub mod hint;
pub mod search;

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::errors::{JobError, Result};
use crate::fs::FileSystem;

pub use hint::ProfileHint;

/// Resolve `profile_hint` inside `root`, returning the chosen directory.
pub fn find_browser_profile(
    fs: &dyn FileSystem,
    root: &Path,
    profile_hint: &str,
) -> Result<PathBuf> {
    let hint = ProfileHint::parse(profile_hint).inspect_err(|err| {
        error!(hint = %profile_hint, error = %err, "rejected browser profile hint");
    })?;

    let suffix = hint.search_suffix();
    info!(suffix = %suffix, root = %root.display(), "searching for profile hint suffix");

    let matcher = search::suffix_matcher(hint.search_segments())?;
    let mut candidates = search::find_matching_dirs(fs, root, &matcher)?;

    if candidates.is_empty() {
        error!(hint = %profile_hint, "profile hint not found");
        return Err(JobError::NotFound {
            hint: profile_hint.to_string(),
        });
    }

    candidates.sort();
    let count = candidates.len();
    let chosen = candidates.swap_remove(0);
    info!(path = %chosen.display(), candidates = count, "profile hint resolved");
    Ok(chosen)
}
