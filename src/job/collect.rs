// src/job/collect.rs

//! Discovery of the report the tool wrote into the output directory.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher};
use tracing::debug;

use crate::fs::FileSystem;

/// Slack for filesystems whose timestamps lag the wall clock.
pub const MTIME_TOLERANCE: Duration = Duration::from_secs(2);

pub fn report_matcher(pattern: &str) -> Result<GlobMatcher> {
    let glob = Glob::new(pattern).with_context(|| format!("invalid report pattern: {pattern}"))?;
    Ok(glob.compile_matcher())
}

/// Earliest mtime a report may have to count as produced by a run that
/// started at `started_at`.
pub fn not_before(started_at: SystemTime) -> SystemTime {
    started_at
        .checked_sub(MTIME_TOLERANCE)
        .map_or(SystemTime::UNIX_EPOCH, |t| t.max(SystemTime::UNIX_EPOCH))
}

/// Newest file directly in `dir` whose name matches `matcher` and which was
/// modified at or after `not_before`. Older matches are leftovers from a
/// previous run and are ignored.
pub fn find_report(
    fs: &dyn FileSystem,
    dir: &Path,
    matcher: &GlobMatcher,
    not_before: SystemTime,
) -> Result<Option<PathBuf>> {
    let mut candidates = Vec::new();

    for path in fs.read_dir(dir)? {
        if !fs.is_file(&path) {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !matcher.is_match(name) {
            continue;
        }
        let modified = fs.modified(&path)?;
        if modified < not_before {
            debug!(report = %path.display(), "ignoring stale report candidate");
            continue;
        }
        candidates.push((modified, path));
    }

    // Newest first; ties broken by name for determinism.
    candidates.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    Ok(candidates.into_iter().next().map(|(_, path)| path))
}
