// src/resolve/search.rs

//! Recursive "ends with these components" directory search.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher};

use crate::fs::FileSystem;

/// Compile `**/<segments>` with every segment escaped, so user text like
/// `[1]` or `*` is matched literally and `*` never crosses a separator.
pub fn suffix_matcher(segments: &[String]) -> Result<GlobMatcher> {
    let escaped: Vec<String> = segments.iter().map(|s| globset::escape(s)).collect();
    let pattern = format!("**/{}", escaped.join("/"));
    let glob = GlobBuilder::new(&pattern)
        .literal_separator(true)
        .build()
        .with_context(|| format!("invalid suffix pattern: {pattern}"))?;
    Ok(glob.compile_matcher())
}

/// Collect every directory under `root` whose path relative to `root` ends
/// with the matcher's suffix. Symlinked directories are not descended into.
pub fn find_matching_dirs(
    fs: &dyn FileSystem,
    root: &Path,
    matcher: &GlobMatcher,
) -> Result<Vec<PathBuf>> {
    let mut matches = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            if !fs.is_dir(&path) || fs.is_symlink(&path) {
                continue;
            }
            if let Ok(rel) = path.strip_prefix(root) {
                let rel_str = rel.to_string_lossy().replace('\\', "/");
                if matcher.is_match(&rel_str) {
                    matches.push(path.clone());
                }
            }
            stack.push(path);
        }
    }

    Ok(matches)
}
