// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};

pub mod mock;

/// Abstract filesystem interface.
///
/// The resolver, report discovery and cleanup go through this trait so they
/// can be exercised against an in-memory tree.
pub trait FileSystem: Send + Sync + Debug {
    fn exists(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;

    /// True if `path` itself is a symbolic link (not followed).
    fn is_symlink(&self, path: &Path) -> bool;

    /// Return a list of entries in a directory.
    /// Returns full paths.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

    fn modified(&self, path: &Path) -> Result<SystemTime>;

    /// Move a file, falling back to copy + delete across devices.
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    fn remove_dir_all(&self, path: &Path) -> Result<()>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        path.is_symlink()
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).with_context(|| format!("reading dir {:?}", path))? {
            let entry = entry?;
            entries.push(entry.path());
        }
        Ok(entries)
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        let meta = fs::metadata(path).with_context(|| format!("reading metadata of {:?}", path))?;
        meta.modified()
            .with_context(|| format!("reading mtime of {:?}", path))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent).with_context(|| format!("creating dir {:?}", parent))?;
        }
        if fs::rename(from, to).is_ok() {
            return Ok(());
        }
        fs::copy(from, to).with_context(|| format!("copying {:?} to {:?}", from, to))?;
        fs::remove_file(from).with_context(|| format!("removing {:?}", from))?;
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        fs::remove_dir_all(path).with_context(|| format!("removing dir {:?}", path))
    }
}
