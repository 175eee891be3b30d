// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File {
        content: Vec<u8>,
        modified: SystemTime,
    },
    Dir(Vec<String>), // List of child names
}

/// In-memory tree. Paths are used verbatim as keys, so tests should stick to
/// one style (e.g. all rooted at `/extract`).
///
/// Files get strictly increasing modification times in insertion order unless
/// one is given explicitly.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
    clock: Arc<Mutex<u64>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut files = HashMap::new();
        // Ensure root exists
        files.insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            files: Arc::new(Mutex::new(files)),
            clock: Arc::new(Mutex::new(0)),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<PathBuf, MockEntry>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn tick(&self) -> SystemTime {
        let mut clock = self.clock.lock().unwrap_or_else(PoisonError::into_inner);
        *clock += 1;
        UNIX_EPOCH + Duration::from_secs(*clock)
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let modified = self.tick();
        self.add_file_modified_at(path, content, modified);
    }

    pub fn add_file_modified_at(
        &self,
        path: impl AsRef<Path>,
        content: impl Into<Vec<u8>>,
        modified: SystemTime,
    ) {
        let path = path.as_ref().to_path_buf();
        let mut files = self.entries();
        files.insert(
            path.clone(),
            MockEntry::File {
                content: content.into(),
                modified,
            },
        );
        link_into_parent(&mut files, &path);
    }

    /// Create a directory (and all of its ancestors).
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut files = self.entries();
        ensure_dir_entry(&mut files, path.as_ref());
    }

    /// Raw file contents, for assertions.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        match self.entries().get(path.as_ref()) {
            Some(MockEntry::File { content, .. }) => Some(content.clone()),
            _ => None,
        }
    }
}

fn parent_key(path: &Path) -> Option<&Path> {
    let parent = path.parent()?;
    if parent.as_os_str().is_empty() {
        Some(Path::new("."))
    } else {
        Some(parent)
    }
}

fn link_into_parent(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    let Some(parent) = parent_key(path) else {
        return;
    };
    if parent == path {
        return;
    }
    ensure_dir_entry(files, parent);
    if let Some(MockEntry::Dir(children)) = files.get_mut(parent) {
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if !children.iter().any(|c| c == name) {
                children.push(name.to_string());
            }
        }
    }
}

fn ensure_dir_entry(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    if files.contains_key(path) {
        return;
    }
    files.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
    link_into_parent(files, path);
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.entries().contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.entries().get(path), Some(MockEntry::File { .. }))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.entries().get(path), Some(MockEntry::Dir(_)))
    }

    fn is_symlink(&self, _path: &Path) -> bool {
        false
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        match self.entries().get(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        match self.entries().get(path) {
            Some(MockEntry::File { modified, .. }) => Ok(*modified),
            Some(MockEntry::Dir(_)) => Ok(UNIX_EPOCH),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let mut files = self.entries();
        let entry = match files.get(from) {
            Some(entry @ MockEntry::File { .. }) => entry.clone(),
            Some(MockEntry::Dir(_)) => return Err(anyhow!("Is a directory: {:?}", from)),
            None => return Err(anyhow!("File not found: {:?}", from)),
        };
        unlink(&mut files, from);
        files.insert(to.to_path_buf(), entry);
        link_into_parent(&mut files, to);
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        let mut files = self.entries();
        if !matches!(files.get(path), Some(MockEntry::Dir(_))) {
            return Err(anyhow!("Not a directory or not found: {:?}", path));
        }
        files.retain(|key, _| !key.starts_with(path));
        drop_from_parent(&mut files, path);
        Ok(())
    }
}

fn unlink(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    files.remove(path);
    drop_from_parent(files, path);
}

fn drop_from_parent(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
    let Some(parent) = parent_key(path) else {
        return;
    };
    if let (Some(MockEntry::Dir(children)), Some(name)) =
        (files.get_mut(parent), path.file_name().and_then(|n| n.to_str()))
    {
        children.retain(|c| c != name);
    }
}
