use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, SyncError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
}

/// One immediate child of a directory.
#[derive(Debug, Clone)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
}

/// Filesystem capability injected into the synchronizer.
///
/// All paths are workspace-relative. Abstracting the store keeps the
/// engine independent of the workspace location and lets tests run against
/// an in-memory tree with no filesystem side effects.
pub trait FileStore {
    fn read(&self, path: &Path) -> Result<String>;

    /// Writes `content`, creating parent directories first. If directory
    /// creation fails the write is not attempted and the error propagates.
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Lists the immediate entries of a directory, sorted by name so that
    /// enumeration order is reproducible across platforms.
    fn list(&self, path: &Path) -> Result<Vec<Entry>>;

    fn exists(&self, path: &Path) -> bool;
}

/// A [`FileStore`] rooted at a real directory.
#[derive(Debug)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl FileStore for DiskStore {
    fn read(&self, path: &Path) -> Result<String> {
        let full = self.resolve(path);
        fs::read_to_string(&full).map_err(|e| SyncError::fs(full, e))
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        let full = self.resolve(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(|e| SyncError::fs(parent.to_path_buf(), e))?;
        }
        fs::write(&full, content).map_err(|e| SyncError::fs(full, e))
    }

    fn list(&self, path: &Path) -> Result<Vec<Entry>> {
        let full = self.resolve(path);
        let mut entries = Vec::new();

        for entry in fs::read_dir(&full).map_err(|e| SyncError::fs(full.clone(), e))? {
            let entry = entry.map_err(|e| SyncError::fs(full.clone(), e))?;
            let kind = if entry
                .file_type()
                .map_err(|e| SyncError::fs(entry.path(), e))?
                .is_dir()
            {
                EntryKind::Dir
            } else {
                EntryKind::File
            };
            entries.push(Entry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
            });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }
}

/// An in-memory [`FileStore`] used by unit tests and embedders that want
/// to dry-run a synchronization. Interior mutability keeps the trait's
/// `&self` surface; the engine is single-threaded by design.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: RefCell<BTreeMap<PathBuf, String>>,
    dirs: RefCell<BTreeSet<PathBuf>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a file, creating its ancestor directories.
    pub fn insert(&self, path: impl Into<PathBuf>, content: &str) {
        let path = path.into();
        self.record_ancestors(&path);
        self.files.borrow_mut().insert(path, content.to_string());
    }

    /// Seeds an empty directory.
    pub fn insert_dir(&self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.record_ancestors(&path);
        self.dirs.borrow_mut().insert(path);
    }

    /// Returns a file's current content, if present.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.borrow().get(path.as_ref()).cloned()
    }

    /// Snapshot of every file, for idempotence comparisons.
    pub fn snapshot(&self) -> BTreeMap<PathBuf, String> {
        self.files.borrow().clone()
    }

    fn record_ancestors(&self, path: &Path) {
        let mut dirs = self.dirs.borrow_mut();
        let mut current = path.parent();
        while let Some(dir) = current {
            if !dir.as_os_str().is_empty() {
                dirs.insert(dir.to_path_buf());
            }
            current = dir.parent();
        }
    }
}

impl FileStore for MemoryStore {
    fn read(&self, path: &Path) -> Result<String> {
        self.contents(path).ok_or_else(|| {
            SyncError::fs(path, io::Error::new(io::ErrorKind::NotFound, "no such file"))
        })
    }

    fn write(&self, path: &Path, content: &str) -> Result<()> {
        self.insert(path, content);
        Ok(())
    }

    fn list(&self, path: &Path) -> Result<Vec<Entry>> {
        if !self.dirs.borrow().contains(path) {
            return Err(SyncError::fs(
                path,
                io::Error::new(io::ErrorKind::NotFound, "no such directory"),
            ));
        }

        let mut entries: Vec<Entry> = Vec::new();
        for file in self.files.borrow().keys() {
            if file.parent() == Some(path) {
                entries.push(Entry {
                    name: file_name(file),
                    kind: EntryKind::File,
                });
            }
        }
        for dir in self.dirs.borrow().iter() {
            if dir.parent() == Some(path) {
                entries.push(Entry {
                    name: file_name(dir),
                    kind: EntryKind::Dir,
                });
            }
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path) || self.dirs.borrow().contains(path)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
