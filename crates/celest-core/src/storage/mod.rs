//! Storage abstraction for persistence.
//!
//! A [`Storage`] reads and writes text files addressed by project-relative
//! names (`.celest/graphs/main.json`) and can snapshot the project tree.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Hidden per-project state directory, excluded from tree scans.
pub const STATE_DIR: &str = ".celest";

/// Id of the root entry in an [`FsSnapshot`].
pub const ROOT_ID: &str = ".";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for project storage backends.
///
/// Missing files are reported as `Ok(None)`, never as an error.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait Storage: Send + Sync {
    /// Read a file's text, or `None` if it does not exist.
    fn read_file(&self, name: &str) -> BoxFuture<'_, StorageResult<Option<String>>>;

    /// Write a file, creating parent directories as needed.
    fn write_file(&self, name: &str, contents: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Delete a file. Deleting a missing file succeeds.
    fn delete_file(&self, name: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Snapshot the project tree, excluding [`STATE_DIR`].
    fn scan_tree(&self) -> BoxFuture<'_, StorageResult<FsSnapshot>>;
}

/// Trait for project storage backends (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Storage {
    /// Read a file's text, or `None` if it does not exist.
    fn read_file(&self, name: &str) -> BoxFuture<'_, StorageResult<Option<String>>>;

    /// Write a file, creating parent directories as needed.
    fn write_file(&self, name: &str, contents: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Delete a file. Deleting a missing file succeeds.
    fn delete_file(&self, name: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Snapshot the project tree, excluding [`STATE_DIR`].
    fn scan_tree(&self) -> BoxFuture<'_, StorageResult<FsSnapshot>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FsEntryKind {
    File,
    Dir,
}

/// One file or directory in a tree snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FsEntry {
    pub id: String,
    pub kind: FsEntryKind,
    pub name: String,
    /// Project-relative path with `/` separators; empty for the root.
    pub path: String,
    pub parent_id: Option<String>,
    /// Directories first, then by name.
    pub children: Vec<String>,
}

/// Serializable snapshot of a project's directory tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FsSnapshot {
    pub root_id: String,
    pub nodes: BTreeMap<String, FsEntry>,
}

impl Default for FsSnapshot {
    fn default() -> Self {
        Self::new("")
    }
}

impl FsSnapshot {
    /// An empty snapshot whose root is named `root_name`.
    pub fn new(root_name: &str) -> Self {
        let root = FsEntry {
            id: ROOT_ID.to_string(),
            kind: FsEntryKind::Dir,
            name: root_name.to_string(),
            path: String::new(),
            parent_id: None,
            children: Vec::new(),
        };
        Self {
            root_id: ROOT_ID.to_string(),
            nodes: BTreeMap::from([(ROOT_ID.to_string(), root)]),
        }
    }

    /// Build a snapshot from project-relative file paths. Parent
    /// directories are created implicitly.
    pub fn from_files<I, S>(root_name: &str, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut snapshot = Self::new(root_name);
        for path in files {
            snapshot.insert(path.as_ref(), FsEntryKind::File);
        }
        snapshot.sort_children();
        snapshot
    }

    pub fn root(&self) -> Option<&FsEntry> {
        self.nodes.get(&self.root_id)
    }

    pub fn get(&self, id: &str) -> Option<&FsEntry> {
        self.nodes.get(id)
    }

    /// Number of entries, excluding the root.
    pub fn len(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert an entry (and any missing ancestors). Entry ids are their paths.
    pub fn insert(&mut self, path: &str, kind: FsEntryKind) {
        let path = path.trim_matches('/');
        if path.is_empty() || self.nodes.contains_key(path) {
            return;
        }
        let (parent_id, name) = match path.rsplit_once('/') {
            Some((parent, name)) => {
                self.insert(parent, FsEntryKind::Dir);
                (parent.to_string(), name)
            }
            None => (self.root_id.clone(), path),
        };
        if let Some(parent) = self.nodes.get_mut(&parent_id) {
            parent.children.push(path.to_string());
        }
        self.nodes.insert(
            path.to_string(),
            FsEntry {
                id: path.to_string(),
                kind,
                name: name.to_string(),
                path: path.to_string(),
                parent_id: Some(parent_id),
                children: Vec::new(),
            },
        );
    }

    /// Order every child list: directories first, then by name.
    pub fn sort_children(&mut self) {
        let kinds: BTreeMap<String, (FsEntryKind, String)> = self
            .nodes
            .iter()
            .map(|(id, entry)| (id.clone(), (entry.kind, entry.name.clone())))
            .collect();
        for entry in self.nodes.values_mut() {
            entry.children.sort_by_key(|id| match kinds.get(id) {
                Some((FsEntryKind::Dir, name)) => (0, name.clone()),
                Some((FsEntryKind::File, name)) => (1, name.clone()),
                None => (2, id.clone()),
            });
        }
    }
}

/// Whether a project-relative path lies inside the hidden state directory.
pub fn is_state_path(path: &str) -> bool {
    let path = path.trim_start_matches('/');
    path == STATE_DIR || path.starts_with(&format!("{}/", STATE_DIR))
}
