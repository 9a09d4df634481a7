//! File-based storage implementation for native platforms.

use super::{BoxFuture, FsEntryKind, FsSnapshot, STATE_DIR, Storage, StorageError, StorageResult};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Storage rooted at a project folder on disk.
///
/// File names are project-relative paths with `/` separators.
pub struct FileStorage {
    root: PathBuf,
}

fn io_error(action: &str, path: &Path, e: io::Error) -> StorageError {
    match e.kind() {
        io::ErrorKind::PermissionDenied => StorageError::PermissionDenied(format!("{} {}", action, path.display())),
        io::ErrorKind::NotFound => StorageError::NotFound(path.display().to_string()),
        _ => StorageError::Io(format!("Failed to {} {}: {}", action, path.display(), e)),
    }
}

impl FileStorage {
    /// Open storage rooted at an existing directory.
    pub fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        let meta = fs::metadata(&root).map_err(|e| io_error("open", &root, e))?;
        if !meta.is_dir() {
            return Err(StorageError::Io(format!("{} is not a directory", root.display())));
        }
        Ok(Self { root })
    }

    /// Get the project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a project-relative name, refusing anything that escapes the root.
    fn resolve(&self, name: &str) -> StorageResult<PathBuf> {
        let relative = Path::new(name.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(StorageError::Other(format!("Invalid path: {}", name)));
        }
        Ok(self.root.join(relative))
    }
}

impl Storage for FileStorage {
    fn read_file(&self, name: &str) -> BoxFuture<'_, StorageResult<Option<String>>> {
        let path = self.resolve(name);
        Box::pin(async move {
            let path = path?;
            match fs::read_to_string(&path) {
                Ok(text) => Ok(Some(text)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(io_error("read", &path, e)),
            }
        })
    }

    fn write_file(&self, name: &str, contents: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.resolve(name);
        let contents = contents.to_string();
        Box::pin(async move {
            let path = path?;
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| io_error("create", parent, e))?;
            }
            fs::write(&path, contents).map_err(|e| io_error("write", &path, e))
        })
    }

    fn delete_file(&self, name: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.resolve(name);
        Box::pin(async move {
            let path = path?;
            match fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(io_error("delete", &path, e)),
            }
        })
    }

    fn scan_tree(&self) -> BoxFuture<'_, StorageResult<FsSnapshot>> {
        Box::pin(async move {
            let root_name = self
                .root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mut snapshot = FsSnapshot::new(&root_name);
            scan_dir(&self.root, "", &mut snapshot)?;
            snapshot.sort_children();
            Ok(snapshot)
        })
    }
}

fn scan_dir(dir: &Path, prefix: &str, snapshot: &mut FsSnapshot) -> StorageResult<()> {
    let entries = fs::read_dir(dir).map_err(|e| io_error("scan", dir, e))?;
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if prefix.is_empty() && name == STATE_DIR {
            continue;
        }
        let path = if prefix.is_empty() {
            name
        } else {
            format!("{}/{}", prefix, name)
        };
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            snapshot.insert(&path, FsEntryKind::Dir);
            scan_dir(&entry.path(), &path, snapshot)?;
        } else if file_type.is_file() {
            snapshot.insert(&path, FsEntryKind::File);
        }
    }
    Ok(())
}
