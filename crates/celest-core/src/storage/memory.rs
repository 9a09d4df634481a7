//! In-memory storage implementation.

use super::{BoxFuture, FsSnapshot, Storage, StorageError, StorageResult, is_state_path};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    files: RwLock<HashMap<String, String>>,
    /// Names whose writes fail, for exercising error paths.
    failing_writes: RwLock<Vec<String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write to `name` fail with an IO error.
    pub fn fail_writes_to(&self, name: &str) {
        if let Ok(mut failing) = self.failing_writes.write() {
            failing.push(name.to_string());
        }
    }

    /// Let writes to every file succeed again.
    pub fn clear_failures(&self) {
        if let Ok(mut failing) = self.failing_writes.write() {
            failing.clear();
        }
    }

    /// Synchronous read, for tests and inspection.
    pub fn get(&self, name: &str) -> Option<String> {
        self.files.read().ok()?.get(name).cloned()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl Storage for MemoryStorage {
    fn read_file(&self, name: &str) -> BoxFuture<'_, StorageResult<Option<String>>> {
        let name = name.to_string();
        Box::pin(async move {
            let files = self.files.read().map_err(lock_error)?;
            Ok(files.get(&name).cloned())
        })
    }

    fn write_file(&self, name: &str, contents: &str) -> BoxFuture<'_, StorageResult<()>> {
        let name = name.to_string();
        let contents = contents.to_string();
        Box::pin(async move {
            let failing = self.failing_writes.read().map_err(lock_error)?.contains(&name);
            if failing {
                return Err(StorageError::Io(format!("Failed to write {}", name)));
            }
            let mut files = self.files.write().map_err(lock_error)?;
            files.insert(name, contents);
            Ok(())
        })
    }

    fn delete_file(&self, name: &str) -> BoxFuture<'_, StorageResult<()>> {
        let name = name.to_string();
        Box::pin(async move {
            let mut files = self.files.write().map_err(lock_error)?;
            files.remove(&name);
            Ok(())
        })
    }

    fn scan_tree(&self) -> BoxFuture<'_, StorageResult<FsSnapshot>> {
        Box::pin(async move {
            let files = self.files.read().map_err(lock_error)?;
            let visible = files.keys().filter(|name| !is_state_path(name));
            Ok(FsSnapshot::from_files("", visible))
        })
    }
}
