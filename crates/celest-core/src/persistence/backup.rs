//! Rotating backups next to a file: `name.backup`, `name.backup.1`, ...

use crate::storage::{Storage, StorageResult};

/// Name of the `index`-th backup of `name`. Index 0 is the newest.
pub fn backup_name(name: &str, index: usize) -> String {
    if index == 0 {
        format!("{}.backup", name)
    } else {
        format!("{}.backup.{}", name, index)
    }
}

/// Shift existing backups one slot older (dropping the oldest) and store
/// `content` as the newest.
///
/// Keeps at most `max_backups` files.
pub async fn rotate_backups<S: Storage + ?Sized>(
    storage: &S,
    name: &str,
    content: &str,
    max_backups: usize,
) -> StorageResult<()> {
    if max_backups == 0 {
        return Ok(());
    }
    storage.delete_file(&backup_name(name, max_backups - 1)).await?;
    for index in (0..max_backups - 1).rev() {
        if let Some(older) = storage.read_file(&backup_name(name, index)).await? {
            storage.write_file(&backup_name(name, index + 1), &older).await?;
        }
    }
    storage.write_file(&backup_name(name, 0), content).await
}

/// Newest backup that parses as JSON, if any.
pub async fn load_from_backups<S: Storage + ?Sized>(storage: &S, name: &str, max_backups: usize) -> Option<String> {
    for index in 0..max_backups {
        let backup = backup_name(name, index);
        match storage.read_file(&backup).await {
            Ok(Some(text)) if serde_json::from_str::<serde_json::Value>(&text).is_ok() => {
                log::warn!("Recovered {} from {}", name, backup);
                return Some(text);
            }
            Ok(Some(_)) => log::debug!("Skipping corrupt backup {}", backup),
            Ok(None) => {}
            Err(e) => log::debug!("Could not read backup {}: {}", backup, e),
        }
    }
    None
}
