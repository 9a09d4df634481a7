//! Persistence error taxonomy.

use crate::storage::StorageError;
use thiserror::Error;

/// Stable category of a [`PersistenceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    FileNotFound,
    Parse,
    Validation,
    Migration,
    Backup,
    Write,
    Read,
}

impl ErrorKind {
    /// Code string shown in logs and the save indicator.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::FileNotFound => "FILE_NOT_FOUND",
            ErrorKind::Parse => "PARSE_ERROR",
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Migration => "MIGRATION_ERROR",
            ErrorKind::Backup => "BACKUP_ERROR",
            ErrorKind::Write => "WRITE_ERROR",
            ErrorKind::Read => "READ_ERROR",
        }
    }

    /// Whether the caller may fall back (fresh file, backup) instead of failing.
    pub fn is_recoverable(self) -> bool {
        matches!(
            self,
            ErrorKind::FileNotFound | ErrorKind::Parse | ErrorKind::Validation | ErrorKind::Backup
        )
    }

    pub fn suggestion(self) -> &'static str {
        match self {
            ErrorKind::FileNotFound => "A new file will be created.",
            ErrorKind::Parse => "Restore from a backup or reset to defaults.",
            ErrorKind::Validation => "Migrate the file or reset to defaults.",
            ErrorKind::Migration => "Open this project with a matching version of the app.",
            ErrorKind::Backup => "The save continues without a backup.",
            ErrorKind::Write => "Check disk space and folder permissions, then save again.",
            ErrorKind::Read => "Check that the project folder is readable.",
        }
    }
}

/// Errors raised while loading or saving project files.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },
    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },
    #[error("Invalid {path}: {message}")]
    Validation { path: String, message: String },
    #[error("Cannot migrate {path} from version {found} to {expected}")]
    Migration { path: String, found: u32, expected: u32 },
    #[error("Backup of {path} failed: {message}")]
    Backup { path: String, message: String },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: StorageError,
    },
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: StorageError,
    },
}

/// Result type for persistence operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl PersistenceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PersistenceError::FileNotFound { .. } => ErrorKind::FileNotFound,
            PersistenceError::Parse { .. } => ErrorKind::Parse,
            PersistenceError::Validation { .. } => ErrorKind::Validation,
            PersistenceError::Migration { .. } => ErrorKind::Migration,
            PersistenceError::Backup { .. } => ErrorKind::Backup,
            PersistenceError::Write { .. } => ErrorKind::Write,
            PersistenceError::Read { .. } => ErrorKind::Read,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.kind().is_recoverable()
    }

    pub fn suggestion(&self) -> &'static str {
        self.kind().suggestion()
    }

    /// Whether the underlying storage refused access.
    pub fn is_permission_denied(&self) -> bool {
        matches!(
            self,
            PersistenceError::Write {
                source: StorageError::PermissionDenied(_),
                ..
            } | PersistenceError::Read {
                source: StorageError::PermissionDenied(_),
                ..
            }
        )
    }

    /// Message for the save-status indicator.
    pub fn user_message(&self) -> String {
        if self.is_permission_denied() {
            return format!("[{}] {}. Permission denied: grant access to the project folder.", self.kind().code(), self);
        }
        format!("[{}] {}. {}", self.kind().code(), self, self.suggestion())
    }

    /// Wrap a storage error raised while reading `path`.
    pub fn read(path: &str, source: StorageError) -> Self {
        match source {
            StorageError::NotFound(_) => PersistenceError::FileNotFound { path: path.to_string() },
            StorageError::Serialization(message) => PersistenceError::Parse {
                path: path.to_string(),
                message,
            },
            source => PersistenceError::Read {
                path: path.to_string(),
                source,
            },
        }
    }

    /// Wrap a storage error raised while writing `path`.
    pub fn write(path: &str, source: StorageError) -> Self {
        PersistenceError::Write {
            path: path.to_string(),
            source,
        }
    }

    pub fn parse(path: &str, err: serde_json::Error) -> Self {
        PersistenceError::Parse {
            path: path.to_string(),
            message: err.to_string(),
        }
    }
}
