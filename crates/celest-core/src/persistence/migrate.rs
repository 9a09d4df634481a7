//! File version checks.
//!
//! Only version 1 exists, so the one migration is the identity. Older and
//! newer files are refused rather than guessed at.

use super::error::{PersistenceError, PersistenceResult};
use super::format::CURRENT_VERSION;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Read the `version` field of a parsed file.
pub fn file_version(path: &str, value: &Value) -> PersistenceResult<u32> {
    let Some(version) = value.get("version") else {
        return Err(PersistenceError::Validation {
            path: path.to_string(),
            message: "missing version field".to_string(),
        });
    };
    version
        .as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| PersistenceError::Validation {
            path: path.to_string(),
            message: format!("invalid version field: {}", version),
        })
}

/// Bring a parsed file up to [`CURRENT_VERSION`].
pub fn migrate(path: &str, value: Value) -> PersistenceResult<Value> {
    let found = file_version(path, &value)?;
    if found == CURRENT_VERSION {
        return Ok(value);
    }
    Err(PersistenceError::Migration {
        path: path.to_string(),
        found,
        expected: CURRENT_VERSION,
    })
}

/// Parse, version-check and decode a file's text.
pub fn decode<T: DeserializeOwned>(path: &str, text: &str) -> PersistenceResult<T> {
    let value: Value = serde_json::from_str(text).map_err(|e| PersistenceError::parse(path, e))?;
    let value = migrate(path, value)?;
    serde_json::from_value(value).map_err(|e| PersistenceError::Validation {
        path: path.to_string(),
        message: e.to_string(),
    })
}
