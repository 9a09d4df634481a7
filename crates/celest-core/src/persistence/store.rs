//! Loading and saving a project's state files through a [`Storage`].

use super::autosave::AutosaveConfig;
use super::backup::{load_from_backups, rotate_backups};
use super::error::{ErrorKind, PersistenceError, PersistenceResult};
use super::format::{FileMeta, GraphFileV1, UiState, ViewsState, WORKSPACE_FILE, WorkspaceFileV1, state_path};
use super::migrate::decode;
use crate::graph::CodeGraph;
use crate::storage::{FsSnapshot, Storage};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Reads and writes `.celest/` files for one project.
pub struct ProjectStore<S: Storage> {
    storage: Arc<S>,
    config: AutosaveConfig,
}

impl<S: Storage> Clone for ProjectStore<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            config: self.config.clone(),
        }
    }
}

fn encode<T: Serialize>(path: &str, value: &T) -> PersistenceResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| PersistenceError::Validation {
        path: path.to_string(),
        message: e.to_string(),
    })
}

impl<S: Storage> ProjectStore<S> {
    pub fn new(storage: Arc<S>, config: AutosaveConfig) -> Self {
        Self { storage, config }
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    pub fn config(&self) -> &AutosaveConfig {
        &self.config
    }

    async fn read_text(&self, path: &str) -> PersistenceResult<Option<String>> {
        self.storage
            .read_file(path)
            .await
            .map_err(|e| PersistenceError::read(path, e))
    }

    /// Decode a file, falling back to its backups when the primary is corrupt.
    async fn load_file<T: DeserializeOwned>(&self, path: &str) -> PersistenceResult<Option<T>> {
        let Some(text) = self.read_text(path).await? else {
            return Ok(None);
        };
        match decode(path, &text) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::Parse => {
                log::warn!("{}; trying backups", e);
                match load_from_backups(self.storage.as_ref(), path, self.config.max_backups).await {
                    Some(backup) => decode(path, &backup).map(Some),
                    None => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Like `load_file`, but recoverable failures count as "no file".
    async fn load_or_fresh<T: DeserializeOwned>(&self, path: &str) -> PersistenceResult<Option<T>> {
        match self.load_file(path).await {
            Err(e) if e.is_recoverable() => {
                log::warn!("{}; starting fresh", e.user_message());
                Ok(None)
            }
            other => other,
        }
    }

    /// The workspace file, or a new one when there is none usable.
    pub async fn load_workspace(&self) -> PersistenceResult<WorkspaceFileV1> {
        let path = state_path(WORKSPACE_FILE);
        Ok(self.load_or_fresh(&path).await?.unwrap_or_default())
    }

    /// The main graph file named by `workspace`, if one is usable.
    pub async fn load_graph(&self, workspace: &WorkspaceFileV1) -> PersistenceResult<Option<GraphFileV1>> {
        let path = state_path(workspace.main_graph_file());
        self.load_or_fresh(&path).await
    }

    /// Write `text` to `path`, first rotating the previous content into backups.
    async fn write_with_backup(&self, path: &str, text: &str, previous: Option<&str>) -> PersistenceResult<()> {
        if let (true, Some(previous)) = (self.config.backups, previous) {
            if let Err(e) = rotate_backups(self.storage.as_ref(), path, previous, self.config.max_backups).await {
                let err = PersistenceError::Backup {
                    path: path.to_string(),
                    message: e.to_string(),
                };
                log::warn!("{}", err.user_message());
            }
        }
        self.storage
            .write_file(path, text)
            .await
            .map_err(|e| PersistenceError::write(path, e))
    }

    /// Write the main graph file, keeping its `createdAt`.
    pub async fn save_graph(&self, workspace: &WorkspaceFileV1, graph: &CodeGraph) -> PersistenceResult<()> {
        let path = state_path(workspace.main_graph_file());
        if let Some(id) = graph.first_non_finite_node() {
            return Err(PersistenceError::Validation {
                path,
                message: format!("node {} has a non-finite position", id),
            });
        }
        let previous = self.read_text(&path).await?;
        let meta = previous
            .as_deref()
            .and_then(|text| serde_json::from_str::<GraphFileV1>(text).ok())
            .map(|file| file.meta.touched())
            .unwrap_or_else(FileMeta::now);

        let file = GraphFileV1::new(graph.clone(), meta);
        let text = encode(&path, &file)?;
        self.write_with_backup(&path, &text, previous.as_deref()).await
    }

    /// Re-read the workspace file, overlay `views` and `ui`, and write it back.
    pub async fn save_workspace(&self, views: &ViewsState, ui: &UiState) -> PersistenceResult<WorkspaceFileV1> {
        let path = state_path(WORKSPACE_FILE);
        let previous = self.read_text(&path).await?;
        let on_disk = match previous.as_deref() {
            Some(text) => match decode::<WorkspaceFileV1>(&path, text) {
                Ok(ws) => ws,
                Err(e) if e.is_recoverable() => {
                    log::warn!("Replacing unreadable workspace file: {}", e);
                    WorkspaceFileV1::new()
                }
                Err(e) => return Err(e),
            },
            None => WorkspaceFileV1::new(),
        };

        let merged = on_disk.merged(views, ui);
        let text = encode(&path, &merged)?;
        self.write_with_backup(&path, &text, previous.as_deref()).await?;
        Ok(merged)
    }

    /// Save the graph, then the workspace.
    pub async fn save_all(&self, graph: &CodeGraph, views: &ViewsState, ui: &UiState) -> PersistenceResult<WorkspaceFileV1> {
        let workspace = self.load_workspace().await?;
        self.save_graph(&workspace, graph).await?;
        let saved = self.save_workspace(views, ui).await?;
        log::info!("Saved project ({} nodes, {} edges)", graph.node_count(), graph.edge_count());
        Ok(saved)
    }

    /// Snapshot of the project tree.
    pub async fn scan_tree(&self) -> PersistenceResult<FsSnapshot> {
        self.storage
            .scan_tree()
            .await
            .map_err(|e| PersistenceError::read(".", e))
    }
}
