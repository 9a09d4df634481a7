//! On-disk file formats: `workspace.json` and graph files.

use crate::graph::CodeGraph;
use crate::storage::STATE_DIR;
use crate::viewport::Viewport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Version written into every file.
pub const CURRENT_VERSION: u32 = 1;

/// Workspace file, relative to [`STATE_DIR`].
pub const WORKSPACE_FILE: &str = "workspace.json";
/// Main graph file, relative to [`STATE_DIR`].
pub const MAIN_GRAPH_FILE: &str = "graphs/main.json";
pub const MAIN_GRAPH_ID: &str = "main";

/// Project-relative path of a file inside the state directory.
pub fn state_path(name: &str) -> String {
    format!("{}/{}", STATE_DIR, name)
}

/// Current UTC time as RFC 3339.
pub fn now_timestamp() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}

/// The two canvas views of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewId {
    #[default]
    Main,
    View2,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Viewports {
    pub main: Viewport,
    pub view2: Viewport,
}

impl Viewports {
    pub fn get(&self, view: ViewId) -> Viewport {
        match view {
            ViewId::Main => self.main,
            ViewId::View2 => self.view2,
        }
    }

    pub fn get_mut(&mut self, view: ViewId) -> &mut Viewport {
        match view {
            ViewId::Main => &mut self.main,
            ViewId::View2 => &mut self.view2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewsState {
    pub active_view_id: ViewId,
    pub viewports: Viewports,
}

impl ViewsState {
    pub fn active_viewport(&self) -> Viewport {
        self.viewports.get(self.active_view_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphsState {
    pub active_graph_id: String,
    /// Graph id to file path relative to the state directory.
    pub files: BTreeMap<String, String>,
}

impl Default for GraphsState {
    fn default() -> Self {
        Self {
            active_graph_id: MAIN_GRAPH_ID.to_string(),
            files: BTreeMap::from([(MAIN_GRAPH_ID.to_string(), MAIN_GRAPH_FILE.to_string())]),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FsTreeUi {
    #[serde(default)]
    pub expanded: BTreeMap<String, bool>,
    #[serde(default)]
    pub selected_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasUi {
    #[serde(default)]
    pub selected_node_ids: Vec<String>,
}

/// Per-project UI state restored on open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    #[serde(default)]
    pub fs_tree: FsTreeUi,
    #[serde(default)]
    pub canvas: CanvasUi,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMeta {
    pub created_at: String,
    pub updated_at: String,
}

impl FileMeta {
    pub fn now() -> Self {
        let now = now_timestamp();
        Self {
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Keep `created_at`, stamp `updated_at` with the current time.
    pub fn touched(&self) -> Self {
        Self {
            created_at: self.created_at.clone(),
            updated_at: now_timestamp(),
        }
    }
}

/// `.celest/workspace.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceFileV1 {
    pub version: u32,
    pub views: ViewsState,
    pub graphs: GraphsState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<UiState>,
    pub meta: FileMeta,
}

impl WorkspaceFileV1 {
    pub fn new() -> Self {
        Self {
            version: CURRENT_VERSION,
            views: ViewsState::default(),
            graphs: GraphsState::default(),
            ui: None,
            meta: FileMeta::now(),
        }
    }

    /// Overlay the session's views and UI onto this file, as read from disk.
    ///
    /// `createdAt` and graph entries the session does not know about survive.
    pub fn merged(&self, views: &ViewsState, ui: &UiState) -> Self {
        let mut graphs = self.graphs.clone();
        graphs
            .files
            .entry(MAIN_GRAPH_ID.to_string())
            .or_insert_with(|| MAIN_GRAPH_FILE.to_string());
        Self {
            version: CURRENT_VERSION,
            views: *views,
            graphs,
            ui: Some(ui.clone()),
            meta: self.meta.touched(),
        }
    }

    /// Path of the main graph file, relative to the state directory.
    pub fn main_graph_file(&self) -> &str {
        self.graphs
            .files
            .get(MAIN_GRAPH_ID)
            .map(String::as_str)
            .unwrap_or(MAIN_GRAPH_FILE)
    }
}

impl Default for WorkspaceFileV1 {
    fn default() -> Self {
        Self::new()
    }
}

/// `.celest/graphs/<id>.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphFileV1 {
    pub version: u32,
    pub graph: CodeGraph,
    pub meta: FileMeta,
}

impl GraphFileV1 {
    pub fn new(graph: CodeGraph, meta: FileMeta) -> Self {
        Self {
            version: CURRENT_VERSION,
            graph,
            meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::seed_graph;

    #[test]
    fn test_workspace_json_shape() {
        let mut ws = WorkspaceFileV1::new();
        ws.views.viewports.view2 = Viewport::new(10.0, 20.0, 2.0);
        ws.ui = Some(UiState {
            fs_tree: FsTreeUi {
                expanded: BTreeMap::from([("src".to_string(), true)]),
                selected_id: None,
            },
            canvas: CanvasUi {
                selected_node_ids: vec!["n1".into()],
            },
        });

        let json = serde_json::to_value(&ws).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["views"]["activeViewId"], "main");
        assert_eq!(json["views"]["viewports"]["view2"]["zoom"], 2.0);
        assert_eq!(json["graphs"]["activeGraphId"], "main");
        assert_eq!(json["graphs"]["files"]["main"], "graphs/main.json");
        assert_eq!(json["ui"]["fsTree"]["expanded"]["src"], true);
        assert!(json["ui"]["fsTree"]["selectedId"].is_null());
        assert_eq!(json["ui"]["canvas"]["selectedNodeIds"][0], "n1");
        assert!(json["meta"]["createdAt"].is_string());
    }

    #[test]
    fn test_merge_keeps_created_at_and_extra_graphs() {
        let mut on_disk = WorkspaceFileV1::new();
        on_disk.meta.created_at = "2024-01-01T00:00:00Z".into();
        on_disk.graphs.files.insert("scratch".into(), "graphs/scratch.json".into());

        let views = ViewsState {
            active_view_id: ViewId::View2,
            viewports: Viewports::default(),
        };
        let merged = on_disk.merged(&views, &UiState::default());
        assert_eq!(merged.meta.created_at, "2024-01-01T00:00:00Z");
        assert_ne!(merged.meta.updated_at, "2024-01-01T00:00:00Z");
        assert_eq!(merged.graphs.files.len(), 2);
        assert_eq!(merged.views.active_view_id, ViewId::View2);
        assert!(merged.ui.is_some());
    }

    #[test]
    fn test_timestamp_is_rfc3339() {
        let stamp = now_timestamp();
        assert!(OffsetDateTime::parse(&stamp, &Rfc3339).is_ok());
    }

    #[test]
    fn test_graph_file_roundtrip() {
        let file = GraphFileV1::new((*seed_graph()).clone(), FileMeta::now());
        let json = serde_json::to_string_pretty(&file).unwrap();
        let back: GraphFileV1 = serde_json::from_str(&json).unwrap();
        assert_eq!(back.graph, file.graph);
        assert_eq!(state_path(MAIN_GRAPH_FILE), ".celest/graphs/main.json");
    }
}
