//! Host-side state of open projects.
//!
//! A [`ProjectSession`] owns everything one open project needs: the graph,
//! views, UI state, selection, undo history and autosave state. [`Projects`]
//! is the arena of open sessions; closing a project drops its timer and
//! history with it.

use crate::graph::{
    CodeGraph, GraphEdge, remove_edge, remove_node, seed_graph, update_node_position, upsert_edge, upsert_node,
};
use crate::history::History;
use crate::interaction::{CanvasEvent, CanvasInteraction, EdgeChange, NodeChange};
use crate::persistence::{
    AutosaveState, DirtySource, FlushTicket, PersistenceResult, ProjectStore, SaveUiState, UiState, ViewId, ViewsState,
};
use crate::projection::{CanvasEdge, CanvasNode, project_edges, project_nodes, sanitize_handle};
use crate::selection::{Selection, prune_selection};
use crate::storage::Storage;
use crate::viewport::Viewport;
use std::collections::BTreeMap;
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;

pub type ProjectId = String;

/// A save started with [`ProjectSession::begin_save`], carrying the state
/// captured at that moment.
#[derive(Debug)]
pub struct PendingSave {
    ticket: FlushTicket,
    graph: Arc<CodeGraph>,
    views: ViewsState,
    ui: UiState,
}

impl PendingSave {
    /// Write the captured state. Edits to the session meanwhile are not lost:
    /// they keep the session dirty for the next save.
    pub async fn write<S: Storage>(&self, store: &ProjectStore<S>) -> PersistenceResult<()> {
        store.save_all(&self.graph, &self.views, &self.ui).await.map(|_| ())
    }
}

/// One open project.
pub struct ProjectSession<S: Storage> {
    id: ProjectId,
    store: ProjectStore<S>,
    graph: Arc<CodeGraph>,
    views: ViewsState,
    ui: UiState,
    selection: Selection,
    history: History,
    autosave: AutosaveState,
}

impl<S: Storage> ProjectSession<S> {
    /// Load a project, seeding a fresh graph when it has none.
    pub async fn open(id: impl Into<ProjectId>, store: ProjectStore<S>, now: Instant) -> PersistenceResult<Self> {
        let id = id.into();
        let workspace = store.load_workspace().await?;
        let loaded = store.load_graph(&workspace).await?;
        let mut autosave = AutosaveState::new(store.config().clone());

        let graph = match loaded {
            Some(file) if file.graph.node_count() > 0 => Arc::new(file.graph),
            _ => {
                log::info!("Seeding new graph for project {}", id);
                autosave.mark_dirty(DirtySource::Graph, now);
                seed_graph()
            }
        };

        let ui = workspace.ui.clone().unwrap_or_default();
        let restored: Selection = ui.canvas.selected_node_ids.iter().cloned().collect();
        let selection = prune_selection(&restored, &graph).unwrap_or(restored);

        log::info!(
            "Opened project {} ({} nodes, {} edges)",
            id,
            graph.node_count(),
            graph.edge_count()
        );
        Ok(Self {
            id,
            store,
            graph,
            views: workspace.views,
            ui,
            selection,
            history: History::new(),
            autosave,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn store(&self) -> &ProjectStore<S> {
        &self.store
    }

    pub fn graph(&self) -> &Arc<CodeGraph> {
        &self.graph
    }

    pub fn views(&self) -> &ViewsState {
        &self.views
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn autosave(&self) -> &AutosaveState {
        &self.autosave
    }

    pub fn save_ui(&self) -> SaveUiState {
        self.autosave.ui_state()
    }

    pub fn active_viewport(&self) -> Viewport {
        self.views.active_viewport()
    }

    /// Renderer view-models for the current graph and selection.
    pub fn canvas_nodes(&self) -> Vec<CanvasNode> {
        project_nodes(&self.graph, &self.selection)
    }

    pub fn canvas_edges(&self) -> Vec<CanvasEdge> {
        project_edges(&self.graph, &self.selection)
    }

    /// Push the session's viewport and selection into an orchestrator.
    pub fn sync_interaction(&self, interaction: &mut CanvasInteraction) {
        interaction.set_viewport(self.active_viewport());
        interaction.set_selection(self.selection.clone());
    }

    /// Apply events emitted by the orchestrator.
    ///
    /// Graph edits and viewport changes mark the project dirty; the selection
    /// is pruned after any graph change.
    pub fn apply(&mut self, events: &[CanvasEvent], now: Instant) {
        let before = Arc::clone(&self.graph);

        for event in events {
            match event {
                CanvasEvent::Checkpoint => self.history.push(&self.graph),
                CanvasEvent::Node(NodeChange::Position { id, position }) if !position.is_finite() => {
                    log::warn!("Ignoring non-finite position for node {}", id);
                }
                CanvasEvent::AddNode(node) if !node.is_finite() => {
                    log::warn!("Ignoring node {} with non-finite geometry", node.id);
                }
                CanvasEvent::Node(NodeChange::Position { id, position }) => {
                    self.graph = update_node_position(&self.graph, id, *position);
                }
                CanvasEvent::Node(NodeChange::Remove { id }) => {
                    self.graph = remove_node(&self.graph, id);
                }
                CanvasEvent::Edge(EdgeChange::Remove { id }) => {
                    self.graph = remove_edge(&self.graph, id);
                }
                CanvasEvent::Connect(connection) => {
                    let edge = GraphEdge::new(connection.source.clone(), connection.target.clone()).with_handles(
                        sanitize_handle(connection.source_handle.as_deref()),
                        sanitize_handle(connection.target_handle.as_deref()),
                    );
                    self.graph = upsert_edge(&self.graph, edge);
                }
                CanvasEvent::AddNode(node) => {
                    self.graph = upsert_node(&self.graph, node.clone());
                }
                CanvasEvent::AddEdge(edge) => {
                    self.graph = upsert_edge(&self.graph, edge.clone());
                }
                CanvasEvent::Selection(ids) => {
                    self.selection = ids.iter().cloned().collect();
                }
                CanvasEvent::Viewport(viewport) => {
                    *self.views.viewports.get_mut(self.views.active_view_id) = *viewport;
                    self.autosave.mark_dirty(DirtySource::Viewport, now);
                }
                CanvasEvent::Undo => {
                    if let Some(previous) = self.history.undo(&self.graph) {
                        self.graph = previous;
                    }
                }
                CanvasEvent::Redo => {
                    if let Some(next) = self.history.redo(&self.graph) {
                        self.graph = next;
                    }
                }
            }
        }

        if !Arc::ptr_eq(&before, &self.graph) {
            if let Some(pruned) = prune_selection(&self.selection, &self.graph) {
                self.selection = pruned;
            }
            self.autosave.mark_dirty(DirtySource::Graph, now);
        }
        self.ui.canvas.selected_node_ids = self
            .selection
            .iter()
            .filter(|id| self.graph.nodes.contains_key(*id))
            .cloned()
            .collect();
    }

    /// Switch the active canvas view.
    pub fn switch_view(&mut self, view: ViewId, now: Instant) {
        if self.views.active_view_id == view {
            return;
        }
        self.views.active_view_id = view;
        self.autosave.mark_dirty(DirtySource::View, now);
    }

    /// Expand or collapse a folder in the file tree.
    pub fn set_tree_expanded(&mut self, entry_id: &str, expanded: bool, now: Instant) {
        self.ui.fs_tree.expanded.insert(entry_id.to_string(), expanded);
        self.autosave.mark_dirty(DirtySource::Ui, now);
    }

    /// Select a file-tree entry.
    pub fn select_tree_entry(&mut self, entry_id: Option<String>, now: Instant) {
        self.ui.fs_tree.selected_id = entry_id;
        self.autosave.mark_dirty(DirtySource::Ui, now);
    }

    pub fn is_flush_due(&self, now: Instant) -> bool {
        self.autosave.is_flush_due(now)
    }

    /// Capture the current state for saving. `None` while a save is in flight.
    pub fn begin_save(&mut self) -> Option<PendingSave> {
        let ticket = self.autosave.begin_flush()?;
        Some(PendingSave {
            ticket,
            graph: Arc::clone(&self.graph),
            views: self.views,
            ui: self.ui.clone(),
        })
    }

    /// Record how a save started with `begin_save` ended.
    pub fn finish_save(&mut self, save: PendingSave, result: &PersistenceResult<()>, now: Instant) {
        self.autosave.complete_flush(save.ticket, result, now);
    }

    /// Save now. Failures land in [`Self::save_ui`]; returns whether a save ran.
    pub async fn flush(&mut self, now: Instant) -> bool {
        let Some(save) = self.begin_save() else {
            return false;
        };
        let store = self.store.clone();
        let result = save.write(&store).await;
        self.finish_save(save, &result, now);
        true
    }

    /// Save if the debounce timer has fired.
    pub async fn flush_if_due(&mut self, now: Instant) -> bool {
        if !self.is_flush_due(now) {
            return false;
        }
        self.flush(now).await
    }
}

/// Arena of open projects, keyed by id.
pub struct Projects<S: Storage> {
    sessions: BTreeMap<ProjectId, ProjectSession<S>>,
    active: Option<ProjectId>,
}

impl<S: Storage> Default for Projects<S> {
    fn default() -> Self {
        Self {
            sessions: BTreeMap::new(),
            active: None,
        }
    }
}

impl<S: Storage> Projects<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a project (or return it if already open) and make it active.
    pub async fn open(
        &mut self,
        id: &str,
        store: ProjectStore<S>,
        now: Instant,
    ) -> PersistenceResult<&mut ProjectSession<S>> {
        let session = match self.sessions.remove(id) {
            Some(session) => session,
            None => ProjectSession::open(id, store, now).await?,
        };
        self.active = Some(id.to_string());
        Ok(self.sessions.entry(id.to_string()).or_insert(session))
    }

    /// Close a project, handing back its session so unsaved work can be flushed.
    pub fn close(&mut self, id: &str) -> Option<ProjectSession<S>> {
        let session = self.sessions.remove(id)?;
        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
        if session.autosave().is_dirty() {
            log::warn!("Closing project {} with unsaved changes", id);
        }
        log::info!("Closed project {}", id);
        Some(session)
    }

    pub fn get(&self, id: &str) -> Option<&ProjectSession<S>> {
        self.sessions.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ProjectSession<S>> {
        self.sessions.get_mut(id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn set_active(&mut self, id: &str) -> bool {
        if !self.sessions.contains_key(id) {
            return false;
        }
        self.active = Some(id.to_string());
        true
    }

    pub fn active(&self) -> Option<&ProjectSession<S>> {
        self.sessions.get(self.active.as_deref()?)
    }

    pub fn active_mut(&mut self) -> Option<&mut ProjectSession<S>> {
        let id = self.active.as_deref()?;
        self.sessions.get_mut(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sessions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Ids of projects whose autosave timer has fired.
    pub fn due_for_flush(&self, now: Instant) -> Vec<ProjectId> {
        self.sessions
            .iter()
            .filter(|(_, session)| session.is_flush_due(now))
            .map(|(id, _)| id.clone())
            .collect()
    }
}
