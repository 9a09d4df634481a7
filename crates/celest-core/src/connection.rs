//! Connection state machine: drag from an output port to an input port.
//!
//! `idle -> connecting -> (validate on every move) -> committed | cancelled -> idle`

use crate::graph::{CodeGraph, EdgeId, HandleType};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// What releasing over a valid target does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConnectionMode {
    /// Create a new edge.
    #[default]
    Create,
    /// Remove the edge the gesture re-traces.
    Delete,
}

/// A handle on a specific node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleRef {
    pub node_id: String,
    pub handle_id: Option<String>,
    pub handle_type: HandleType,
}

impl HandleRef {
    pub fn new(node_id: impl Into<String>, handle_id: Option<&str>, handle_type: HandleType) -> Self {
        Self {
            node_id: node_id.into(),
            handle_id: handle_id.map(str::to_string),
            handle_type,
        }
    }

    pub fn source(node_id: impl Into<String>, handle_id: &str) -> Self {
        Self::new(node_id, Some(handle_id), HandleType::Source)
    }

    pub fn target(node_id: impl Into<String>, handle_id: &str) -> Self {
        Self::new(node_id, Some(handle_id), HandleType::Target)
    }
}

/// A request to connect two handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

/// Whether a connection from `source` to `target` may be created.
///
/// Rejects: a source handle that isn't an output, a target handle that isn't
/// an input, self-connections, missing endpoint nodes, exact duplicates of an
/// existing edge, and targets whose kind the source port does not accept.
pub fn is_valid_connection(source: &HandleRef, target: &HandleRef, graph: &CodeGraph) -> bool {
    if source.handle_type != HandleType::Source || target.handle_type != HandleType::Target {
        return false;
    }
    if source.node_id == target.node_id {
        return false;
    }
    let (Some(source_node), Some(target_node)) = (graph.node(&source.node_id), graph.node(&target.node_id)) else {
        return false;
    };
    if graph.has_edge(
        &source.node_id,
        &target.node_id,
        source.handle_id.as_deref(),
        target.handle_id.as_deref(),
    ) {
        return false;
    }

    let info = source_node.info();
    let port = match source.handle_id.as_deref() {
        Some(id) => info.port(id),
        None => info.default_port(HandleType::Source),
    };
    port.is_none_or(|p| p.accepts_kind(target_node.kind_tag()))
}

/// Snapshot of the machine, read by renderers to draw the pending line.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionState {
    pub is_connecting: bool,
    pub mode: ConnectionMode,
    pub source_node_id: String,
    pub source_handle_id: Option<String>,
    pub source_handle_type: HandleType,
    pub source_position: Point,
    pub current_position: Point,
    pub target_node_id: Option<String>,
    pub target_handle_id: Option<String>,
    pub target_handle_type: Option<HandleType>,
    pub is_valid_target: bool,
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self {
            is_connecting: false,
            mode: ConnectionMode::Create,
            source_node_id: String::new(),
            source_handle_id: None,
            source_handle_type: HandleType::Source,
            source_position: Point::ZERO,
            current_position: Point::ZERO,
            target_node_id: None,
            target_handle_id: None,
            target_handle_type: None,
            is_valid_target: false,
        }
    }
}

impl ConnectionState {
    fn source_ref(&self) -> HandleRef {
        HandleRef {
            node_id: self.source_node_id.clone(),
            handle_id: self.source_handle_id.clone(),
            handle_type: self.source_handle_type,
        }
    }

    fn clear_target(&mut self) {
        self.target_node_id = None;
        self.target_handle_id = None;
        self.target_handle_type = None;
        self.is_valid_target = false;
    }
}

/// Outcome of releasing the pointer.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionOutcome {
    Connect(Connection),
    RemoveEdge(EdgeId),
    Cancelled,
}

/// The connection state machine.
#[derive(Debug, Clone, Default)]
pub struct ConnectionMachine {
    state: ConnectionState,
}

impl ConnectionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn is_connecting(&self) -> bool {
        self.state.is_connecting
    }

    /// Begin connecting from `handle`. Only output handles may start a
    /// connection; anything else leaves the machine untouched.
    pub fn start(&mut self, handle: &HandleRef, mode: ConnectionMode, position: Point) -> bool {
        if self.state.is_connecting {
            log::warn!("Connection already in progress from {}", self.state.source_node_id);
            return false;
        }
        if handle.handle_type != HandleType::Source {
            log::debug!("Ignoring connection start from input handle on {}", handle.node_id);
            return false;
        }
        self.state = ConnectionState {
            is_connecting: true,
            mode,
            source_node_id: handle.node_id.clone(),
            source_handle_id: handle.handle_id.clone(),
            source_handle_type: handle.handle_type,
            source_position: position,
            current_position: position,
            ..ConnectionState::default()
        };
        true
    }

    /// Re-evaluate the hovered element after a pointer move.
    pub fn update(&mut self, position: Point, hovered: Option<&HandleRef>, graph: &CodeGraph) {
        if !self.state.is_connecting {
            return;
        }
        self.state.current_position = position;

        let Some(target) = hovered.filter(|h| h.handle_type == HandleType::Target) else {
            self.state.clear_target();
            return;
        };

        let source = self.state.source_ref();
        let valid = match self.state.mode {
            ConnectionMode::Create => is_valid_connection(&source, target, graph),
            ConnectionMode::Delete => graph
                .find_edge(
                    &source.node_id,
                    &target.node_id,
                    source.handle_id.as_deref(),
                    target.handle_id.as_deref(),
                )
                .is_some(),
        };
        self.state.target_node_id = Some(target.node_id.clone());
        self.state.target_handle_id = target.handle_id.clone();
        self.state.target_handle_type = Some(target.handle_type);
        self.state.is_valid_target = valid;
    }

    /// Finish the gesture over `hovered` and reset to idle.
    pub fn release(&mut self, position: Point, hovered: Option<&HandleRef>, graph: &CodeGraph) -> ConnectionOutcome {
        if !self.state.is_connecting {
            return ConnectionOutcome::Cancelled;
        }
        self.update(position, hovered, graph);
        let state = std::mem::take(&mut self.state);

        if !state.is_valid_target {
            return ConnectionOutcome::Cancelled;
        }
        let Some(target_node_id) = state.target_node_id else {
            return ConnectionOutcome::Cancelled;
        };

        match state.mode {
            ConnectionMode::Create => ConnectionOutcome::Connect(Connection {
                source: state.source_node_id,
                target: target_node_id,
                source_handle: state.source_handle_id,
                target_handle: state.target_handle_id,
            }),
            ConnectionMode::Delete => graph
                .find_edge(
                    &state.source_node_id,
                    &target_node_id,
                    state.source_handle_id.as_deref(),
                    state.target_handle_id.as_deref(),
                )
                .map(|edge| ConnectionOutcome::RemoveEdge(edge.id.clone()))
                .unwrap_or(ConnectionOutcome::Cancelled),
        }
    }

    /// Abort without emitting anything.
    pub fn cancel(&mut self) {
        self.state = ConnectionState::default();
    }
}
