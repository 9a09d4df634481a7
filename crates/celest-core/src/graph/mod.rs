//! The node/edge graph and its pure mutation operators.
//!
//! Graphs are shared as `Arc<CodeGraph>`. Operators never mutate their
//! input: a change allocates a new graph, a no-op hands back the same `Arc`
//! so callers can detect "nothing changed" with [`Arc::ptr_eq`].

pub mod kinds;

pub use kinds::{HandleType, KindInfo, NodeKindTag, PortInfo};

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// Current in-memory graph schema version.
pub const CODE_GRAPH_VERSION: u32 = 1;

/// Title of the note seeded into a fresh project.
pub const SEED_NOTE_TITLE: &str = "Canvas (CodeGraph)";

pub type NodeId = String;
pub type EdgeId = String;

/// Generate a fresh node or edge id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Kind-specific payload of a graph node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodeKind {
    Note {
        text: String,
    },
    FileRef {
        path: String,
    },
    Frame {
        width: f64,
        height: f64,
    },
    Group {},
    #[serde(rename_all = "camelCase")]
    SubgraphInstance {
        def_id: String,
    },
}

impl NodeKind {
    pub fn tag(&self) -> NodeKindTag {
        match self {
            NodeKind::Note { .. } => NodeKindTag::Note,
            NodeKind::FileRef { .. } => NodeKindTag::FileRef,
            NodeKind::Frame { .. } => NodeKindTag::Frame,
            NodeKind::Group {} => NodeKindTag::Group,
            NodeKind::SubgraphInstance { .. } => NodeKindTag::SubgraphInstance,
        }
    }
}

/// A node of the domain graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub title: String,
    pub position: Point,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl GraphNode {
    pub fn new(id: impl Into<NodeId>, title: impl Into<String>, position: Point, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            position,
            kind,
        }
    }

    /// A note with a fresh id and empty text.
    pub fn new_note(title: impl Into<String>, position: Point) -> Self {
        Self::new(new_id(), title, position, NodeKind::Note { text: String::new() })
    }

    pub fn kind_tag(&self) -> NodeKindTag {
        self.kind.tag()
    }

    pub fn info(&self) -> &'static KindInfo {
        self.kind.tag().info()
    }

    /// Footprint used for hit and box tests. Frames carry their own size.
    pub fn size(&self) -> Size {
        match self.kind {
            NodeKind::Frame { width, height } => Size::new(width, height),
            _ => self.info().default_size,
        }
    }

    /// Whether position and size are real numbers. Anything else cannot be
    /// stored as JSON.
    pub fn is_finite(&self) -> bool {
        let size = self.size();
        self.position.is_finite() && size.width.is_finite() && size.height.is_finite()
    }

    /// Canvas-space bounds; `position` is the top-left corner.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size())
    }

    /// Copy with a fresh id, used by duplicate and paste.
    pub fn duplicate(&self) -> Self {
        Self {
            id: new_id(),
            ..self.clone()
        }
    }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl GraphEdge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: new_id(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
        }
    }

    pub fn with_handles(mut self, source_handle: Option<String>, target_handle: Option<String>) -> Self {
        self.source_handle = source_handle;
        self.target_handle = target_handle;
        self
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    /// Exact (source, target, sourceHandle, targetHandle) match.
    pub fn matches(&self, source: &str, target: &str, source_handle: Option<&str>, target_handle: Option<&str>) -> bool {
        self.source == source
            && self.target == target
            && self.source_handle.as_deref() == source_handle
            && self.target_handle.as_deref() == target_handle
    }
}

/// The domain graph. Maps are ordered by id so iteration is reproducible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeGraph {
    pub version: u32,
    pub nodes: BTreeMap<NodeId, GraphNode>,
    pub edges: BTreeMap<EdgeId, GraphEdge>,
}

impl Default for CodeGraph {
    fn default() -> Self {
        Self {
            version: CODE_GRAPH_VERSION,
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
        }
    }
}

impl CodeGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edges.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id) || self.edges.contains_key(id)
    }

    /// Edges with `node_id` as either endpoint.
    pub fn edges_of<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.values().filter(move |e| e.touches(node_id))
    }

    /// The edge exactly matching the given tuple, if any.
    pub fn find_edge(
        &self,
        source: &str,
        target: &str,
        source_handle: Option<&str>,
        target_handle: Option<&str>,
    ) -> Option<&GraphEdge> {
        self.edges
            .values()
            .find(|e| e.matches(source, target, source_handle, target_handle))
    }

    pub fn has_edge(&self, source: &str, target: &str, source_handle: Option<&str>, target_handle: Option<&str>) -> bool {
        self.find_edge(source, target, source_handle, target_handle).is_some()
    }

    /// Id of some node whose geometry is not finite.
    pub fn first_non_finite_node(&self) -> Option<&str> {
        self.nodes.values().find(|n| !n.is_finite()).map(|n| n.id.as_str())
    }

    /// Map of node id to current position.
    pub fn positions(&self) -> BTreeMap<NodeId, Point> {
        self.nodes
            .iter()
            .map(|(id, node)| (id.clone(), node.position))
            .collect()
    }
}

/// An empty graph.
pub fn create_empty_code_graph() -> Arc<CodeGraph> {
    Arc::new(CodeGraph::default())
}

/// The graph a brand-new project starts with: one note at the origin.
pub fn seed_graph() -> Arc<CodeGraph> {
    let note = GraphNode::new(
        new_id(),
        SEED_NOTE_TITLE,
        Point::ZERO,
        NodeKind::Note { text: String::new() },
    );
    upsert_node(&create_empty_code_graph(), note)
}

/// Insert or replace a node by id. Always allocates a new graph.
pub fn upsert_node(graph: &Arc<CodeGraph>, node: GraphNode) -> Arc<CodeGraph> {
    let mut next = CodeGraph::clone(graph);
    next.nodes.insert(node.id.clone(), node);
    Arc::new(next)
}

/// Move a node. Returns the same `Arc` if the node is missing or already
/// exactly at `position`.
pub fn update_node_position(graph: &Arc<CodeGraph>, id: &str, position: Point) -> Arc<CodeGraph> {
    match graph.nodes.get(id) {
        Some(node) if node.position != position => {
            let mut next = CodeGraph::clone(graph);
            if let Some(node) = next.nodes.get_mut(id) {
                node.position = position;
            }
            Arc::new(next)
        }
        _ => Arc::clone(graph),
    }
}

/// Remove a node and every edge touching it. No-op if absent.
pub fn remove_node(graph: &Arc<CodeGraph>, id: &str) -> Arc<CodeGraph> {
    if !graph.nodes.contains_key(id) {
        return Arc::clone(graph);
    }
    let mut next = CodeGraph::clone(graph);
    next.nodes.remove(id);
    next.edges.retain(|_, edge| !edge.touches(id));
    Arc::new(next)
}

/// Insert or replace an edge by id. Always allocates a new graph.
pub fn upsert_edge(graph: &Arc<CodeGraph>, edge: GraphEdge) -> Arc<CodeGraph> {
    let mut next = CodeGraph::clone(graph);
    next.edges.insert(edge.id.clone(), edge);
    Arc::new(next)
}

/// Remove an edge. No-op if absent.
pub fn remove_edge(graph: &Arc<CodeGraph>, id: &str) -> Arc<CodeGraph> {
    if !graph.edges.contains_key(id) {
        return Arc::clone(graph);
    }
    let mut next = CodeGraph::clone(graph);
    next.edges.remove(id);
    Arc::new(next)
}
