//! Projection of the domain graph into renderer view-models.

use crate::graph::{CodeGraph, GraphEdge, GraphNode, NodeKind};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Node-specific data handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasNodeData {
    pub title: String,
    pub label: String,
    pub icon: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// Renderer view-model for a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub position: Point,
    pub data: CanvasNodeData,
    pub selected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// Renderer view-model for an edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    pub selected: bool,
}

/// Map dangling handle values (`""`, `"undefined"`, `"null"`) to `None`.
pub fn sanitize_handle(handle: Option<&str>) -> Option<String> {
    match handle.map(str::trim) {
        None | Some("") | Some("undefined") | Some("null") => None,
        Some(h) => Some(h.to_string()),
    }
}

pub fn project_node(node: &GraphNode, selected: bool) -> CanvasNode {
    let info = node.info();
    let (width, height) = match node.kind {
        NodeKind::Frame { width, height } => (Some(width), Some(height)),
        _ => (None, None),
    };
    CanvasNode {
        id: node.id.clone(),
        node_type: node.kind_tag().as_str().to_string(),
        position: node.position,
        data: CanvasNodeData {
            title: node.title.clone(),
            label: info.label.to_string(),
            icon: info.icon.to_string(),
            kind: node.kind.clone(),
        },
        selected,
        width,
        height,
    }
}

pub fn project_edge(edge: &GraphEdge, selected: bool) -> CanvasEdge {
    CanvasEdge {
        id: edge.id.clone(),
        source: edge.source.clone(),
        target: edge.target.clone(),
        source_handle: sanitize_handle(edge.source_handle.as_deref()),
        target_handle: sanitize_handle(edge.target_handle.as_deref()),
        selected,
    }
}

/// Project every node, sorted by id.
pub fn project_nodes(graph: &CodeGraph, selection: &BTreeSet<String>) -> Vec<CanvasNode> {
    graph
        .nodes
        .values()
        .map(|node| project_node(node, selection.contains(&node.id)))
        .collect()
}

/// Project every edge, sorted by id.
pub fn project_edges(graph: &CodeGraph, selection: &BTreeSet<String>) -> Vec<CanvasEdge> {
    graph
        .edges
        .values()
        .map(|edge| project_edge(edge, selection.contains(&edge.id)))
        .collect()
}
