//! Node-kind registry.
//!
//! Every node kind maps to a [`KindInfo`] describing how hosts label it,
//! its default footprint, and its connection ports. New node kinds are added
//! here and in [`NodeKind`](super::NodeKind).

use kurbo::Size;
use serde::{Deserialize, Serialize};

/// Direction of a connection port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HandleType {
    /// Output port; connections start here.
    Source,
    /// Input port; connections end here.
    Target,
}

/// Field-less discriminant of [`NodeKind`](super::NodeKind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeKindTag {
    Note,
    FileRef,
    Frame,
    Group,
    SubgraphInstance,
}

impl NodeKindTag {
    pub const ALL: [NodeKindTag; 5] = [
        NodeKindTag::Note,
        NodeKindTag::FileRef,
        NodeKindTag::Frame,
        NodeKindTag::Group,
        NodeKindTag::SubgraphInstance,
    ];

    /// View type string handed to the renderer.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKindTag::Note => "note",
            NodeKindTag::FileRef => "fileRef",
            NodeKindTag::Frame => "frame",
            NodeKindTag::Group => "group",
            NodeKindTag::SubgraphInstance => "subgraphInstance",
        }
    }

    pub fn info(self) -> &'static KindInfo {
        match self {
            NodeKindTag::Note => &NOTE,
            NodeKindTag::FileRef => &FILE_REF,
            NodeKindTag::Frame => &FRAME,
            NodeKindTag::Group => &GROUP,
            NodeKindTag::SubgraphInstance => &SUBGRAPH_INSTANCE,
        }
    }
}

/// A named connection port on a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortInfo {
    pub id: &'static str,
    pub handle_type: HandleType,
    /// Node kinds this output may connect into. `None` accepts any kind.
    pub accepts: Option<&'static [NodeKindTag]>,
}

impl PortInfo {
    /// Whether a connection from this port may end on a node of `kind`.
    pub fn accepts_kind(&self, kind: NodeKindTag) -> bool {
        self.accepts.is_none_or(|kinds| kinds.contains(&kind))
    }
}

/// Static description of a node kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindInfo {
    pub label: &'static str,
    pub icon: &'static str,
    pub default_size: Size,
    pub ports: &'static [PortInfo],
}

impl KindInfo {
    pub fn port(&self, id: &str) -> Option<&PortInfo> {
        self.ports.iter().find(|p| p.id == id)
    }

    /// First port with the given direction.
    pub fn default_port(&self, handle_type: HandleType) -> Option<&PortInfo> {
        self.ports.iter().find(|p| p.handle_type == handle_type)
    }
}

const IN_PORT: PortInfo = PortInfo {
    id: "in",
    handle_type: HandleType::Target,
    accepts: None,
};

const OUT_PORT: PortInfo = PortInfo {
    id: "out",
    handle_type: HandleType::Source,
    accepts: None,
};

static NOTE: KindInfo = KindInfo {
    label: "Note",
    icon: "note",
    default_size: Size {
        width: 240.0,
        height: 120.0,
    },
    ports: &[IN_PORT, OUT_PORT],
};

static FILE_REF: KindInfo = KindInfo {
    label: "File",
    icon: "file",
    default_size: Size {
        width: 220.0,
        height: 64.0,
    },
    ports: &[PortInfo {
        id: "out",
        handle_type: HandleType::Source,
        accepts: Some(&[NodeKindTag::Note]),
    }],
};

static FRAME: KindInfo = KindInfo {
    label: "Frame",
    icon: "frame",
    default_size: Size {
        width: 480.0,
        height: 320.0,
    },
    ports: &[],
};

static GROUP: KindInfo = KindInfo {
    label: "Group",
    icon: "group",
    default_size: Size {
        width: 320.0,
        height: 240.0,
    },
    ports: &[],
};

static SUBGRAPH_INSTANCE: KindInfo = KindInfo {
    label: "Subgraph",
    icon: "subgraph",
    default_size: Size {
        width: 260.0,
        height: 140.0,
    },
    ports: &[IN_PORT, OUT_PORT],
};
