//! Celest Core Library
//!
//! Platform-agnostic core of the Celest code canvas: the node graph, the
//! viewport and canvas interaction engine, and the per-project autosave
//! pipeline. Rendering and the file-tree UI live in the host.

pub mod connection;
pub mod drag;
pub mod geometry;
pub mod graph;
pub mod history;
pub mod input;
pub mod interaction;
pub mod persistence;
pub mod project;
pub mod projection;
pub mod selection;
pub mod storage;
pub mod viewport;

pub use connection::{Connection, ConnectionMachine, ConnectionMode, ConnectionState, HandleRef, is_valid_connection};
pub use drag::{DragStart, DragState, start_drag, update_drag_positions};
pub use graph::{CodeGraph, GraphEdge, GraphNode, NodeKind, NodeKindTag, create_empty_code_graph, seed_graph};
pub use history::History;
pub use input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent, PointerTarget, WheelEvent};
pub use interaction::{CanvasEvent, CanvasInteraction, EdgeChange, FocusRequest, InteractionConfig, NodeChange, Response};
pub use persistence::{AutosaveConfig, PersistenceError, ProjectStore, SaveStatus, SaveUiState};
pub use project::{ProjectSession, Projects};
pub use selection::Selection;
pub use storage::{MemoryStorage, Storage, StorageError};
pub use viewport::{Viewport, canvas_to_screen, screen_to_canvas};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
