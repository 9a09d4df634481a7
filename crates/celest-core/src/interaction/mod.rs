//! Canvas interaction orchestrator.
//!
//! [`CanvasInteraction`] receives raw pointer, wheel and keyboard events,
//! arbitrates between pan, node drag, box selection and connection gestures,
//! and answers with [`CanvasEvent`]s for the host to apply. It never owns the
//! graph: every handler reads the host's current [`CodeGraph`].
//!
//! Exactly one gesture is active at a time; it lives in a single [`Gesture`]
//! field, so overlapping gestures cannot be represented.

mod clipboard;
mod frame;
mod wheel;

pub use clipboard::{Clipboard, Pasted};
pub use frame::FrameSlot;
pub use wheel::{WheelGesture, interpret_wheel};

use crate::connection::{Connection, ConnectionMachine, ConnectionMode, ConnectionOutcome, ConnectionState};
use crate::drag::{DragState, start_drag};
use crate::geometry::{compute_bounds_from_items, normalized_rect};
use crate::graph::{CodeGraph, GraphEdge, GraphNode, NodeKindTag, new_id};
use crate::input::{FocusContext, Key, KeyEvent, MouseButton, PointerEvent, PointerTarget, WheelEvent};
use crate::selection::{Selection, handle_box_selection, handle_node_click, handle_pane_click, node_bounds};
use crate::viewport::{MAX_ZOOM, MIN_ZOOM, Viewport, screen_to_canvas};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Title given to notes created by double-clicking the canvas.
pub const NEW_NOTE_TITLE: &str = "New note";

/// Screen margin kept around the nodes when fitting the view.
pub const FIT_PADDING_PX: f64 = 40.0;

/// Tunables for the interaction loop.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionConfig {
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Exponential zoom rate per wheel pixel.
    pub wheel_zoom_sensitivity: f64,
    /// Exponential zoom rate per pinch pixel.
    pub pinch_zoom_sensitivity: f64,
    /// Screen pixels a pointer may travel and still count as a click.
    pub drag_threshold_px: f64,
    pub line_height_px: f64,
    pub page_height_px: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            wheel_zoom_sensitivity: 0.0015,
            pinch_zoom_sensitivity: 0.01,
            drag_threshold_px: 4.0,
            line_height_px: 16.0,
            page_height_px: 800.0,
        }
    }
}

/// Node change reported to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeChange {
    Position { id: String, position: Point },
    Remove { id: String },
}

/// Edge change reported to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EdgeChange {
    Remove { id: String },
}

/// Everything the orchestrator asks the host to do.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    /// A user-level edit begins; hosts snapshot undo history here.
    Checkpoint,
    Node(NodeChange),
    Edge(EdgeChange),
    Connect(Connection),
    AddNode(GraphNode),
    AddEdge(GraphEdge),
    /// New selection, sorted.
    Selection(Vec<String>),
    Viewport(Viewport),
    Undo,
    Redo,
}

/// Result of handling one input event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    pub events: Vec<CanvasEvent>,
    /// The host should stop the platform's default handling of the event.
    pub prevent_default: bool,
}

impl Response {
    fn push(&mut self, event: CanvasEvent) {
        self.events.push(event);
    }

    fn consumed(mut self) -> Self {
        self.prevent_default = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Center a node on screen, once per `nonce`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusRequest {
    pub node_id: String,
    /// Strictly increasing per request.
    pub nonce: u64,
}

#[derive(Debug, Clone, PartialEq)]
struct PanState {
    start_screen: Point,
    start_viewport: Viewport,
    via_space: bool,
}

#[derive(Debug, Clone, PartialEq)]
struct BoxSelectState {
    /// Canvas-space corners, normalized only when evaluated.
    start: Point,
    end: Point,
    start_screen: Point,
    /// Selection captured at gesture start; non-empty only with Shift.
    base: Selection,
    max_travel_px: f64,
}

/// The single active gesture.
#[derive(Debug, Clone, Default)]
enum Gesture {
    #[default]
    Idle,
    Panning(PanState),
    Dragging(DragState),
    BoxSelecting(BoxSelectState),
    Connecting(ConnectionMachine),
}

/// Public view of which gesture is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Idle,
    Panning,
    Dragging,
    BoxSelecting,
    Connecting,
}

/// Update applied on the next animation frame.
#[derive(Debug, Clone, PartialEq)]
enum FrameUpdate {
    Viewport(Viewport),
    Positions(BTreeMap<String, Point>),
    Selection(Selection),
}

/// Result of evaluating a box selection: the prior selection (when Shift
/// was held at gesture start) united with every node the box touches.
fn box_selection_result(state: &BoxSelectState, graph: &CodeGraph) -> Selection {
    let rect = normalized_rect(state.start, state.end);
    let mut result = state.base.clone();
    result.extend(handle_box_selection(graph.nodes.keys(), &node_bounds(graph), rect));
    result
}

/// Emit the drag's undo checkpoint right before its first edit.
fn checkpoint_once(drag: &mut DragState, response: &mut Response) {
    if !drag.checkpointed {
        drag.checkpointed = true;
        response.push(CanvasEvent::Checkpoint);
    }
}

fn position_events(positions: &BTreeMap<String, Point>) -> impl Iterator<Item = CanvasEvent> + '_ {
    positions.iter().map(|(id, position)| {
        CanvasEvent::Node(NodeChange::Position {
            id: id.clone(),
            position: *position,
        })
    })
}

/// The stateful interaction engine for one canvas.
#[derive(Debug, Clone)]
pub struct CanvasInteraction {
    config: InteractionConfig,
    viewport: Viewport,
    container: Size,
    selection: Selection,
    gesture: Gesture,
    frame: FrameSlot<FrameUpdate>,
    space_held: bool,
    last_pointer_canvas: Point,
    /// Set when the last box selection was a real drag; eats the next double-click.
    suppress_double_click: bool,
    clipboard: Clipboard,
    last_focus_nonce: Option<u64>,
}

impl Default for CanvasInteraction {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
}

impl CanvasInteraction {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            viewport: Viewport::default(),
            container: Size::new(800.0, 600.0),
            selection: Selection::new(),
            gesture: Gesture::Idle,
            frame: FrameSlot::new(),
            space_held: false,
            last_pointer_canvas: Point::ZERO,
            suppress_double_click: false,
            clipboard: Clipboard::new(),
            last_focus_nonce: None,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Mirror the host's viewport (view switch, restore from disk).
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn set_container_size(&mut self, size: Size) {
        self.container = size;
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Mirror the host's selection (after pruning, undo, project switch).
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    pub fn space_held(&self) -> bool {
        self.space_held
    }

    pub fn last_pointer_canvas(&self) -> Point {
        self.last_pointer_canvas
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn gesture(&self) -> GestureKind {
        match self.gesture {
            Gesture::Idle => GestureKind::Idle,
            Gesture::Panning(_) => GestureKind::Panning,
            Gesture::Dragging(_) => GestureKind::Dragging,
            Gesture::BoxSelecting(_) => GestureKind::BoxSelecting,
            Gesture::Connecting(_) => GestureKind::Connecting,
        }
    }

    pub fn is_gesture_active(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    /// The pending connection line, while connecting.
    pub fn connection_state(&self) -> Option<&ConnectionState> {
        match &self.gesture {
            Gesture::Connecting(machine) => Some(machine.state()),
            _ => None,
        }
    }

    /// The normalized selection rectangle, while box selecting.
    pub fn selection_box(&self) -> Option<Rect> {
        match &self.gesture {
            Gesture::BoxSelecting(state) => Some(normalized_rect(state.start, state.end)),
            _ => None,
        }
    }

    /// The running drag, if any.
    pub fn drag_state(&self) -> Option<&DragState> {
        match &self.gesture {
            Gesture::Dragging(state) => Some(state),
            _ => None,
        }
    }

    fn to_canvas(&self, screen: Point) -> Point {
        screen_to_canvas(screen, &self.viewport)
    }

    fn set_selection_into(&mut self, next: Selection, response: &mut Response) {
        if next != self.selection {
            self.selection = next;
            response.push(CanvasEvent::Selection(self.selection.iter().cloned().collect()));
        }
    }

    /// Refuse to start a gesture while another runs.
    fn can_start(&self, what: &str) -> bool {
        if self.is_gesture_active() {
            log::warn!("Rejecting {} start: {:?} already active", what, self.gesture());
            return false;
        }
        true
    }

    /// Pointer pressed.
    pub fn pointer_down(&mut self, event: &PointerEvent, graph: &CodeGraph) -> Response {
        self.last_pointer_canvas = self.to_canvas(event.position);
        self.suppress_double_click = false;

        match &event.target {
            PointerTarget::Node(id) => self.node_pointer_down(id, event, graph),
            PointerTarget::Edge(id) => self.edge_pointer_down(id, event),
            PointerTarget::Handle(handle) => {
                if event.button != MouseButton::Left || !self.can_start("connection") {
                    return Response::default();
                }
                let mode = if event.modifiers.alt {
                    ConnectionMode::Delete
                } else {
                    ConnectionMode::Create
                };
                let mut machine = ConnectionMachine::new();
                if machine.start(handle, mode, self.last_pointer_canvas) {
                    log::debug!("Connecting from {}", handle.node_id);
                    self.gesture = Gesture::Connecting(machine);
                }
                Response::default().consumed()
            }
            PointerTarget::Pane => self.pane_pointer_down(event),
        }
    }

    fn pane_pointer_down(&mut self, event: &PointerEvent) -> Response {
        let mut response = Response::default();
        let wants_pan = (self.space_held && event.button == MouseButton::Left) || event.button == MouseButton::Middle;

        if wants_pan {
            if !self.can_start("pan") {
                return response;
            }
            log::debug!("Pan started");
            self.gesture = Gesture::Panning(PanState {
                start_screen: event.position,
                start_viewport: self.viewport,
                via_space: self.space_held && event.button == MouseButton::Left,
            });
            return response.consumed();
        }

        if event.button != MouseButton::Left || !self.can_start("box selection") {
            return response;
        }

        let additive = event.modifiers.shift;
        let base = if additive { self.selection.clone() } else { Selection::new() };
        if !additive {
            self.set_selection_into(handle_pane_click(), &mut response);
        }
        log::debug!("Box selection started (additive: {})", additive);
        self.gesture = Gesture::BoxSelecting(BoxSelectState {
            start: self.last_pointer_canvas,
            end: self.last_pointer_canvas,
            start_screen: event.position,
            base,
            max_travel_px: 0.0,
        });
        response.consumed()
    }

    fn edge_pointer_down(&mut self, id: &str, event: &PointerEvent) -> Response {
        let mut response = Response::default();
        if event.button != MouseButton::Left || self.is_gesture_active() {
            return response;
        }
        let next = handle_node_click(id, &self.selection, event.modifiers.shift);
        self.set_selection_into(next, &mut response);
        response.consumed()
    }

    fn node_pointer_down(&mut self, id: &str, event: &PointerEvent, graph: &CodeGraph) -> Response {
        let mut response = Response::default();
        if event.button != MouseButton::Left || graph.node(id).is_none() {
            return response;
        }
        if !self.can_start("drag") {
            return response;
        }
        if event.modifiers.shift {
            let next = handle_node_click(id, &self.selection, true);
            self.set_selection_into(next, &mut response);
            return response.consumed();
        }

        let prior = self.selection.clone();
        let start = start_drag(id, &self.selection, &graph.positions());
        let selected = start.selected_ids.clone();
        self.set_selection_into(selected, &mut response);

        let mut drag = DragState::new(id.to_string(), start, self.last_pointer_canvas).with_prior_selection(prior);
        if event.modifiers.is_duplicate() {
            self.duplicate_drag(&mut drag, graph, &mut response);
        }
        log::debug!("Dragging {} node(s)", drag.dragged_node_ids.len());
        self.gesture = Gesture::Dragging(drag);
        response.consumed()
    }

    /// Copy every dragged node (and the edges among them) at its current
    /// position and continue the drag on the copies.
    fn duplicate_drag(&mut self, drag: &mut DragState, graph: &CodeGraph, response: &mut Response) {
        checkpoint_once(drag, response);
        let mut id_map = BTreeMap::new();
        for id in &drag.dragged_node_ids {
            let (Some(node), Some(position)) = (graph.node(id), drag.current_positions.get(id)) else {
                continue;
            };
            let mut copy = node.duplicate();
            copy.position = *position;
            id_map.insert(id.clone(), copy.id.clone());
            response.push(CanvasEvent::AddNode(copy));
        }
        for edge in graph.edges.values() {
            if let (Some(source), Some(target)) = (id_map.get(&edge.source), id_map.get(&edge.target)) {
                response.push(CanvasEvent::AddEdge(GraphEdge {
                    id: new_id(),
                    source: source.clone(),
                    target: target.clone(),
                    source_handle: edge.source_handle.clone(),
                    target_handle: edge.target_handle.clone(),
                }));
            }
        }
        drag.retarget(&id_map, self.last_pointer_canvas);
        let copies = drag.dragged_node_ids.clone();
        self.set_selection_into(copies, response);
        log::debug!("Duplicated {} node(s) for drag", id_map.len());
    }

    /// Pointer moved.
    pub fn pointer_move(&mut self, event: &PointerEvent, graph: &CodeGraph) -> Response {
        let canvas = self.to_canvas(event.position);
        self.last_pointer_canvas = canvas;
        let zoom = self.viewport.zoom;

        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Panning(pan) => {
                let next = pan.start_viewport.panned(event.position - pan.start_screen);
                self.frame.schedule(FrameUpdate::Viewport(next));
            }
            Gesture::Dragging(drag) => {
                drag.max_travel_px = drag.max_travel_px.max(drag.delta(canvas).hypot() * zoom);
                let positions = drag.update(canvas).clone();
                self.frame.schedule(FrameUpdate::Positions(positions));
            }
            Gesture::BoxSelecting(state) => {
                state.end = canvas;
                state.max_travel_px = state.max_travel_px.max((event.position - state.start_screen).hypot());
                if state.max_travel_px > self.config.drag_threshold_px {
                    let next = box_selection_result(state, graph);
                    self.frame.schedule(FrameUpdate::Selection(next));
                }
            }
            Gesture::Connecting(machine) => {
                let hovered = match &event.target {
                    PointerTarget::Handle(handle) => Some(handle),
                    _ => None,
                };
                machine.update(canvas, hovered, graph);
            }
        }
        Response::default()
    }

    /// Pointer released: finish whatever gesture is running.
    pub fn pointer_up(&mut self, event: &PointerEvent, graph: &CodeGraph) -> Response {
        let canvas = self.to_canvas(event.position);
        self.last_pointer_canvas = canvas;
        let mut response = Response::default();

        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {}
            Gesture::Panning(_) => {
                self.apply_pending_frame(&mut response);
                log::debug!("Pan finished");
            }
            Gesture::Dragging(mut drag) => {
                self.frame.cancel();
                drag.max_travel_px = drag.max_travel_px.max(drag.delta(canvas).hypot() * self.viewport.zoom);
                let moved = drag.max_travel_px > 0.0 || drag.duplicated;
                if moved {
                    checkpoint_once(&mut drag, &mut response);
                    let positions = drag.update(canvas);
                    response.events.extend(position_events(positions));
                } else if self.selection.len() > 1 && self.selection.contains(&drag.anchor_id) {
                    // Plain click on a member of a multi-selection.
                    let next = handle_node_click(&drag.anchor_id, &self.selection, false);
                    self.set_selection_into(next, &mut response);
                }
                log::debug!("Drag finished (moved: {})", moved);
            }
            Gesture::BoxSelecting(mut state) => {
                self.frame.cancel();
                state.end = canvas;
                let was_drag = state.max_travel_px > self.config.drag_threshold_px;
                let next = if was_drag {
                    box_selection_result(&state, graph)
                } else {
                    state.base.clone()
                };
                self.set_selection_into(next, &mut response);
                self.suppress_double_click = was_drag;
            }
            Gesture::Connecting(mut machine) => {
                let hovered = match &event.target {
                    PointerTarget::Handle(handle) => Some(handle),
                    _ => None,
                };
                match machine.release(canvas, hovered, graph) {
                    ConnectionOutcome::Connect(connection) => {
                        response.push(CanvasEvent::Checkpoint);
                        response.push(CanvasEvent::Connect(connection));
                    }
                    ConnectionOutcome::RemoveEdge(id) => {
                        response.push(CanvasEvent::Checkpoint);
                        response.push(CanvasEvent::Edge(EdgeChange::Remove { id }));
                    }
                    ConnectionOutcome::Cancelled => log::debug!("Connection cancelled"),
                }
            }
        }
        response
    }

    /// Double-click. On the empty pane this creates a note centered on the
    /// click, unless the second click was really a box-selection drag.
    pub fn double_click(&mut self, position: Point, target: &PointerTarget) -> Response {
        let mut response = Response::default();
        if *target != PointerTarget::Pane {
            return response;
        }
        if std::mem::take(&mut self.suppress_double_click) {
            log::debug!("Double-click after box drag, not creating a note");
            return response;
        }
        if self.is_gesture_active() {
            return response;
        }

        let canvas = self.to_canvas(position);
        let size = NodeKindTag::Note.info().default_size;
        let node = GraphNode::new_note(
            NEW_NOTE_TITLE,
            Point::new(canvas.x - size.width / 2.0, canvas.y - size.height / 2.0),
        );
        let id = node.id.clone();
        response.push(CanvasEvent::Checkpoint);
        response.push(CanvasEvent::AddNode(node));
        self.set_selection_into(Selection::from([id]), &mut response);
        response.consumed()
    }

    /// Wheel or trackpad input. Always consumed, so horizontal swipes never
    /// reach the browser's history navigation.
    pub fn wheel(&mut self, event: &WheelEvent) -> Response {
        let mut response = Response::default().consumed();
        if matches!(self.gesture, Gesture::Panning(_)) {
            return response;
        }
        let mut next = self.viewport;
        let changed = match interpret_wheel(event, &self.config) {
            WheelGesture::Zoom { factor } => next.zoom_at(event.position, factor, self.config.min_zoom, self.config.max_zoom),
            WheelGesture::Pan { delta } => {
                next.pan(delta);
                delta.x != 0.0 || delta.y != 0.0
            }
        };
        if changed {
            self.viewport = next;
            response.push(CanvasEvent::Viewport(next));
        }
        response
    }

    /// Apply the coalesced update for this frame.
    pub fn animation_frame(&mut self) -> Response {
        let mut response = Response::default();
        self.apply_pending_frame(&mut response);
        response
    }

    fn apply_pending_frame(&mut self, response: &mut Response) {
        match self.frame.take() {
            None => {}
            Some(FrameUpdate::Viewport(viewport)) => {
                self.viewport = viewport;
                response.push(CanvasEvent::Viewport(viewport));
            }
            Some(FrameUpdate::Positions(positions)) => {
                if let Gesture::Dragging(drag) = &mut self.gesture {
                    checkpoint_once(drag, response);
                }
                response.events.extend(position_events(&positions));
            }
            Some(FrameUpdate::Selection(selection)) => {
                self.set_selection_into(selection, response);
            }
        }
    }

    /// Key pressed.
    pub fn key_down(&mut self, event: &KeyEvent, graph: &CodeGraph) -> Response {
        if event.focus == FocusContext::TextInput {
            return Response::default();
        }

        match &event.key {
            Key::Space => {
                self.space_held = true;
                Response::default().consumed()
            }
            Key::Alt => {
                let mut response = Response::default();
                let Gesture::Dragging(drag) = &self.gesture else {
                    return response;
                };
                if drag.duplicated {
                    return response;
                }
                let mut drag = drag.clone();
                // Originals go back where they started; the copies take over.
                self.frame.cancel();
                checkpoint_once(&mut drag, &mut response);
                response.events.extend(position_events(&drag.drag_start_positions));
                self.duplicate_drag(&mut drag, graph, &mut response);
                self.gesture = Gesture::Dragging(drag);
                response.consumed()
            }
            Key::Escape => self.cancel_gesture(),
            Key::Delete | Key::Backspace => self.delete_selection(graph),
            Key::Character(_) if event.modifiers.is_command() => self.command_shortcut(event, graph),
            Key::Character(_) if event.character() == Some('f') => self.fit_to_graph(graph),
            _ => Response::default(),
        }
    }

    /// Key released.
    pub fn key_up(&mut self, event: &KeyEvent) -> Response {
        let mut response = Response::default();
        if event.key != Key::Space {
            return response;
        }
        self.space_held = false;
        if matches!(&self.gesture, Gesture::Panning(pan) if pan.via_space) {
            self.gesture = Gesture::Idle;
            self.apply_pending_frame(&mut response);
            log::debug!("Space released, pan ended");
        }
        response
    }

    /// Abort the running gesture, restoring what it changed.
    pub fn cancel_gesture(&mut self) -> Response {
        let mut response = Response::default();
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => return response,
            Gesture::Connecting(mut machine) => machine.cancel(),
            Gesture::Dragging(drag) => {
                self.frame.cancel();
                if drag.duplicated {
                    // Copied edges cascade with their nodes.
                    for id in &drag.dragged_node_ids {
                        response.push(CanvasEvent::Node(NodeChange::Remove { id: id.clone() }));
                    }
                }
                response.events.extend(position_events(&drag.original_positions));
                self.set_selection_into(drag.prior_selection, &mut response);
            }
            Gesture::Panning(pan) => {
                self.frame.cancel();
                self.viewport = pan.start_viewport;
                response.push(CanvasEvent::Viewport(pan.start_viewport));
            }
            Gesture::BoxSelecting(state) => {
                self.frame.cancel();
                self.set_selection_into(state.base, &mut response);
            }
        }
        log::debug!("Gesture cancelled");
        response.consumed()
    }

    /// Remove selected nodes (their edges cascade) and selected edges.
    fn delete_selection(&mut self, graph: &CodeGraph) -> Response {
        let mut response = Response::default();
        if self.is_gesture_active() {
            return response;
        }
        let nodes: Vec<&String> = self.selection.iter().filter(|id| graph.nodes.contains_key(*id)).collect();
        let edges: Vec<&String> = self.selection.iter().filter(|id| graph.edges.contains_key(*id)).collect();
        if nodes.is_empty() && edges.is_empty() {
            return response;
        }

        response.push(CanvasEvent::Checkpoint);
        for id in nodes {
            response.push(CanvasEvent::Node(NodeChange::Remove { id: id.clone() }));
        }
        for id in edges {
            response.push(CanvasEvent::Edge(EdgeChange::Remove { id: id.clone() }));
        }
        self.set_selection_into(Selection::new(), &mut response);
        response.consumed()
    }

    fn command_shortcut(&mut self, event: &KeyEvent, graph: &CodeGraph) -> Response {
        let mut response = Response::default();
        match event.character() {
            Some('c') => {
                let copied = self.clipboard.copy(&self.selection, graph);
                log::debug!("Copied {} node(s)", copied);
            }
            Some('x') => {
                if self.clipboard.copy(&self.selection, graph) > 0 {
                    return self.delete_selection(graph);
                }
            }
            Some('v') => return self.paste(),
            Some('a') => {
                let all: Selection = graph.nodes.keys().cloned().collect();
                self.set_selection_into(all, &mut response);
            }
            Some('z') if event.modifiers.shift => response.push(CanvasEvent::Redo),
            Some('z') => response.push(CanvasEvent::Undo),
            Some('y') => response.push(CanvasEvent::Redo),
            _ => return response,
        }
        response.consumed()
    }

    /// Paste the clipboard at the last pointer position.
    pub fn paste(&mut self) -> Response {
        let mut response = Response::default();
        if self.is_gesture_active() {
            return response;
        }
        let Some(pasted) = self.clipboard.paste(self.last_pointer_canvas) else {
            return response;
        };
        let ids = pasted.ids();
        response.push(CanvasEvent::Checkpoint);
        response.events.extend(pasted.nodes.into_iter().map(CanvasEvent::AddNode));
        response.events.extend(pasted.edges.into_iter().map(CanvasEvent::AddEdge));
        self.set_selection_into(ids, &mut response);
        response.consumed()
    }

    /// Zoom and pan so every node is visible.
    pub fn fit_to_graph(&mut self, graph: &CodeGraph) -> Response {
        let mut response = Response::default();
        if self.is_gesture_active() {
            return response;
        }
        let Some(bounds) = compute_bounds_from_items(graph.nodes.values().map(GraphNode::bounds)) else {
            return response;
        };
        let mut next = self.viewport;
        next.fit_to_bounds(bounds, self.container, FIT_PADDING_PX, self.config.min_zoom, self.config.max_zoom);
        if next != self.viewport {
            self.viewport = next;
            response.push(CanvasEvent::Viewport(next));
        }
        response.consumed()
    }

    /// Center the viewport on a node, at most once per request nonce.
    ///
    /// Ignored while a gesture runs; the request stays unhandled so a later
    /// call with the same nonce still applies.
    pub fn focus_node(&mut self, request: &FocusRequest, graph: &CodeGraph) -> Response {
        let mut response = Response::default();
        if self.last_focus_nonce == Some(request.nonce) {
            return response;
        }
        if self.is_gesture_active() {
            log::debug!("Focus request {} deferred: gesture active", request.nonce);
            return response;
        }
        self.last_focus_nonce = Some(request.nonce);

        let Some(node) = graph.node(&request.node_id) else {
            log::debug!("Focus request for unknown node {}", request.node_id);
            return response;
        };
        self.viewport.center_on(node.bounds().center(), self.container);
        response.push(CanvasEvent::Viewport(self.viewport));
        response
    }
}

#[cfg(test)]
mod tests;
