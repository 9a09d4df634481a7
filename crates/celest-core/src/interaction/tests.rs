use super::*;
use crate::connection::HandleRef;
use crate::graph::{GraphEdge, NodeKind, create_empty_code_graph, upsert_edge, upsert_node};
use crate::input::Modifiers;
use crate::viewport::canvas_to_screen;
use kurbo::Vec2;
use std::sync::Arc;

fn note(id: &str, x: f64, y: f64) -> GraphNode {
    GraphNode::new(id, id.to_uppercase(), Point::new(x, y), NodeKind::Note { text: String::new() })
}

/// `a` and `b` side by side with an `ab` edge, `c` below `a`.
fn graph() -> Arc<CodeGraph> {
    let g = create_empty_code_graph();
    let g = upsert_node(&g, note("a", 0.0, 0.0));
    let g = upsert_node(&g, note("b", 300.0, 0.0));
    let g = upsert_node(&g, note("c", 0.0, 300.0));
    upsert_edge(
        &g,
        GraphEdge {
            id: "ab".into(),
            source: "a".into(),
            target: "b".into(),
            source_handle: Some("out".into()),
            target_handle: Some("in".into()),
        },
    )
}

fn ids(list: &[&str]) -> Selection {
    list.iter().map(|s| s.to_string()).collect()
}

fn positions(response: &Response) -> BTreeMap<String, Point> {
    response
        .events
        .iter()
        .filter_map(|e| match e {
            CanvasEvent::Node(NodeChange::Position { id, position }) => Some((id.clone(), *position)),
            _ => None,
        })
        .collect()
}

fn added_nodes(response: &Response) -> Vec<&GraphNode> {
    response
        .events
        .iter()
        .filter_map(|e| match e {
            CanvasEvent::AddNode(node) => Some(node),
            _ => None,
        })
        .collect()
}

fn command(c: char) -> KeyEvent {
    KeyEvent::new(Key::Character(c)).with_modifiers(Modifiers::command())
}

#[test]
fn test_double_click_creates_centered_note() {
    let mut canvas = CanvasInteraction::default();
    let response = canvas.double_click(Point::new(200.0, 300.0), &PointerTarget::Pane);

    assert_eq!(response.events[0], CanvasEvent::Checkpoint);
    let nodes = added_nodes(&response);
    assert_eq!(nodes.len(), 1);
    let node = nodes[0];
    assert_eq!(node.position, Point::new(80.0, 240.0));
    assert_eq!(node.kind_tag(), NodeKindTag::Note);
    assert_eq!(canvas.selection(), &Selection::from([node.id.clone()]));
    assert!(response.events.contains(&CanvasEvent::Selection(vec![node.id.clone()])));
}

#[test]
fn test_double_click_respects_viewport() {
    let mut canvas = CanvasInteraction::default();
    canvas.set_viewport(Viewport::new(100.0, 50.0, 2.0));
    let response = canvas.double_click(Point::new(300.0, 250.0), &PointerTarget::Pane);
    // Canvas point (100, 100); note is 240x120.
    assert_eq!(added_nodes(&response)[0].position, Point::new(-20.0, 40.0));
}

#[test]
fn test_double_click_on_node_ignored() {
    let mut canvas = CanvasInteraction::default();
    let response = canvas.double_click(Point::ZERO, &PointerTarget::Node("a".into()));
    assert!(response.is_empty());
}

#[test]
fn test_node_drag_moves_and_commits() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();

    let down = canvas.pointer_down(&PointerEvent::on_node(Point::new(10.0, 10.0), "a"), &g);
    assert!(down.prevent_default);
    assert_eq!(down.events, vec![CanvasEvent::Selection(vec!["a".into()])]);
    assert_eq!(canvas.gesture(), GestureKind::Dragging);

    let moved = canvas.pointer_move(&PointerEvent::on_node(Point::new(60.0, -10.0), "a"), &g);
    assert!(moved.is_empty());
    let frame = canvas.animation_frame();
    assert_eq!(frame.events[0], CanvasEvent::Checkpoint);
    assert_eq!(positions(&frame)["a"], Point::new(50.0, -20.0));

    let up = canvas.pointer_up(&PointerEvent::on_node(Point::new(60.0, -10.0), "a"), &g);
    assert_eq!(positions(&up)["a"], Point::new(50.0, -20.0));
    assert_eq!(canvas.gesture(), GestureKind::Idle);
}

#[test]
fn test_moves_coalesce_into_one_frame() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    canvas.pointer_down(&PointerEvent::on_node(Point::ZERO, "a"), &g);
    for x in 1..=5 {
        canvas.pointer_move(&PointerEvent::on_pane(Point::new(x as f64, 0.0)), &g);
    }
    let frame = canvas.animation_frame();
    assert_eq!(frame.events.len(), 2);
    assert_eq!(positions(&frame)["a"], Point::new(5.0, 0.0));
    assert!(canvas.animation_frame().is_empty());
}

#[test]
fn test_drag_moves_whole_selection() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    canvas.set_selection(ids(&["a", "b"]));

    canvas.pointer_down(&PointerEvent::on_node(Point::ZERO, "a"), &g);
    let up = canvas.pointer_up(&PointerEvent::on_pane(Point::new(10.0, 5.0)), &g);
    let moved = positions(&up);
    assert_eq!(moved["a"], Point::new(10.0, 5.0));
    assert_eq!(moved["b"], Point::new(310.0, 5.0));
    assert_eq!(canvas.selection(), &ids(&["a", "b"]));
}

#[test]
fn test_click_on_multi_selection_collapses() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    canvas.set_selection(ids(&["a", "b"]));

    canvas.pointer_down(&PointerEvent::on_node(Point::new(5.0, 5.0), "a"), &g);
    let up = canvas.pointer_up(&PointerEvent::on_node(Point::new(5.0, 5.0), "a"), &g);
    assert!(positions(&up).is_empty());
    assert_eq!(canvas.selection(), &ids(&["a"]));
}

#[test]
fn test_shift_click_toggles_without_drag() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    canvas.set_selection(ids(&["a"]));

    let event = PointerEvent::on_node(Point::ZERO, "b").with_modifiers(Modifiers::shift());
    canvas.pointer_down(&event, &g);
    assert_eq!(canvas.selection(), &ids(&["a", "b"]));
    assert_eq!(canvas.gesture(), GestureKind::Idle);

    canvas.pointer_down(&event, &g);
    assert_eq!(canvas.selection(), &ids(&["a"]));
}

#[test]
fn test_escape_reverts_drag() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    canvas.pointer_down(&PointerEvent::on_node(Point::ZERO, "a"), &g);
    canvas.pointer_move(&PointerEvent::on_pane(Point::new(40.0, 40.0)), &g);
    canvas.animation_frame();

    let response = canvas.key_down(&KeyEvent::new(Key::Escape), &g);
    assert_eq!(positions(&response)["a"], Point::ZERO);
    assert_eq!(canvas.gesture(), GestureKind::Idle);
    assert!(canvas.animation_frame().is_empty());
}

#[test]
fn test_click_without_move_emits_no_checkpoint() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    let press = PointerEvent::on_node(Point::new(5.0, 5.0), "a");

    let down = canvas.pointer_down(&press, &g);
    let up = canvas.pointer_up(&press, &g);
    assert!(!down.events.contains(&CanvasEvent::Checkpoint));
    assert!(up.events.is_empty());
    assert_eq!(canvas.selection(), &ids(&["a"]));
}

#[test]
fn test_checkpoint_once_per_drag() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    canvas.pointer_down(&PointerEvent::on_node(Point::ZERO, "a"), &g);
    canvas.pointer_move(&PointerEvent::on_pane(Point::new(20.0, 0.0)), &g);
    let first = canvas.animation_frame();
    canvas.pointer_move(&PointerEvent::on_pane(Point::new(40.0, 0.0)), &g);
    let second = canvas.animation_frame();
    let up = canvas.pointer_up(&PointerEvent::on_pane(Point::new(40.0, 0.0)), &g);

    let checkpoints = [&first, &second, &up]
        .iter()
        .flat_map(|r| r.events.iter())
        .filter(|e| **e == CanvasEvent::Checkpoint)
        .count();
    assert_eq!(checkpoints, 1);
    assert_eq!(positions(&up)["a"], Point::new(40.0, 0.0));
}

#[test]
fn test_escape_after_alt_drag_removes_copies() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();

    let down = canvas.pointer_down(&PointerEvent::on_node(Point::ZERO, "c").with_modifiers(Modifiers::alt()), &g);
    let copy = added_nodes(&down)[0].id.clone();
    canvas.pointer_move(&PointerEvent::on_pane(Point::new(40.0, 0.0)), &g);
    canvas.animation_frame();

    let response = canvas.key_down(&KeyEvent::new(Key::Escape), &g);
    assert!(response.events.contains(&CanvasEvent::Node(NodeChange::Remove { id: copy.clone() })));
    assert!(!positions(&response).contains_key(&copy));
    assert_eq!(positions(&response)["c"], Point::new(0.0, 300.0));
    assert!(canvas.selection().is_empty());
    assert!(response.events.contains(&CanvasEvent::Selection(vec![])));
    assert_eq!(canvas.gesture(), GestureKind::Idle);
}

#[test]
fn test_escape_after_alt_mid_drag_restores_selection() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    canvas.set_selection(ids(&["b"]));
    canvas.pointer_down(&PointerEvent::on_node(Point::ZERO, "c"), &g);
    canvas.pointer_move(&PointerEvent::on_pane(Point::new(50.0, 0.0)), &g);
    let copy = added_nodes(&canvas.key_down(&KeyEvent::new(Key::Alt), &g))[0].id.clone();

    let response = canvas.key_down(&KeyEvent::new(Key::Escape), &g);
    assert!(response.events.contains(&CanvasEvent::Node(NodeChange::Remove { id: copy })));
    assert_eq!(positions(&response)["c"], Point::new(0.0, 300.0));
    assert_eq!(canvas.selection(), &ids(&["b"]));
}

#[test]
fn test_box_selection_below_threshold_selects_nothing() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    canvas.set_selection(ids(&["b"]));

    let down = canvas.pointer_down(&PointerEvent::on_pane(Point::new(-50.0, -50.0)), &g);
    assert_eq!(down.events, vec![CanvasEvent::Selection(vec![])]);
    canvas.pointer_move(&PointerEvent::on_pane(Point::new(-48.0, -50.0)), &g);
    assert!(canvas.animation_frame().is_empty());
    canvas.pointer_up(&PointerEvent::on_pane(Point::new(-48.0, -50.0)), &g);
    assert!(canvas.selection().is_empty());
}

#[test]
fn test_box_selection_updates_live_and_suppresses_double_click() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();

    canvas.pointer_down(&PointerEvent::on_pane(Point::new(-50.0, -50.0)), &g);
    canvas.pointer_move(&PointerEvent::on_pane(Point::new(20.0, 20.0)), &g);
    assert_eq!(canvas.selection_box(), Some(Rect::new(-50.0, -50.0, 20.0, 20.0)));
    let frame = canvas.animation_frame();
    assert_eq!(frame.events, vec![CanvasEvent::Selection(vec!["a".into()])]);

    let up = canvas.pointer_up(&PointerEvent::on_pane(Point::new(20.0, 20.0)), &g);
    assert!(up.is_empty());
    assert_eq!(canvas.selection(), &ids(&["a"]));

    assert!(canvas.double_click(Point::new(20.0, 20.0), &PointerTarget::Pane).is_empty());
    // Only the one double-click is eaten.
    assert!(!canvas.double_click(Point::new(20.0, 20.0), &PointerTarget::Pane).is_empty());
}

#[test]
fn test_shift_box_selection_is_additive() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    canvas.set_selection(ids(&["c"]));

    let down = PointerEvent::on_pane(Point::new(-10.0, -10.0)).with_modifiers(Modifiers::shift());
    assert!(canvas.pointer_down(&down, &g).is_empty());
    canvas.pointer_move(&PointerEvent::on_pane(Point::new(320.0, 10.0)), &g);
    canvas.pointer_up(&PointerEvent::on_pane(Point::new(320.0, 10.0)), &g);
    assert_eq!(canvas.selection(), &ids(&["a", "b", "c"]));
}

#[test]
fn test_escape_restores_box_base() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    canvas.set_selection(ids(&["c"]));

    let down = PointerEvent::on_pane(Point::new(-10.0, -10.0)).with_modifiers(Modifiers::shift());
    canvas.pointer_down(&down, &g);
    canvas.pointer_move(&PointerEvent::on_pane(Point::new(320.0, 10.0)), &g);
    canvas.animation_frame();
    assert_eq!(canvas.selection(), &ids(&["a", "b", "c"]));

    canvas.key_down(&KeyEvent::new(Key::Escape), &g);
    assert_eq!(canvas.selection(), &ids(&["c"]));
}

#[test]
fn test_middle_button_pan_and_cancel() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    let down = PointerEvent::on_pane(Point::new(100.0, 100.0)).with_button(MouseButton::Middle);
    canvas.pointer_down(&down, &g);
    assert_eq!(canvas.gesture(), GestureKind::Panning);

    canvas.pointer_move(&PointerEvent::on_pane(Point::new(150.0, 120.0)), &g);
    let frame = canvas.animation_frame();
    assert_eq!(frame.events, vec![CanvasEvent::Viewport(Viewport::new(50.0, 20.0, 1.0))]);

    let response = canvas.key_down(&KeyEvent::new(Key::Escape), &g);
    assert_eq!(response.events, vec![CanvasEvent::Viewport(Viewport::default())]);
    assert_eq!(canvas.viewport(), Viewport::default());
}

#[test]
fn test_space_pan_ends_on_release() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    canvas.key_down(&KeyEvent::new(Key::Space), &g);
    assert!(canvas.space_held());

    canvas.pointer_down(&PointerEvent::on_pane(Point::ZERO), &g);
    assert_eq!(canvas.gesture(), GestureKind::Panning);
    canvas.pointer_move(&PointerEvent::on_pane(Point::new(30.0, 0.0)), &g);

    let response = canvas.key_up(&KeyEvent::new(Key::Space));
    assert_eq!(response.events, vec![CanvasEvent::Viewport(Viewport::new(30.0, 0.0, 1.0))]);
    assert_eq!(canvas.gesture(), GestureKind::Idle);
    assert!(!canvas.space_held());
}

#[test]
fn test_second_gesture_rejected() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    canvas.pointer_down(&PointerEvent::on_node(Point::ZERO, "a"), &g);

    let response = canvas.pointer_down(&PointerEvent::on_pane(Point::new(500.0, 500.0)), &g);
    assert!(response.is_empty());
    assert_eq!(canvas.gesture(), GestureKind::Dragging);
    assert_eq!(canvas.selection(), &ids(&["a"]));
}

#[test]
fn test_connect_between_handles() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    let source = PointerEvent::new(Point::new(240.0, 60.0), PointerTarget::Handle(HandleRef::source("a", "out")));
    canvas.pointer_down(&source, &g);
    assert_eq!(canvas.gesture(), GestureKind::Connecting);

    let over = PointerEvent::new(Point::new(0.0, 360.0), PointerTarget::Handle(HandleRef::target("c", "in")));
    canvas.pointer_move(&over, &g);
    assert!(canvas.connection_state().is_some_and(|s| s.is_valid_target));

    let up = canvas.pointer_up(&over, &g);
    assert_eq!(
        up.events,
        vec![
            CanvasEvent::Checkpoint,
            CanvasEvent::Connect(Connection {
                source: "a".into(),
                target: "c".into(),
                source_handle: Some("out".into()),
                target_handle: Some("in".into()),
            }),
        ]
    );
    assert_eq!(canvas.gesture(), GestureKind::Idle);
}

#[test]
fn test_duplicate_connection_cancelled() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    let source = PointerEvent::new(Point::ZERO, PointerTarget::Handle(HandleRef::source("a", "out")));
    canvas.pointer_down(&source, &g);
    let over = PointerEvent::new(Point::ZERO, PointerTarget::Handle(HandleRef::target("b", "in")));
    assert!(canvas.pointer_up(&over, &g).is_empty());
}

#[test]
fn test_alt_handle_drag_deletes_edge() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    let source = PointerEvent::new(Point::ZERO, PointerTarget::Handle(HandleRef::source("a", "out"))).with_modifiers(Modifiers::alt());
    canvas.pointer_down(&source, &g);
    let over = PointerEvent::new(Point::ZERO, PointerTarget::Handle(HandleRef::target("b", "in")));
    let up = canvas.pointer_up(&over, &g);
    assert_eq!(up.events, vec![CanvasEvent::Checkpoint, CanvasEvent::Edge(EdgeChange::Remove { id: "ab".into() })]);
}

#[test]
fn test_edge_click_selects_edge() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    canvas.set_selection(ids(&["a"]));
    canvas.pointer_down(&PointerEvent::new(Point::ZERO, PointerTarget::Edge("ab".into())), &g);
    assert_eq!(canvas.selection(), &ids(&["ab"]));

    let shift = PointerEvent::new(Point::ZERO, PointerTarget::Node("a".into())).with_modifiers(Modifiers::shift());
    canvas.pointer_down(&shift, &g);
    assert_eq!(canvas.selection(), &ids(&["a", "ab"]));
}

#[test]
fn test_delete_removes_selected_nodes_and_edges() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    canvas.set_selection(ids(&["c", "ab", "ghost"]));

    let response = canvas.key_down(&KeyEvent::new(Key::Delete), &g);
    assert_eq!(
        response.events,
        vec![
            CanvasEvent::Checkpoint,
            CanvasEvent::Node(NodeChange::Remove { id: "c".into() }),
            CanvasEvent::Edge(EdgeChange::Remove { id: "ab".into() }),
            CanvasEvent::Selection(vec![]),
        ]
    );
    assert!(canvas.selection().is_empty());
}

#[test]
fn test_delete_ignored_in_text_input() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    canvas.set_selection(ids(&["a"]));
    assert!(canvas.key_down(&KeyEvent::new(Key::Backspace).in_text_input(), &g).is_empty());
    assert!(canvas.key_down(&command('a').in_text_input(), &g).is_empty());
    assert_eq!(canvas.selection(), &ids(&["a"]));
}

#[test]
fn test_delete_ignored_during_gesture() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    canvas.pointer_down(&PointerEvent::on_node(Point::ZERO, "a"), &g);
    assert!(canvas.key_down(&KeyEvent::new(Key::Delete), &g).is_empty());
}

#[test]
fn test_alt_drag_duplicates_nodes_and_internal_edges() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    canvas.set_selection(ids(&["a", "b"]));

    let down = PointerEvent::on_node(Point::ZERO, "a").with_modifiers(Modifiers::alt());
    let response = canvas.pointer_down(&down, &g);
    let copies = added_nodes(&response);
    assert_eq!(copies.len(), 2);
    let copy_ids: Selection = copies.iter().map(|n| n.id.clone()).collect();
    assert!(!copy_ids.contains("a") && !copy_ids.contains("b"));

    let edge = response.events.iter().find_map(|e| match e {
        CanvasEvent::AddEdge(edge) => Some(edge),
        _ => None,
    });
    let edge = edge.unwrap();
    assert!(copy_ids.contains(&edge.source) && copy_ids.contains(&edge.target));
    assert_eq!(canvas.selection(), &copy_ids);

    let up = canvas.pointer_up(&PointerEvent::on_pane(Point::new(0.0, 100.0)), &g);
    let moved = positions(&up);
    assert!(!moved.contains_key("a"));
    assert_eq!(moved.len(), 2);
    assert!(moved.values().any(|p| *p == Point::new(0.0, 100.0)));
}

#[test]
fn test_alt_mid_drag_leaves_original_behind() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    canvas.pointer_down(&PointerEvent::on_node(Point::ZERO, "c"), &g);
    canvas.pointer_move(&PointerEvent::on_pane(Point::new(50.0, 0.0)), &g);

    let response = canvas.key_down(&KeyEvent::new(Key::Alt), &g);
    assert_eq!(positions(&response)["c"], Point::new(0.0, 300.0));
    let copy = added_nodes(&response)[0].clone();
    assert_eq!(copy.position, Point::new(50.0, 300.0));

    // A second Alt press does not duplicate again.
    assert!(canvas.key_down(&KeyEvent::new(Key::Alt), &g).is_empty());

    let up = canvas.pointer_up(&PointerEvent::on_pane(Point::new(60.0, 0.0)), &g);
    assert_eq!(positions(&up)[&copy.id], Point::new(60.0, 300.0));
}

#[test]
fn test_copy_paste_at_pointer() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    canvas.set_selection(ids(&["a", "b"]));
    assert!(canvas.key_down(&command('c'), &g).prevent_default);
    assert_eq!(canvas.clipboard().len(), 2);

    canvas.pointer_move(&PointerEvent::on_pane(Point::new(500.0, 500.0)), &g);
    let response = canvas.key_down(&command('v'), &g);
    assert_eq!(response.events[0], CanvasEvent::Checkpoint);
    let nodes = added_nodes(&response);
    assert_eq!(nodes.len(), 2);
    assert!(nodes.iter().any(|n| n.position == Point::new(500.0, 500.0)));
    assert!(response.events.iter().any(|e| matches!(e, CanvasEvent::AddEdge(_))));
    assert_eq!(canvas.selection().len(), 2);
    assert!(!canvas.selection().contains("a"));
}

#[test]
fn test_cut_removes_selection() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    canvas.set_selection(ids(&["c"]));
    let response = canvas.key_down(&command('x'), &g);
    assert!(response.events.contains(&CanvasEvent::Node(NodeChange::Remove { id: "c".into() })));
    assert!(!canvas.clipboard().is_empty());
}

#[test]
fn test_history_and_select_all_shortcuts() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    assert_eq!(canvas.key_down(&command('z'), &g).events, vec![CanvasEvent::Undo]);
    let redo = KeyEvent::new(Key::Character('Z')).with_modifiers(Modifiers { shift: true, meta: true, ..Modifiers::NONE });
    assert_eq!(canvas.key_down(&redo, &g).events, vec![CanvasEvent::Redo]);
    assert_eq!(canvas.key_down(&command('y'), &g).events, vec![CanvasEvent::Redo]);

    canvas.key_down(&command('a'), &g);
    assert_eq!(canvas.selection(), &ids(&["a", "b", "c"]));
}

#[test]
fn test_wheel_zoom_and_pan() {
    let mut canvas = CanvasInteraction::default();
    let zoom = WheelEvent {
        position: Point::new(100.0, 100.0),
        delta: Vec2::new(0.0, 100.0),
        delta_mode: crate::input::DeltaMode::Pixel,
        modifiers: Modifiers::NONE,
    };
    let response = canvas.wheel(&zoom);
    assert!(response.prevent_default);
    assert!(canvas.viewport().zoom < 1.0);

    let pan = WheelEvent {
        delta: Vec2::new(0.0, 10.0),
        ..zoom
    };
    let before = canvas.viewport();
    canvas.wheel(&pan);
    assert_eq!(canvas.viewport().y, before.y - 10.0);
}

#[test]
fn test_wheel_zoom_clamped() {
    let mut canvas = CanvasInteraction::default();
    canvas.set_viewport(Viewport::new(0.0, 0.0, MAX_ZOOM));
    let pinch = WheelEvent {
        position: Point::ZERO,
        delta: Vec2::new(0.0, -50.0),
        delta_mode: crate::input::DeltaMode::Pixel,
        modifiers: Modifiers::command(),
    };
    assert!(canvas.wheel(&pinch).is_empty());
    assert_eq!(canvas.viewport().zoom, MAX_ZOOM);
}

#[test]
fn test_horizontal_wheel_is_consumed() {
    let mut canvas = CanvasInteraction::default();
    let swipe = WheelEvent {
        position: Point::new(100.0, 100.0),
        delta: Vec2::new(-30.0, 0.0),
        delta_mode: crate::input::DeltaMode::Pixel,
        modifiers: Modifiers::NONE,
    };
    let response = canvas.wheel(&swipe);
    assert!(response.prevent_default);
    assert_eq!(canvas.viewport().x, 30.0);
}

#[test]
fn test_fit_key_shows_all_nodes() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    canvas.set_container_size(Size::new(800.0, 600.0));
    canvas.set_viewport(Viewport::new(-5000.0, -5000.0, 1.0));

    let response = canvas.key_down(&KeyEvent::new(Key::Character('f')), &g);
    assert!(response.prevent_default);
    let viewport = canvas.viewport();
    assert_eq!(response.events, vec![CanvasEvent::Viewport(viewport)]);
    for node in g.nodes.values() {
        let bounds = node.bounds();
        let top_left = canvas_to_screen(Point::new(bounds.x0, bounds.y0), &viewport);
        let bottom_right = canvas_to_screen(Point::new(bounds.x1, bounds.y1), &viewport);
        assert!(top_left.x >= 0.0 && top_left.y >= 0.0);
        assert!(bottom_right.x <= 800.0 && bottom_right.y <= 600.0);
    }

    // Fitting an already fitted view changes nothing.
    assert!(canvas.key_down(&KeyEvent::new(Key::Character('f')), &g).is_empty());
}

#[test]
fn test_fit_key_ignored_in_text_input() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    let event = KeyEvent::new(Key::Character('f')).in_text_input();
    assert!(canvas.key_down(&event, &g).is_empty());
    assert_eq!(canvas.viewport(), Viewport::default());
}

#[test]
fn test_focus_once_per_nonce() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    canvas.set_container_size(Size::new(800.0, 600.0));
    let request = FocusRequest {
        node_id: "a".into(),
        nonce: 1,
    };

    let response = canvas.focus_node(&request, &g);
    assert_eq!(response.events, vec![CanvasEvent::Viewport(Viewport::new(280.0, 240.0, 1.0))]);
    assert!(canvas.focus_node(&request, &g).is_empty());
}

#[test]
fn test_focus_deferred_during_gesture() {
    let g = graph();
    let mut canvas = CanvasInteraction::default();
    let request = FocusRequest {
        node_id: "b".into(),
        nonce: 7,
    };

    canvas.pointer_down(&PointerEvent::on_pane(Point::ZERO).with_button(MouseButton::Middle), &g);
    assert!(canvas.focus_node(&request, &g).is_empty());
    canvas.pointer_up(&PointerEvent::on_pane(Point::ZERO), &g);

    assert_eq!(canvas.focus_node(&request, &g).events.len(), 1);
}
