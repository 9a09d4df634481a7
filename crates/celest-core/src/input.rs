//! Pointer, wheel and keyboard events delivered by the rendering layer.

use crate::connection::HandleRef;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::NONE
        }
    }

    pub fn command() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn is_command(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Modifier that turns a node drag into a duplicate-drag.
    pub fn is_duplicate(&self) -> bool {
        self.alt
    }
}

/// The element a pointer event landed on.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerTarget {
    /// Empty canvas.
    Pane,
    Node(String),
    Edge(String),
    Handle(HandleRef),
}

/// A pointer down/move/up event. `position` is in screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub position: Point,
    pub button: MouseButton,
    pub modifiers: Modifiers,
    pub target: PointerTarget,
}

impl PointerEvent {
    pub fn new(position: Point, target: PointerTarget) -> Self {
        Self {
            position,
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
            target,
        }
    }

    pub fn on_pane(position: Point) -> Self {
        Self::new(position, PointerTarget::Pane)
    }

    pub fn on_node(position: Point, id: &str) -> Self {
        Self::new(position, PointerTarget::Node(id.to_string()))
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Unit of a wheel delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

/// Wheel or trackpad scroll/pinch event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    pub position: Point,
    pub delta: Vec2,
    pub delta_mode: DeltaMode,
    /// Pinch gestures arrive with ctrl set.
    pub modifiers: Modifiers,
}

/// Keys the canvas reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Space,
    Alt,
    Character(char),
    Other(String),
}

/// Where keyboard focus currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusContext {
    #[default]
    Canvas,
    /// Input, textarea, content-editable or code editor.
    TextInput,
}

/// A key press or release.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
    pub focus: FocusContext,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
            focus: FocusContext::Canvas,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn in_text_input(mut self) -> Self {
        self.focus = FocusContext::TextInput;
        self
    }

    /// Lower-cased character, if this is a character key.
    pub fn character(&self) -> Option<char> {
        match self.key {
            Key::Character(c) => Some(c.to_ascii_lowercase()),
            _ => None,
        }
    }
}
