//! Keyboard shortcut registry and documentation.

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    /// Ctrl on Windows/Linux, Cmd on macOS.
    pub command: bool,
    pub shift: bool,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: &'static str, command: bool, shift: bool, description: &'static str) -> Self {
        Self {
            key,
            command,
            shift,
            description,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl/Cmd+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.command {
            parts.push("Ctrl/Cmd");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }
}

/// Every shortcut and gesture the canvas understands.
pub fn all() -> Vec<Shortcut> {
    vec![
        Shortcut::new("A", true, false, "Select all nodes"),
        Shortcut::new("C", true, false, "Copy nodes"),
        Shortcut::new("X", true, false, "Cut nodes"),
        Shortcut::new("V", true, false, "Paste nodes at the pointer"),
        Shortcut::new("Z", true, false, "Undo"),
        Shortcut::new("Z", true, true, "Redo"),
        Shortcut::new("Y", true, false, "Redo"),
        Shortcut::new("Delete", false, false, "Delete selected nodes and edges"),
        Shortcut::new("Backspace", false, false, "Delete selected nodes and edges"),
        Shortcut::new("Escape", false, false, "Cancel the current gesture"),
        Shortcut::new("F", false, false, "Fit all nodes in view"),
        Shortcut::new("Space+Drag", false, false, "Pan the canvas"),
        Shortcut::new("Alt+Drag", false, false, "Duplicate while dragging"),
        Shortcut::new("Alt+Drag handle", false, false, "Remove a connection"),
        Shortcut::new("Shift+Click", false, false, "Toggle selection"),
        Shortcut::new("Double-click", false, false, "Create a note"),
    ]
}

/// Print all shortcuts to stdout.
pub fn print_all() {
    println!("\n=== Keyboard Shortcuts ===");
    for shortcut in all() {
        println!("  {:20} {}", shortcut.format(), shortcut.description);
    }
    println!();
}
