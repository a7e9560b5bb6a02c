//! The engine's complete interactive vocabulary.
//!
//! Every user-facing operation, whether triggered by a key press, a mouse
//! gesture, a DOM label click or a programmatic call, is represented as a
//! [`Command`]. Consumers construct commands and pass them to
//! [`DemoEngine::execute`](super::DemoEngine::execute).

use glam::Vec2;

use crate::demo::DemoKind;

/// A single user-facing engine operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    // ── Camera ──────────────────────────────────────────────────────
    /// Return the camera to its starting view.
    ResetCamera,

    /// Rotate the camera by `delta` pixels of mouse movement.
    RotateCamera {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Pan the camera by `delta` pixels of mouse movement.
    PanCamera {
        /// Horizontal and vertical drag delta.
        delta: Vec2,
    },

    /// Zoom the camera (positive = zoom in, negative = zoom out).
    Zoom {
        /// Scroll amount.
        delta: f32,
    },

    // ── Labels ──────────────────────────────────────────────────────
    /// Click at a pixel position: pick the nearest label and fly to it.
    Click {
        /// Cursor position in physical pixels.
        position: Vec2,
    },

    /// Fly to label `index` and make it the only selected label.
    SelectLabel {
        /// Label index in catalog order.
        index: usize,
    },

    /// Deselect every label.
    ClearSelection,

    // ── Scene ───────────────────────────────────────────────────────
    /// Switch to another demo.
    ShowDemo(DemoKind),

    /// Pause or resume the cube spin.
    ToggleSpin,
}
