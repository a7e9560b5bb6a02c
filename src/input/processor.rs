//! Converts raw platform events into engine commands.
//!
//! The `InputProcessor` owns all transient input state (cursor tracking,
//! drag detection, held buttons, modifier keys) and the key-binding map.
//! It is the only thing that sits between raw window events and the
//! engine's [`execute`](crate::DemoEngine::execute) method.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::event::{InputEvent, MouseButton};
use super::mouse::{ClickResult, InputState};
use crate::demo::DemoKind;
use crate::engine::command::Command;

/// Maps physical key strings to [`Command`] variants.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format, which is
/// also the DOM `KeyboardEvent.code` format: `"KeyR"`, `"Escape"`,
/// `"Digit1"`, etc.
///
/// Only *discrete* commands make sense as key bindings; parameterized
/// commands like `RotateCamera` come from mouse gestures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeyBindings {
    /// Forward map: key string → command tag.
    bindings: HashMap<String, KeyCommandTag>,
}

/// Serializable tag for the subset of [`Command`] that can be key-bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommandTag {
    /// Return the camera to its starting view.
    ResetCamera,
    /// Deselect every label.
    ClearSelection,
    /// Pause or resume the cube spin.
    ToggleSpin,
    /// Switch to the cube demo.
    ShowCube,
    /// Switch to the globe demo.
    ShowGlobe,
    /// Switch to the capitals demo.
    ShowCapitals,
}

impl KeyCommandTag {
    /// Convert to the corresponding parameterless [`Command`].
    fn to_command(self) -> Command {
        match self {
            Self::ResetCamera => Command::ResetCamera,
            Self::ClearSelection => Command::ClearSelection,
            Self::ToggleSpin => Command::ToggleSpin,
            Self::ShowCube => Command::ShowDemo(DemoKind::Cube),
            Self::ShowGlobe => Command::ShowDemo(DemoKind::Globe),
            Self::ShowCapitals => Command::ShowDemo(DemoKind::Capitals),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = HashMap::from([
            ("KeyR".into(), KeyCommandTag::ResetCamera),
            ("Escape".into(), KeyCommandTag::ClearSelection),
            ("Space".into(), KeyCommandTag::ToggleSpin),
            ("Digit1".into(), KeyCommandTag::ShowCube),
            ("Digit2".into(), KeyCommandTag::ShowGlobe),
            ("Digit3".into(), KeyCommandTag::ShowCapitals),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Look up the command for a physical key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<Command> {
        self.bindings.get(key).map(|tag| tag.to_command())
    }

    /// Bind `key` to `tag`, replacing any previous binding for that key.
    pub fn bind(&mut self, key: impl Into<String>, tag: KeyCommandTag) {
        let _ = self.bindings.insert(key.into(), tag);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// InputProcessor
// ─────────────────────────────────────────────────────────────────────────────

/// Converts raw window events into [`Command`]s.
///
/// Left drag orbits, right or middle drag (or shift + left drag) pans, the
/// wheel zooms and a left press and release without a drag is a click.
///
/// # Usage
///
/// ```ignore
/// if let Some(cmd) = input_processor.handle_event(event) {
///     engine.execute(cmd);
/// }
///
/// if let Some(cmd) = input_processor.handle_key_press("KeyR") {
///     engine.execute(cmd);
/// }
/// ```
pub struct InputProcessor {
    /// Cursor tracking and click/drag detection.
    state: InputState,
    /// Button currently driving a drag gesture.
    held_button: Option<MouseButton>,
    /// Whether the shift modifier is currently held.
    shift_pressed: bool,
    /// Key string → command mapping.
    key_bindings: KeyBindings,
}

impl InputProcessor {
    /// Create a new processor with default key bindings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: InputState::new(),
            held_button: None,
            shift_pressed: false,
            key_bindings: KeyBindings::default(),
        }
    }

    /// Create a processor with custom key bindings.
    #[must_use]
    pub fn with_key_bindings(key_bindings: KeyBindings) -> Self {
        Self {
            key_bindings,
            ..Self::new()
        }
    }

    /// Current cursor position in physical pixels.
    #[must_use]
    pub fn mouse_pos(&self) -> (f32, f32) {
        (self.state.mouse_pos.x, self.state.mouse_pos.y)
    }

    /// Whether any mouse button is held.
    #[must_use]
    pub fn mouse_pressed(&self) -> bool {
        self.held_button.is_some()
    }

    /// Whether the shift modifier is held.
    #[must_use]
    pub fn shift_pressed(&self) -> bool {
        self.shift_pressed
    }

    /// Replace the key bindings.
    pub fn set_key_bindings(&mut self, key_bindings: KeyBindings) {
        self.key_bindings = key_bindings;
    }

    /// Look up a key press and return the corresponding command, if bound.
    #[must_use]
    pub fn handle_key_press(&self, key: &str) -> Option<Command> {
        self.key_bindings.lookup(key)
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<Command> {
        match event {
            InputEvent::CursorMoved { x, y } => self.handle_cursor_moved(x, y),
            InputEvent::MouseButton { button, pressed } => {
                self.handle_mouse_button(button, pressed)
            }
            InputEvent::Scroll { delta } => Some(Command::Zoom { delta }),
            InputEvent::ModifiersChanged { shift } => {
                self.shift_pressed = shift;
                None
            }
        }
    }

    /// Cursor moved: compute delta, possibly produce a camera command.
    fn handle_cursor_moved(&mut self, x: f32, y: f32) -> Option<Command> {
        let delta = self.state.handle_mouse_position(x, y);
        let button = self.held_button?;
        if delta == glam::Vec2::ZERO {
            return None;
        }

        let pan = button != MouseButton::Left || self.shift_pressed;
        if pan {
            Some(Command::PanCamera { delta })
        } else {
            Some(Command::RotateCamera { delta })
        }
    }

    /// Mouse button press/release: track the gesture and produce a click
    /// on a left release that never became a drag.
    fn handle_mouse_button(
        &mut self,
        button: MouseButton,
        pressed: bool,
    ) -> Option<Command> {
        if pressed {
            if self.held_button.is_none() {
                self.held_button = Some(button);
                self.state.handle_mouse_down();
            }
            return None;
        }

        if self.held_button != Some(button) {
            return None;
        }
        self.held_button = None;
        match self.state.process_mouse_up() {
            ClickResult::Click { position } if button == MouseButton::Left => {
                Some(Command::Click { position })
            }
            _ => None,
        }
    }
}

impl Default for InputProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    fn press(button: MouseButton) -> InputEvent {
        InputEvent::MouseButton {
            button,
            pressed: true,
        }
    }

    fn release(button: MouseButton) -> InputEvent {
        InputEvent::MouseButton {
            button,
            pressed: false,
        }
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::CursorMoved { x, y }
    }

    #[test]
    fn left_drag_rotates_and_suppresses_click() {
        let mut input = InputProcessor::new();
        let _ = input.handle_event(moved(100.0, 100.0));
        assert_eq!(input.handle_event(press(MouseButton::Left)), None);
        assert_eq!(
            input.handle_event(moved(120.0, 95.0)),
            Some(Command::RotateCamera {
                delta: Vec2::new(20.0, -5.0)
            })
        );
        assert_eq!(input.handle_event(release(MouseButton::Left)), None);
        assert!(!input.mouse_pressed());
    }

    #[test]
    fn left_click_without_drag_clicks() {
        let mut input = InputProcessor::new();
        let _ = input.handle_event(moved(40.0, 60.0));
        let _ = input.handle_event(press(MouseButton::Left));
        assert_eq!(
            input.handle_event(release(MouseButton::Left)),
            Some(Command::Click {
                position: Vec2::new(40.0, 60.0)
            })
        );
    }

    #[test]
    fn right_drag_and_shift_drag_pan() {
        let mut input = InputProcessor::new();
        let _ = input.handle_event(press(MouseButton::Right));
        assert!(matches!(
            input.handle_event(moved(5.0, 0.0)),
            Some(Command::PanCamera { .. })
        ));
        assert_eq!(input.handle_event(release(MouseButton::Right)), None);

        let _ = input.handle_event(InputEvent::ModifiersChanged { shift: true });
        let _ = input.handle_event(press(MouseButton::Left));
        assert!(matches!(
            input.handle_event(moved(9.0, 3.0)),
            Some(Command::PanCamera { .. })
        ));
    }

    #[test]
    fn hover_without_press_is_silent() {
        let mut input = InputProcessor::new();
        assert_eq!(input.handle_event(moved(10.0, 10.0)), None);
    }

    #[test]
    fn scroll_zooms() {
        let mut input = InputProcessor::new();
        assert_eq!(
            input.handle_event(InputEvent::Scroll { delta: 1.5 }),
            Some(Command::Zoom { delta: 1.5 })
        );
    }

    #[test]
    fn default_key_bindings() {
        let input = InputProcessor::new();
        assert_eq!(input.handle_key_press("KeyR"), Some(Command::ResetCamera));
        assert_eq!(input.handle_key_press("Space"), Some(Command::ToggleSpin));
        assert_eq!(
            input.handle_key_press("Digit2"),
            Some(Command::ShowDemo(DemoKind::Globe))
        );
        assert_eq!(input.handle_key_press("KeyZ"), None);
    }

    #[test]
    fn rebinding_replaces_key() {
        let mut bindings = KeyBindings::default();
        bindings.bind("KeyH", KeyCommandTag::ResetCamera);
        let input = InputProcessor::with_key_bindings(bindings);
        assert_eq!(input.handle_key_press("KeyH"), Some(Command::ResetCamera));
    }

    #[test]
    fn bindings_round_trip_through_toml() {
        let bindings = KeyBindings::default();
        let text = toml::to_string(&bindings).unwrap();
        let parsed: KeyBindings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, bindings);
    }
}
