use glam::Vec2;

/// Squared pixel distance past which a press becomes a drag.
const DRAG_THRESHOLD_SQ: f32 = 9.0;

/// Result of releasing a mouse button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickResult {
    /// The press turned into a drag; nothing to select.
    NoAction,
    /// Press and release without moving: a click at this position.
    Click {
        /// Cursor position at release.
        position: Vec2,
    },
}

/// Tracks cursor position and tells clicks apart from drags.
#[derive(Debug, Clone)]
pub struct InputState {
    /// Last cursor position in physical pixels.
    pub mouse_pos: Vec2,
    press_pos: Option<Vec2>,
    is_dragging: bool,
}

impl InputState {
    /// State with the cursor at the origin and no button held.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mouse_pos: Vec2::ZERO,
            press_pos: None,
            is_dragging: false,
        }
    }

    /// Move the cursor and return the delta since the last position.
    ///
    /// Marks the current press as a drag once it strays far enough.
    pub fn handle_mouse_position(&mut self, x: f32, y: f32) -> Vec2 {
        let pos = Vec2::new(x, y);
        let delta = pos - self.mouse_pos;
        self.mouse_pos = pos;
        if let Some(start) = self.press_pos {
            if pos.distance_squared(start) > DRAG_THRESHOLD_SQ {
                self.is_dragging = true;
            }
        }
        delta
    }

    /// Record a press at the current cursor position.
    pub fn handle_mouse_down(&mut self) {
        self.press_pos = Some(self.mouse_pos);
        self.is_dragging = false;
    }

    /// Whether a button is held.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.press_pos.is_some()
    }

    /// Whether the held press has become a drag.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    /// Process a release and report whether it was a click.
    pub fn process_mouse_up(&mut self) -> ClickResult {
        let was_pressed = self.press_pos.take().is_some();
        let was_dragging = std::mem::replace(&mut self.is_dragging, false);
        if !was_pressed || was_dragging {
            return ClickResult::NoAction;
        }
        ClickResult::Click {
            position: self.mouse_pos,
        }
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
