//! Input and command dispatch for [`DemoEngine`].

use super::command::Command;
use super::DemoEngine;
use crate::input::InputEvent;

impl DemoEngine {
    /// Process a platform-agnostic input event.
    ///
    /// This is the primary input entry point. Hosts forward raw window or
    /// DOM events as [`InputEvent`] variants; the engine turns them into
    /// camera moves and label clicks.
    ///
    /// Returns the command that was executed, if any.
    ///
    /// # Example
    ///
    /// ```ignore
    /// engine.handle_input(InputEvent::CursorMoved { x, y });
    /// engine.handle_input(InputEvent::Scroll { delta: 1.0 });
    /// ```
    pub fn handle_input(&mut self, event: InputEvent) -> Option<Command> {
        let command = self.input.handle_event(event)?;
        self.execute(command);
        Some(command)
    }

    /// Look up a key (winit `KeyCode` debug name or DOM `KeyboardEvent.code`)
    /// and execute its binding. Returns whether the key was bound.
    pub fn handle_key_press(&mut self, key: &str) -> bool {
        let Some(command) = self.input.handle_key_press(key) else {
            return false;
        };
        log::debug!("key {key} -> {command:?}");
        self.execute(command);
        true
    }

    /// Execute a single command.
    pub fn execute(&mut self, command: Command) {
        match command {
            Command::ResetCamera => self.stage.reset_camera(),
            Command::RotateCamera { delta } => {
                self.stage.controller_mut().rotate(delta);
                self.stage.refresh_labels();
            }
            Command::PanCamera { delta } => {
                self.stage.controller_mut().pan(delta);
                self.stage.refresh_labels();
            }
            Command::Zoom { delta } => {
                self.stage.controller_mut().zoom(delta);
                self.stage.refresh_labels();
            }
            Command::Click { position } => {
                if self.stage.click(position.x, position.y).is_none() {
                    log::debug!("click at {position} hit no label");
                }
            }
            Command::SelectLabel { index } => {
                if self.stage.select_label(index).is_none() {
                    log::warn!("no label with index {index}");
                }
            }
            Command::ClearSelection => self.stage.clear_selection(),
            Command::ShowDemo(demo) => self.set_demo(demo),
            Command::ToggleSpin => {
                let paused = self.stage.toggle_spin();
                log::info!("spin {}", if paused { "paused" } else { "resumed" });
            }
        }
        self.sync_gpu();
    }
}
