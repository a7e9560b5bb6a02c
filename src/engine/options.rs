//! Demo switching and runtime options for [`DemoEngine`].

use super::{mesh_for, DemoEngine};
use crate::demo::DemoKind;
use crate::options::Options;

impl DemoEngine {
    /// Switch to another demo, swapping the mesh and resetting the view.
    pub fn set_demo(&mut self, demo: DemoKind) {
        if demo == self.stage.demo() {
            return;
        }
        let previous_mesh = self.stage.demo().mesh();
        self.stage.set_demo(demo);
        if demo.mesh() != previous_mesh {
            let mesh = mesh_for(demo, &self.options.display);
            self.mesh_renderer.set_mesh(&self.context.device, &mesh);
        }
        self.sync_gpu();
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Replace options and push them to every subsystem.
    ///
    /// Geometry is rebuilt when tessellation or sizes change. The texture
    /// is not reloaded; use [`set_texture`](Self::set_texture).
    pub fn set_options(&mut self, new: Options) {
        let geometry_changed = new.display.globe_radius != self.options.display.globe_radius
            || new.display.sphere_width_segments
                != self.options.display.sphere_width_segments
            || new.display.sphere_height_segments
                != self.options.display.sphere_height_segments
            || new.display.cube_size != self.options.display.cube_size;

        self.options = new;
        self.apply_options(geometry_changed);
    }

    fn apply_options(&mut self, geometry_changed: bool) {
        self.lighting
            .set_options(&self.context.queue, &self.options.lighting);
        self.stage.apply_options(&self.options);
        self.input
            .set_key_bindings(self.options.keybindings.clone());

        if geometry_changed {
            let mesh = mesh_for(self.stage.demo(), &self.options.display);
            self.mesh_renderer.set_mesh(&self.context.device, &mesh);
        }
        self.sync_gpu();
    }
}
