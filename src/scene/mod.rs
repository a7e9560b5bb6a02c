//! Platform-independent application state for one running demo.
//!
//! [`Stage`] owns the orbit camera, the mesh transform, the frame clock and
//! the capital labels. It never touches the GPU, so everything a frame does
//! to the scene can be exercised directly in tests.

pub mod mesh;

use glam::{EulerRot, Mat4, Vec2, Vec3};

use crate::camera::{Camera, OrbitController};
use crate::demo::{DemoKind, MeshKind};
use crate::error::OrbisError;
use crate::geo::CityCatalog;
use crate::labels::occlusion::{NoOcclusion, SphereOccluder};
use crate::labels::{Label, LabelSet};
use crate::options::Options;
use crate::util::clock::Clock;

/// Scene state for the active demo.
pub struct Stage {
    demo: DemoKind,
    controller: OrbitController,
    /// Mesh Euler rotation (XYZ, radians).
    rotation: Vec3,
    spin_speed: f32,
    spin_paused: bool,
    globe_radius: f32,
    pick_radius_px: f32,
    catalog: CityCatalog,
    labels: LabelSet,
    viewport: (u32, u32),
    clock: Clock,
}

impl Stage {
    /// Stage for `demo` with the embedded capital list.
    ///
    /// # Errors
    ///
    /// Fails only if the embedded city catalog is malformed.
    pub fn new(
        demo: DemoKind,
        options: &Options,
        width: u32,
        height: u32,
    ) -> Result<Self, OrbisError> {
        Ok(Self::with_catalog(
            demo,
            options,
            CityCatalog::capitals()?,
            width,
            height,
        ))
    }

    /// Stage for `demo` labelling the cities of `catalog`.
    #[must_use]
    pub fn with_catalog(
        demo: DemoKind,
        options: &Options,
        catalog: CityCatalog,
        width: u32,
        height: u32,
    ) -> Self {
        let mut stage = Self {
            demo,
            controller: OrbitController::new(&options.camera, width, height),
            rotation: Vec3::ZERO,
            spin_speed: options.display.spin_speed,
            spin_paused: false,
            globe_radius: options.display.globe_radius,
            pick_radius_px: options.labels.pick_radius_px,
            catalog,
            labels: LabelSet::default(),
            viewport: (width, height),
            clock: Clock::new(),
        };
        stage.rebuild_labels();
        stage
    }

    fn rebuild_labels(&mut self) {
        self.labels = if self.demo.has_labels() {
            LabelSet::from_cities(self.catalog.cities(), self.globe_radius)
        } else {
            LabelSet::default()
        };
        self.refresh_labels();
    }

    /// Switch to another demo, resetting the camera and mesh.
    pub fn set_demo(&mut self, demo: DemoKind) {
        log::info!("switching to {demo} demo");
        self.demo = demo;
        self.rotation = Vec3::ZERO;
        self.spin_paused = false;
        self.controller.reset();
        self.rebuild_labels();
    }

    /// Apply new options without resetting the view.
    pub fn apply_options(&mut self, options: &Options) {
        self.controller.apply_options(&options.camera);
        self.spin_speed = options.display.spin_speed;
        self.pick_radius_px = options.labels.pick_radius_px;
        if (options.display.globe_radius - self.globe_radius).abs() > f32::EPSILON {
            self.globe_radius = options.display.globe_radius;
            let selected = self.labels.selected();
            self.rebuild_labels();
            if let Some(index) = selected {
                let _ = self.labels.select(index);
            }
        } else {
            self.refresh_labels();
        }
    }

    /// Start measuring frame time from now, dropping setup time.
    pub fn restart_clock(&mut self) {
        self.clock.restart();
    }

    /// Advance by the wall-clock time since the previous tick.
    pub fn tick(&mut self) -> f32 {
        let dt = self.clock.delta();
        self.update(dt);
        dt
    }

    /// Advance the scene by `dt` seconds.
    ///
    /// A zero `dt` leaves the mesh rotation untouched.
    pub fn update(&mut self, dt: f32) {
        if self.demo.spins() && !self.spin_paused {
            self.rotation.y += dt * self.spin_speed;
        }
        let _ = self.controller.update(dt);
        self.refresh_labels();
    }

    /// Recompute label visibility and screen positions for the current
    /// camera and mesh transform.
    pub fn refresh_labels(&mut self) {
        if self.labels.is_empty() {
            return;
        }
        let model = self.model_matrix();
        let camera = &self.controller.camera;
        if self.demo.mesh() == MeshKind::Sphere {
            let globe = SphereOccluder::from_model(model, self.globe_radius);
            self.labels.update(model, camera, self.viewport, &globe);
        } else {
            self.labels.update(model, camera, self.viewport, &NoOcclusion);
        }
    }

    /// Track a new drawable size.
    ///
    /// The camera aspect only changes for non-zero sizes.
    pub fn resize(&mut self, width: u32, height: u32) {
        log::debug!("stage resize to {width}x{height}");
        self.viewport = (width, height);
        self.controller.resize(width, height);
        self.refresh_labels();
    }

    /// Select the label nearest a click at pixel `(x, y)` and fly to it.
    ///
    /// Returns the picked index, `None` when nothing is close enough.
    pub fn click(&mut self, x: f32, y: f32) -> Option<usize> {
        let index = self.labels.pick(Vec2::new(x, y), self.pick_radius_px)?;
        let _ = self.select_label(index);
        Some(index)
    }

    /// Fly to label `index` and make it the only selected label.
    pub fn select_label(&mut self, index: usize) -> Option<&Label> {
        let target = self.labels.select(index)?.world;
        if let Some(label) = self.labels.get(index) {
            log::info!("selected {}", label.name);
        }
        self.controller.fly_to(target);
        self.refresh_labels();
        self.labels.get(index)
    }

    /// Deselect every label.
    pub fn clear_selection(&mut self) {
        self.labels.clear_selection();
    }

    /// Pause or resume the cube spin. Returns the new paused state.
    pub fn toggle_spin(&mut self) -> bool {
        self.spin_paused = !self.spin_paused;
        self.spin_paused
    }

    /// Return the camera to its starting view.
    pub fn reset_camera(&mut self) {
        self.controller.reset();
        self.refresh_labels();
    }

    /// Mesh model matrix from the current rotation.
    #[must_use]
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    /// Active demo.
    #[must_use]
    pub fn demo(&self) -> DemoKind {
        self.demo
    }

    /// Mesh Euler rotation in radians.
    #[must_use]
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Whether the cube spin is paused.
    #[must_use]
    pub fn spin_paused(&self) -> bool {
        self.spin_paused
    }

    /// Current camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.controller.camera
    }

    /// Orbit controller.
    #[must_use]
    pub fn controller(&self) -> &OrbitController {
        &self.controller
    }

    /// Mutable orbit controller for input handling.
    pub fn controller_mut(&mut self) -> &mut OrbitController {
        &mut self.controller
    }

    /// Labels of the active demo; empty unless it shows capitals.
    #[must_use]
    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    /// Drawable size in physical pixels.
    #[must_use]
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Globe radius in world units.
    #[must_use]
    pub fn globe_radius(&self) -> f32 {
        self.globe_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::City;

    fn catalog() -> CityCatalog {
        CityCatalog::from_json(
            r#"[
                {"name": "Front", "latitude": 0.0, "longitude": -90.0},
                {"name": "Back", "latitude": 0.0, "longitude": 90.0},
                {"name": "East", "latitude": 10.0, "longitude": -60.0}
            ]"#,
        )
        .unwrap()
    }

    fn stage(demo: DemoKind) -> Stage {
        Stage::with_catalog(demo, &Options::default(), catalog(), 800, 600)
    }

    #[test]
    fn embedded_catalog_builds_capitals_stage() {
        let stage = Stage::new(DemoKind::Capitals, &Options::default(), 640, 480).unwrap();
        assert!(stage.labels().len() >= 40);
        assert!(Stage::new(DemoKind::Cube, &Options::default(), 640, 480)
            .unwrap()
            .labels()
            .is_empty());
    }

    #[test]
    fn resize_sets_aspect_and_viewport() {
        let mut stage = stage(DemoKind::Globe);
        stage.resize(1280, 720);
        assert_eq!(stage.viewport(), (1280, 720));
        assert!((stage.camera().aspect - 1280.0 / 720.0).abs() < 1e-6);
    }

    #[test]
    fn zero_size_keeps_previous_aspect() {
        let mut stage = stage(DemoKind::Globe);
        stage.resize(0, 0);
        assert_eq!(stage.viewport(), (0, 0));
        assert!((stage.camera().aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn zero_dt_leaves_rotation_unchanged() {
        let mut stage = stage(DemoKind::Cube);
        stage.update(0.5);
        let before = stage.rotation();
        for _ in 0..10 {
            stage.update(0.0);
        }
        assert_eq!(stage.rotation(), before);
    }

    #[test]
    fn cube_spins_one_radian_per_second() {
        let mut stage = stage(DemoKind::Cube);
        stage.update(0.25);
        stage.update(0.75);
        assert!((stage.rotation().y - 1.0).abs() < 1e-6);
        assert!(stage.toggle_spin());
        stage.update(1.0);
        assert!((stage.rotation().y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn tick_spins_by_measured_time() {
        let mut stage = stage(DemoKind::Cube);
        stage.restart_clock();
        std::thread::sleep(std::time::Duration::from_millis(20));
        let first = stage.tick();
        let second = stage.tick();
        assert!(first >= 0.02);
        assert!(second >= 0.0);
        assert!((stage.rotation().y - (first + second)).abs() < 1e-5);
    }

    #[test]
    fn globe_does_not_spin() {
        let mut stage = stage(DemoKind::Globe);
        stage.update(2.0);
        assert_eq!(stage.rotation(), Vec3::ZERO);
    }

    #[test]
    fn facing_label_visible_far_label_hidden() {
        let stage = stage(DemoKind::Capitals);
        let labels = stage.labels();
        assert!(labels.get(0).unwrap().visible);
        assert!(!labels.get(1).unwrap().visible);
    }

    #[test]
    fn every_click_leaves_exactly_one_selected() {
        let mut stage = stage(DemoKind::Capitals);
        for index in [2, 0, 1, 0] {
            let _ = stage.select_label(index);
            let selected = stage.labels().labels().iter().filter(|l| l.selected).count();
            assert_eq!(selected, 1);
            assert_eq!(stage.labels().selected(), Some(index));
        }
    }

    #[test]
    fn selecting_flies_camera_over_label() {
        let mut stage = stage(DemoKind::Capitals);
        let target = City::new("Back", 0.0, 90.0).position(1.0);
        let _ = stage.select_label(1).unwrap();
        let eye = stage.controller().eye();
        assert!((eye.length() - 3.0).abs() < 1e-4);
        assert!((eye.normalize() - target.normalize()).length() < 1e-4);
        // Now facing the camera.
        assert!(stage.labels().get(1).unwrap().visible);
        assert!(!stage.labels().get(0).unwrap().visible);
    }

    #[test]
    fn click_picks_projected_label() {
        let mut stage = stage(DemoKind::Capitals);
        let p = stage.labels().get(2).unwrap().screen.unwrap();
        assert_eq!(stage.click(p.x + 2.0, p.y - 1.0), Some(2));
        assert_eq!(stage.labels().selected(), Some(2));
        assert_eq!(stage.click(1.0, 1.0), None);
        assert_eq!(stage.labels().selected(), Some(2));
    }

    #[test]
    fn set_demo_resets_view() {
        let mut stage = stage(DemoKind::Capitals);
        let _ = stage.select_label(1);
        stage.set_demo(DemoKind::Cube);
        assert!(stage.labels().is_empty());
        assert!((stage.controller().eye() - Vec3::new(0.0, 0.0, 3.0)).length() < 1e-6);
        stage.set_demo(DemoKind::Capitals);
        assert_eq!(stage.labels().len(), 3);
        assert_eq!(stage.labels().selected(), None);
    }
}
