use glam::{Quat, Vec2, Vec3};

use super::core::Camera;
use super::fly_to::{rotation_between, FlyTo};
use crate::options::CameraOptions;
use crate::util::easing::EasingFunction;

/// Quaternion orbit camera around a focus point.
///
/// The eye sits at `focus + orientation * Z * distance`. Manual input
/// (rotate, pan, zoom, reset) cancels any fly-to in progress.
#[derive(Debug, Clone)]
pub struct OrbitController {
    orientation: Quat,
    distance: f32,
    focus_point: Vec3,
    home_distance: f32,

    /// The camera this controller drives.
    pub camera: Camera,

    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
    min_distance: f32,
    max_distance: f32,
    fly_to_seconds: f32,
    fly_to_easing: EasingFunction,
    flight: Option<FlyTo>,
}

impl OrbitController {
    /// Create a controller looking at the origin from `+Z`.
    #[must_use]
    pub fn new(options: &CameraOptions, width: u32, height: u32) -> Self {
        let aspect = if width > 0 && height > 0 {
            width as f32 / height as f32
        } else {
            1.0
        };
        let camera = Camera {
            eye: Vec3::new(0.0, 0.0, options.distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        };

        let mut controller = Self {
            orientation: Quat::IDENTITY,
            distance: options.distance,
            focus_point: Vec3::ZERO,
            home_distance: options.distance,
            camera,
            rotate_speed: options.rotate_speed,
            pan_speed: options.pan_speed,
            zoom_speed: options.zoom_speed,
            min_distance: options.min_distance,
            max_distance: options.max_distance.max(options.min_distance),
            fly_to_seconds: options.fly_to_seconds,
            fly_to_easing: options.fly_to_easing,
            flight: None,
        };
        controller.update_camera_pos();
        controller
    }

    /// Apply new tuning without moving the camera.
    pub fn apply_options(&mut self, options: &CameraOptions) {
        self.camera.fovy = options.fovy;
        self.camera.znear = options.znear;
        self.camera.zfar = options.zfar;
        self.rotate_speed = options.rotate_speed;
        self.pan_speed = options.pan_speed;
        self.zoom_speed = options.zoom_speed;
        self.min_distance = options.min_distance;
        self.max_distance = options.max_distance.max(options.min_distance);
        self.fly_to_seconds = options.fly_to_seconds;
        self.fly_to_easing = options.fly_to_easing;
        self.home_distance = options.distance;
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
        self.update_camera_pos();
    }

    fn update_camera_pos(&mut self) {
        let dir = self.orientation * Vec3::Z;

        self.camera.eye = self.focus_point + (dir * self.distance);
        self.camera.target = self.focus_point;
        self.camera.up = self.orientation * Vec3::Y;
    }

    /// Update the aspect ratio. Zero-sized viewports are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.camera.aspect = width as f32 / height as f32;
    }

    /// Orbit by a pointer drag in pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        self.flight = None;

        let up = self.orientation * Vec3::Y;
        let horizontal = Quat::from_axis_angle(up, -delta.x * self.rotate_speed);
        self.orientation = horizontal * self.orientation;

        let right = self.orientation * Vec3::X;
        let vertical = Quat::from_axis_angle(right, -delta.y * self.rotate_speed);
        self.orientation = (vertical * self.orientation).normalize();

        self.update_camera_pos();
    }

    /// Slide the focus point in the view plane by a pointer drag in pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.flight = None;

        let right = self.orientation * Vec3::X;
        let up = self.orientation * Vec3::Y;
        // Scale with distance so the surface tracks the cursor.
        let scale = self.pan_speed * self.distance / self.home_distance.max(f32::EPSILON);
        self.focus_point += right * (-delta.x * scale) + up * (delta.y * scale);
        self.update_camera_pos();
    }

    /// Dolly toward (positive) or away from (negative) the focus point.
    pub fn zoom(&mut self, delta: f32) {
        self.flight = None;

        self.distance *= 1.0 - delta * self.zoom_speed;
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
        self.update_camera_pos();
    }

    /// Return to the initial view.
    pub fn reset(&mut self) {
        self.flight = None;
        self.orientation = Quat::IDENTITY;
        self.focus_point = Vec3::ZERO;
        self.distance = self.home_distance;
        self.update_camera_pos();
    }

    /// Rotate the camera about the scene origin so it looks straight down
    /// on `target`, keeping its distance from the origin.
    ///
    /// Jumps immediately unless a fly-to duration is configured.
    pub fn fly_to(&mut self, target: Vec3) {
        let Some(rotation) = rotation_between(self.camera.eye, target) else {
            self.flight = None;
            return;
        };

        if self.fly_to_seconds > 0.0 {
            self.flight = Some(FlyTo::new(
                rotation,
                self.orientation,
                self.focus_point,
                self.fly_to_seconds,
                self.fly_to_easing,
            ));
        } else {
            self.flight = None;
            self.orientation = (rotation * self.orientation).normalize();
            self.focus_point = rotation * self.focus_point;
            self.update_camera_pos();
        }
    }

    /// Advance any fly-to in progress. Returns `true` while animating.
    pub fn update(&mut self, dt: f32) -> bool {
        let Some(flight) = self.flight.as_mut() else {
            return false;
        };
        let frame = flight.advance(dt);
        self.orientation = frame.orientation;
        self.focus_point = frame.focus;
        if frame.finished {
            self.flight = None;
        }
        self.update_camera_pos();
        !frame.finished
    }

    /// Whether a fly-to is in progress.
    #[must_use]
    pub fn is_flying(&self) -> bool {
        self.flight.is_some()
    }

    /// Eye position in world space.
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        self.camera.eye
    }

    /// Distance from the eye to the focus point.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Current orbit focus.
    #[must_use]
    pub fn focus_point(&self) -> Vec3 {
        self.focus_point
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> OrbitController {
        OrbitController::new(&CameraOptions::default(), 800, 600)
    }

    #[test]
    fn starts_on_positive_z_at_configured_distance() {
        let c = controller();
        assert!((c.eye() - Vec3::new(0.0, 0.0, 3.0)).length() < 1e-6);
        assert!((c.camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn resize_sets_aspect_and_ignores_zero() {
        let mut c = controller();
        c.resize(1920, 1080);
        assert!((c.camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);
        c.resize(0, 1080);
        assert!((c.camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);
        assert!(c.camera.build_matrix().is_finite());
    }

    #[test]
    fn rotate_keeps_distance() {
        let mut c = controller();
        c.rotate(Vec2::new(120.0, -45.0));
        assert!((c.eye().length() - 3.0).abs() < 1e-4);
        assert!(c.eye().x.abs() > 0.1);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut c = controller();
        for _ in 0..200 {
            c.zoom(1.0);
        }
        assert!((c.distance() - CameraOptions::default().min_distance).abs() < 1e-5);
        for _ in 0..200 {
            c.zoom(-1.0);
        }
        assert!((c.distance() - CameraOptions::default().max_distance).abs() < 1e-3);
    }

    #[test]
    fn reset_returns_home() {
        let mut c = controller();
        c.rotate(Vec2::new(50.0, 20.0));
        c.pan(Vec2::new(10.0, 10.0));
        c.zoom(2.0);
        c.reset();
        assert!((c.eye() - Vec3::new(0.0, 0.0, 3.0)).length() < 1e-6);
    }

    #[test]
    fn fly_to_jumps_onto_target_direction() {
        let mut c = controller();
        let target = Vec3::new(1.0, 0.0, 0.0);
        c.fly_to(target);
        assert!(!c.is_flying());
        assert!((c.eye() - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-4);
        assert!(c.camera.target.length() < 1e-6);
    }

    #[test]
    fn animated_fly_to_reaches_same_point() {
        let options = CameraOptions {
            fly_to_seconds: 0.5,
            ..CameraOptions::default()
        };
        let mut c = OrbitController::new(&options, 800, 600);
        let target = Vec3::new(0.0, 1.0, 1.0);
        c.fly_to(target);
        assert!(c.is_flying());
        assert!(c.update(0.1));
        while c.update(0.1) {}
        assert!(!c.is_flying());

        let expected = target.normalize() * 3.0;
        assert!((c.eye() - expected).length() < 1e-4);
    }

    #[test]
    fn fly_to_follows_configured_easing() {
        let options = CameraOptions {
            fly_to_seconds: 1.0,
            fly_to_easing: EasingFunction::Linear,
            ..CameraOptions::default()
        };
        let mut c = OrbitController::new(&options, 800, 600);
        c.fly_to(Vec3::X);
        assert!(c.update(0.25));
        // A quarter of the way through a quarter turn.
        let angle = std::f32::consts::FRAC_PI_8;
        let expected = Vec3::new(angle.sin(), 0.0, angle.cos()) * 3.0;
        assert!((c.eye() - expected).length() < 1e-4, "{}", c.eye());
    }

    #[test]
    fn manual_input_cancels_flight() {
        let options = CameraOptions {
            fly_to_seconds: 1.0,
            ..CameraOptions::default()
        };
        let mut c = OrbitController::new(&options, 800, 600);
        c.fly_to(Vec3::X);
        c.zoom(0.5);
        assert!(!c.is_flying());
    }
}
