use glam::{Mat4, Vec2, Vec3, Vec4};

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub eye: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// Up direction vector.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the view-projection matrix and camera metadata.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    /// Viewport aspect ratio.
    pub aspect: f32,
}

impl Camera {
    /// View matrix (world to camera space).
    #[must_use]
    pub fn build_view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Projection matrix.
    #[must_use]
    pub fn build_projection(&self) -> Mat4 {
        // perspective_rh already uses [0,1] depth range (wgpu convention)
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        self.build_projection() * self.build_view()
    }

    /// Project a world-space point to pixel coordinates (origin top-left).
    ///
    /// Returns `None` for points at or behind the eye plane.
    #[must_use]
    pub fn project_to_screen(
        &self,
        point: Vec3,
        width: f32,
        height: f32,
    ) -> Option<Vec2> {
        let clip = self.build_matrix() * Vec4::from((point, 1.0));
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * width,
            (1.0 - ndc.y) * 0.5 * height,
        ))
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity view-projection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            aspect: 1.0,
        }
    }

    /// Update uniform fields from the given camera's current state.
    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_proj = camera.build_matrix().to_cols_array_2d();
        self.position = camera.eye.to_array();
        self.aspect = camera.aspect;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera {
            eye: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 2.0,
            fovy: 60.0,
            znear: 0.1,
            zfar: 100.0,
        }
    }

    #[test]
    fn target_projects_to_viewport_centre() {
        let p = camera().project_to_screen(Vec3::ZERO, 800.0, 400.0).unwrap();
        assert!((p - Vec2::new(400.0, 200.0)).length() < 1e-3);
    }

    #[test]
    fn points_behind_the_eye_do_not_project() {
        let behind = Vec3::new(0.0, 0.0, 5.0);
        assert!(camera().project_to_screen(behind, 800.0, 400.0).is_none());
    }

    #[test]
    fn screen_y_grows_downward() {
        let cam = camera();
        let above = cam
            .project_to_screen(Vec3::new(0.0, 0.5, 0.0), 800.0, 400.0)
            .unwrap();
        assert!(above.y < 200.0);
    }

    #[test]
    fn uniform_tracks_camera() {
        let cam = camera();
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&cam);
        assert_eq!(uniform.position, [0.0, 0.0, 3.0]);
        assert_eq!(uniform.aspect, 2.0);
    }
}
