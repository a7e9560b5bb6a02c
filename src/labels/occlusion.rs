//! Line-of-sight tests against the globe.

use glam::{Mat4, Vec3};

/// Ray with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin in world space.
    pub origin: Vec3,
    /// Unit direction.
    pub dir: Vec3,
}

impl Ray {
    /// Ray from `origin` toward `target`. `None` when the points coincide.
    #[must_use]
    pub fn toward(origin: Vec3, target: Vec3) -> Option<Self> {
        let dir = (target - origin).try_normalize()?;
        Some(Self { origin, dir })
    }
}

/// Nearest positive intersection of a ray with a sphere.
///
/// Falls back to the far root when the origin is inside the sphere.
#[must_use]
pub fn ray_sphere_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    center: Vec3,
    radius: f32,
) -> Option<f32> {
    let oc = ray_origin - center;
    let a = ray_dir.dot(ray_dir);
    let b = 2.0 * oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 || a <= f32::EPSILON {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let t = (-b - sqrt_d) / (2.0 * a);
    if t > 0.0 {
        return Some(t);
    }
    let t2 = (-b + sqrt_d) / (2.0 * a);
    (t2 > 0.0).then_some(t2)
}

/// Anything that can block the line of sight to a point.
pub trait Occluder {
    /// Whether something lies between `eye` and `point`.
    fn occludes(&self, eye: Vec3, point: Vec3) -> bool;
}

/// Relative slack for points that sit exactly on the occluding surface.
const SURFACE_TOLERANCE: f32 = 1e-3;

/// The globe as a sphere in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereOccluder {
    /// World-space center.
    pub center: Vec3,
    /// World-space radius.
    pub radius: f32,
}

impl SphereOccluder {
    /// Sphere of `radius` at the origin, transformed by `model`.
    ///
    /// The radius uses the largest axis scale of the transform.
    #[must_use]
    pub fn from_model(model: Mat4, radius: f32) -> Self {
        let (scale, _, translation) = model.to_scale_rotation_translation();
        Self {
            center: translation,
            radius: radius * scale.abs().max_element(),
        }
    }
}

impl Occluder for SphereOccluder {
    fn occludes(&self, eye: Vec3, point: Vec3) -> bool {
        let Some(ray) = Ray::toward(eye, point) else {
            return false;
        };
        let distance = (point - eye).length();
        match ray_sphere_intersect(ray.origin, ray.dir, self.center, self.radius) {
            Some(t) => t < distance - distance * SURFACE_TOLERANCE,
            None => false,
        }
    }
}

/// Occluder for scenes with nothing to hide behind.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOcclusion;

impl Occluder for NoOcclusion {
    fn occludes(&self, _eye: Vec3, _point: Vec3) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_front_of_unit_sphere() {
        let t = ray_sphere_intersect(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z, Vec3::ZERO, 1.0)
            .unwrap();
        assert!((t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn misses_when_offset() {
        let hit =
            ray_sphere_intersect(Vec3::new(2.0, 0.0, 3.0), Vec3::NEG_Z, Vec3::ZERO, 1.0);
        assert!(hit.is_none());
    }

    #[test]
    fn inside_origin_uses_far_root() {
        let t = ray_sphere_intersect(Vec3::ZERO, Vec3::X, Vec3::ZERO, 1.0).unwrap();
        assert!((t - 1.0).abs() < 1e-5);
    }

    #[test]
    fn far_side_point_is_occluded() {
        let sphere = SphereOccluder { center: Vec3::ZERO, radius: 1.0 };
        let eye = Vec3::new(0.0, 0.0, 3.0);
        assert!(sphere.occludes(eye, Vec3::new(0.0, 0.0, -1.0)));
        assert!(!sphere.occludes(eye, Vec3::new(0.0, 0.0, 1.0)));
    }

    #[test]
    fn limb_point_stays_visible() {
        let sphere = SphereOccluder { center: Vec3::ZERO, radius: 1.0 };
        let eye = Vec3::new(0.0, 0.0, 3.0);
        // Facing hemisphere but well off-axis.
        let point = Vec3::new(0.8, 0.0, 0.6);
        assert!(!sphere.occludes(eye, point));
    }

    #[test]
    fn from_model_reads_scale_and_translation() {
        let model = Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            glam::Quat::from_rotation_y(1.0),
            Vec3::new(1.0, 0.0, 0.0),
        );
        let sphere = SphereOccluder::from_model(model, 1.0);
        assert!((sphere.radius - 2.0).abs() < 1e-5);
        assert!((sphere.center - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn coincident_points_are_not_occluded() {
        let sphere = SphereOccluder { center: Vec3::ZERO, radius: 1.0 };
        assert!(!sphere.occludes(Vec3::Z, Vec3::Z));
    }
}
