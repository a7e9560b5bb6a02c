//! Camera fly-to: rotating the camera about the scene origin so it looks
//! down on a target point.

use glam::{Quat, Vec3};

use crate::util::easing::EasingFunction;

/// Angles below this are treated as "already there".
const MIN_ANGLE: f32 = 1e-6;

/// Rotation (about the origin) that carries the direction of `start` onto
/// the direction of `target`.
///
/// The angle comes from the normalized vectors and the axis from their
/// cross product. Opposite directions use any axis perpendicular to
/// `start`. Returns `None` when either vector is zero or the directions
/// already coincide.
#[must_use]
pub fn rotation_between(start: Vec3, target: Vec3) -> Option<Quat> {
    let from = start.try_normalize()?;
    let to = target.try_normalize()?;

    let angle = from.angle_between(to);
    if angle < MIN_ANGLE {
        return None;
    }

    let axis = from
        .cross(to)
        .try_normalize()
        .unwrap_or_else(|| from.any_orthonormal_vector());
    Some(Quat::from_axis_angle(axis, angle))
}

/// Position reached by a single fly-to step from `start` toward `target`.
///
/// The result points along `target` at `start`'s distance from the origin.
#[must_use]
pub fn fly_to_point(start: Vec3, target: Vec3) -> Vec3 {
    rotation_between(start, target).map_or(start, |rotation| rotation * start)
}

/// A fly-to spread over several frames.
///
/// The full rotation is applied gradually through `slerp`, so the final
/// frame lands exactly where the single-step jump would.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyTo {
    rotation: Quat,
    from_orientation: Quat,
    from_focus: Vec3,
    elapsed: f32,
    duration: f32,
    easing: EasingFunction,
}

/// Camera frame produced by [`FlyTo::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyToFrame {
    /// Camera orientation for this frame.
    pub orientation: Quat,
    /// Orbit focus for this frame.
    pub focus: Vec3,
    /// Whether the flight has reached its end.
    pub finished: bool,
}

impl FlyTo {
    /// Start a flight applying `rotation` to the given camera frame over
    /// `duration` seconds.
    #[must_use]
    pub fn new(
        rotation: Quat,
        from_orientation: Quat,
        from_focus: Vec3,
        duration: f32,
        easing: EasingFunction,
    ) -> Self {
        Self {
            rotation,
            from_orientation,
            from_focus,
            elapsed: 0.0,
            duration: duration.max(f32::EPSILON),
            easing,
        }
    }

    /// Advance by `dt` seconds and return the interpolated camera frame.
    pub fn advance(&mut self, dt: f32) -> FlyToFrame {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        let t = self.easing.evaluate(self.elapsed / self.duration);
        let finished = self.elapsed >= self.duration;

        let partial = if finished {
            self.rotation
        } else {
            Quat::IDENTITY.slerp(self.rotation, t)
        };

        FlyToFrame {
            orientation: (partial * self.from_orientation).normalize(),
            focus: partial * self.from_focus,
            finished,
        }
    }

    /// Normalized progress in `[0, 1]`, before easing.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.elapsed / self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        let diff = (a - b).length();
        assert!(diff <= 1e-4, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn jump_lands_on_target_direction_at_original_distance() {
        let start = Vec3::new(0.0, 0.0, 3.0);
        let target = Vec3::new(1.0, 1.0, 0.0);
        let landed = fly_to_point(start, target);
        assert!((landed.length() - 3.0).abs() < 1e-4);
        assert_close(landed.normalize(), target.normalize());
    }

    #[test]
    fn same_direction_is_a_no_op() {
        let start = Vec3::new(0.0, 0.0, 3.0);
        assert!(rotation_between(start, Vec3::Z).is_none());
        assert_close(fly_to_point(start, Vec3::new(0.0, 0.0, 0.5)), start);
    }

    #[test]
    fn opposite_direction_still_rotates() {
        let start = Vec3::new(0.0, 0.0, 3.0);
        let landed = fly_to_point(start, Vec3::NEG_Z);
        assert_close(landed, Vec3::new(0.0, 0.0, -3.0));
    }

    #[test]
    fn zero_target_is_ignored() {
        assert!(rotation_between(Vec3::Z, Vec3::ZERO).is_none());
    }

    #[test]
    fn animated_flight_converges_to_the_jump() {
        let start = Vec3::new(0.0, 0.0, 3.0);
        let target = Vec3::new(-1.0, 0.2, 0.4);
        let rotation = rotation_between(start, target).unwrap();
        let mut flight = FlyTo::new(
            rotation,
            Quat::IDENTITY,
            Vec3::ZERO,
            0.5,
            EasingFunction::SmoothStep,
        );

        let mid = flight.advance(0.25);
        assert!(!mid.finished);
        let mid_eye = mid.orientation * Vec3::Z * 3.0;
        assert!((mid_eye.length() - 3.0).abs() < 1e-4);

        let end = flight.advance(1.0);
        assert!(end.finished);
        assert_close(end.orientation * Vec3::Z * 3.0, fly_to_point(start, target));
        assert_eq!(flight.progress(), 1.0);
    }
}
