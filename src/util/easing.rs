//! Easing curves for camera fly-to interpolation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Easing curve applied to normalized animation progress.
#[derive(
    Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// No easing.
    Linear,
    /// Fast start, slow end.
    QuadraticOut,
    /// Slow start and end (`3t² - 2t³`).
    #[default]
    SmoothStep,
    /// Cubic Hermite with two inner control values.
    /// Formula: c1·3t(1-t)² + c2·3(1-t)t² + t³
    CubicHermite {
        /// First inner control value.
        c1: f32,
        /// Second inner control value.
        c2: f32,
    },
}

impl EasingFunction {
    /// Evaluate the curve at `t`, clamped to `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            Self::SmoothStep => t * t * (3.0 - 2.0 * t),
            Self::CubicHermite { c1, c2 } => {
                let omt = 1.0 - t;
                c1 * 3.0 * t * omt * omt + c2 * 3.0 * omt * t * t + t * t * t
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_curves_hit_endpoints() {
        for easing in [
            EasingFunction::Linear,
            EasingFunction::QuadraticOut,
            EasingFunction::SmoothStep,
            EasingFunction::CubicHermite { c1: 0.33, c2: 1.0 },
        ] {
            assert_eq!(easing.evaluate(0.0), 0.0, "{easing:?}");
            assert!((easing.evaluate(1.0) - 1.0).abs() < 1e-6, "{easing:?}");
        }
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(EasingFunction::Linear.evaluate(-0.5), 0.0);
        assert_eq!(EasingFunction::Linear.evaluate(1.5), 1.0);
    }

    #[test]
    fn smooth_step_is_symmetric() {
        let s = EasingFunction::SmoothStep;
        assert_eq!(s.evaluate(0.5), 0.5);
        assert!((s.evaluate(0.25) + s.evaluate(0.75) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn quadratic_out_front_loads_progress() {
        assert_eq!(EasingFunction::QuadraticOut.evaluate(0.5), 0.75);
    }
}
