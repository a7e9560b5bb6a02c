use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::util::easing::EasingFunction;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection and control parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 90.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub zfar: f32,
    /// Initial distance from the orbit focus.
    #[schemars(title = "Distance", range(min = 1.5, max = 20.0), extend("step" = 0.1))]
    pub distance: f32,
    /// Closest allowed zoom distance.
    #[schemars(skip)]
    pub min_distance: f32,
    /// Farthest allowed zoom distance.
    #[schemars(skip)]
    pub max_distance: f32,
    /// Rotation sensitivity in radians per pixel dragged.
    #[schemars(title = "Rotate Speed", range(min = 0.001, max = 0.05), extend("step" = 0.001))]
    pub rotate_speed: f32,
    /// Pan sensitivity in world units per pixel dragged.
    #[schemars(title = "Pan Speed", range(min = 0.001, max = 0.05), extend("step" = 0.001))]
    pub pan_speed: f32,
    /// Zoom sensitivity multiplier per scroll unit.
    #[schemars(title = "Zoom Speed", range(min = 0.01, max = 0.5), extend("step" = 0.01))]
    pub zoom_speed: f32,
    /// Duration of the label fly-to in seconds. Zero jumps immediately.
    #[schemars(title = "Fly-to Duration", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub fly_to_seconds: f32,
    /// Easing curve of an animated fly-to.
    #[schemars(title = "Fly-to Easing")]
    pub fly_to_easing: EasingFunction,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 60.0,
            znear: 0.1,
            zfar: 100.0,
            distance: 3.0,
            min_distance: 1.2,
            max_distance: 20.0,
            rotate_speed: 0.005,
            pan_speed: 0.005,
            zoom_speed: 0.1,
            fly_to_seconds: 0.0,
            fly_to_easing: EasingFunction::SmoothStep,
        }
    }
}
