use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lighting", inline)]
#[serde(default)]
/// Single directional light plus ambient term.
pub struct LightingOptions {
    /// Position the light shines from; normalized on upload.
    #[schemars(skip)]
    pub direction: [f32; 3],
    /// Linear RGB light color.
    #[schemars(skip)]
    pub color: [f32; 3],
    /// Directional light intensity.
    #[schemars(title = "Intensity", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub intensity: f32,
    /// Ambient light floor.
    #[schemars(title = "Ambient", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub ambient: f32,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            direction: [-1.0, 2.0, 4.0],
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
            ambient: 0.15,
        }
    }
}
