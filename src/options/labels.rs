use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Labels", inline)]
#[serde(default)]
/// Capital label markers and picking.
pub struct LabelOptions {
    /// Marker edge length in physical pixels.
    #[schemars(title = "Marker Size", range(min = 2.0, max = 32.0), extend("step" = 1.0))]
    pub marker_size_px: f32,
    /// Maximum distance from the cursor at which a click picks a label.
    #[schemars(title = "Pick Radius", range(min = 2.0, max = 48.0), extend("step" = 1.0))]
    pub pick_radius_px: f32,
    /// Marker color for unselected labels.
    #[schemars(skip)]
    pub color: [f32; 4],
    /// Marker color for the selected label.
    #[schemars(skip)]
    pub selected_color: [f32; 4],
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            marker_size_px: 8.0,
            pick_radius_px: 12.0,
            color: [1.0, 1.0, 1.0, 0.9],
            selected_color: [1.0, 0.8, 0.1, 1.0],
        }
    }
}
