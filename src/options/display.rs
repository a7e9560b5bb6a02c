use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
/// Scene appearance: background, mesh tessellation and textures.
pub struct DisplayOptions {
    /// Background clear color as a `#rrggbb` hex string.
    #[schemars(title = "Background")]
    pub clear_color: String,
    /// Cube spin speed in radians per second.
    #[schemars(title = "Spin Speed", range(min = 0.0, max = 5.0), extend("step" = 0.1))]
    pub spin_speed: f32,
    /// Globe radius in world units.
    #[schemars(skip)]
    pub globe_radius: f32,
    /// Horizontal sphere segments.
    #[schemars(title = "Sphere Segments", range(min = 8, max = 256))]
    pub sphere_width_segments: u32,
    /// Vertical sphere segments.
    #[schemars(title = "Sphere Rings", range(min = 4, max = 128))]
    pub sphere_height_segments: u32,
    /// Cube edge length.
    #[schemars(skip)]
    pub cube_size: f32,
    /// Cube surface color (linear RGB).
    #[schemars(skip)]
    pub cube_color: [f32; 3],
    /// Path of the equirectangular globe texture.
    #[schemars(skip)]
    pub texture_path: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            clear_color: "#2c3e50".to_owned(),
            spin_speed: 1.0,
            globe_radius: 1.0,
            sphere_width_segments: 64,
            sphere_height_segments: 32,
            cube_size: 1.0,
            cube_color: [1.0, 1.0, 1.0],
            texture_path: "assets/textures/graticule.png".to_owned(),
        }
    }
}

impl DisplayOptions {
    /// Parsed clear color as sRGB `[0, 1]` components. Malformed strings fall
    /// back to the default background.
    #[must_use]
    pub fn clear_rgb(&self) -> [f32; 3] {
        parse_hex_color(&self.clear_color).unwrap_or_else(|| {
            log::warn!("invalid clear color {:?}", self.clear_color);
            [44.0 / 255.0, 62.0 / 255.0, 80.0 / 255.0]
        })
    }
}

/// Parse `#rrggbb` (leading `#` optional) into `[0, 1]` components.
#[must_use]
pub fn parse_hex_color(hex: &str) -> Option<[f32; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .ok()
            .map(|v| f32::from(v) / 255.0)
    };
    Some([channel(0)?, channel(2)?, channel(4)?])
}
