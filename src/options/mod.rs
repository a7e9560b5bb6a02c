//! Centralized demo options with TOML preset support.
//!
//! Camera, lighting, display, label and keybinding settings live here and
//! serialize to/from TOML so a run can be tuned without recompiling.

mod camera;
mod display;
mod labels;
mod lighting;

use std::path::Path;

pub use camera::CameraOptions;
pub use display::{parse_hex_color, DisplayOptions};
pub use labels::LabelOptions;
pub use lighting::LightingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::OrbisError;
use crate::input::KeyBindings;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[lighting]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
    /// Lighting parameters.
    pub lighting: LightingOptions,
    /// Background, tessellation and texture settings.
    pub display: DisplayOptions,
    /// Label marker settings.
    pub labels: LabelOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeyBindings,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from a TOML string. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, OrbisError> {
        toml::from_str(content)
            .map_err(|e| OrbisError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, OrbisError> {
        let content = std::fs::read_to_string(path).map_err(OrbisError::Io)?;
        Self::from_toml(&content)
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), OrbisError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| OrbisError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(OrbisError::Io)?;
        }
        std::fs::write(path, content).map_err(OrbisError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::command::Command;
    use crate::util::easing::EasingFunction;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[lighting]
intensity = 2.5
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.lighting.intensity, 2.5);
        // Everything else should be default
        assert_eq!(opts.lighting.direction, [-1.0, 2.0, 4.0]);
        assert_eq!(opts.camera.fovy, 60.0);
        assert_eq!(opts.display.clear_color, "#2c3e50");
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml("[camera\nfovy = ").unwrap_err();
        assert!(matches!(err, OrbisError::OptionsParse(_)));
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(opts.keybindings.lookup("KeyR"), Some(Command::ResetCamera));
        assert_eq!(
            opts.keybindings.lookup("Escape"),
            Some(Command::ClearSelection)
        );
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn save_then_load_preserves_overrides() {
        let dir = std::env::temp_dir()
            .join(format!("orbis-options-{}", std::process::id()));
        let path = dir.join("preset.toml");
        let mut opts = Options::default();
        opts.camera.fly_to_seconds = 0.75;
        opts.camera.fly_to_easing = EasingFunction::QuadraticOut;
        opts.display.spin_speed = 2.0;

        opts.save(&path).unwrap();
        let loaded = Options::load(&path).unwrap();
        assert_eq!(loaded, opts);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn default_surfaces_are_white_under_a_far_plane_past_max_zoom() {
        let opts = Options::default();
        assert_eq!(opts.display.cube_color, [1.0, 1.0, 1.0]);
        let globe_far_side = opts.camera.max_distance + opts.display.globe_radius;
        assert!(opts.camera.zfar > globe_far_side);
    }

    #[test]
    fn clear_color_parses_hex() {
        let rgb = DisplayOptions::default().clear_rgb();
        assert!((rgb[0] - 44.0 / 255.0).abs() < 1e-6);
        assert!((rgb[2] - 80.0 / 255.0).abs() < 1e-6);
        assert_eq!(parse_hex_color("#ffffff"), Some([1.0, 1.0, 1.0]));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("zz0000"), None);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("camera"));
        assert!(props.contains_key("lighting"));
        assert!(props.contains_key("display"));
        assert!(props.contains_key("labels"));
        assert!(!props.contains_key("keybindings"));

        let lighting = &props["lighting"]["properties"];
        assert!(lighting.get("intensity").is_some());
        assert!(lighting.get("direction").is_none());
    }
}
