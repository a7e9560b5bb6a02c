//! The three demo scenes and what each one turns on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which demo scene is running.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DemoKind {
    /// Spinning lit cube.
    Cube,
    /// Textured globe with orbit controls.
    Globe,
    /// Globe with clickable capital-city labels.
    #[default]
    Capitals,
}

/// Geometry a demo draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshKind {
    /// Unit cube.
    Cube,
    /// UV sphere.
    Sphere,
}

impl DemoKind {
    /// All demos in presentation order.
    pub const ALL: [Self; 3] = [Self::Cube, Self::Globe, Self::Capitals];

    /// Mesh drawn by this demo.
    #[must_use]
    pub fn mesh(self) -> MeshKind {
        match self {
            Self::Cube => MeshKind::Cube,
            Self::Globe | Self::Capitals => MeshKind::Sphere,
        }
    }

    /// Whether the mesh spins on its own.
    #[must_use]
    pub fn spins(self) -> bool {
        matches!(self, Self::Cube)
    }

    /// Whether the mesh samples the globe texture.
    #[must_use]
    pub fn textured(self) -> bool {
        matches!(self, Self::Globe | Self::Capitals)
    }

    /// Whether capital labels are shown.
    #[must_use]
    pub fn has_labels(self) -> bool {
        matches!(self, Self::Capitals)
    }

    /// Window title.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Cube => "Orbis - Cube",
            Self::Globe => "Orbis - Globe",
            Self::Capitals => "Orbis - Capitals",
        }
    }

    /// Stable lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Cube => "cube",
            Self::Globe => "globe",
            Self::Capitals => "capitals",
        }
    }
}

impl fmt::Display for DemoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognised demo name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDemo(pub String);

impl fmt::Display for UnknownDemo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown demo {:?} (expected cube, globe or capitals)",
            self.0
        )
    }
}

impl std::error::Error for UnknownDemo {}

impl FromStr for DemoKind {
    type Err = UnknownDemo;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|demo| demo.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownDemo(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("cube".parse::<DemoKind>(), Ok(DemoKind::Cube));
        assert_eq!(" Globe ".parse::<DemoKind>(), Ok(DemoKind::Globe));
        assert_eq!("CAPITALS".parse::<DemoKind>(), Ok(DemoKind::Capitals));
        assert!("torus".parse::<DemoKind>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for demo in DemoKind::ALL {
            assert_eq!(demo.to_string().parse::<DemoKind>(), Ok(demo));
        }
    }

    #[test]
    fn feature_matrix() {
        assert!(DemoKind::Cube.spins());
        assert!(!DemoKind::Cube.textured());
        assert_eq!(DemoKind::Globe.mesh(), MeshKind::Sphere);
        assert!(!DemoKind::Globe.has_labels());
        assert!(DemoKind::Capitals.has_labels());
    }
}
