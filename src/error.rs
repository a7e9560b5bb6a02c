//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::RenderContextError;

/// Errors produced by the orbis crate.
#[derive(Debug)]
pub enum OrbisError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// The embedded or user-supplied city catalog could not be parsed.
    CatalogParse(serde_json::Error),
    /// A texture image could not be fetched or decoded.
    Texture(String),
    /// WGSL composition failure.
    Shader(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for OrbisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::CatalogParse(e) => write!(f, "city catalog error: {e}"),
            Self::Texture(msg) => write!(f, "texture error: {msg}"),
            Self::Shader(msg) => write!(f, "shader error: {msg}"),
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for OrbisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::CatalogParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for OrbisError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for OrbisError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for OrbisError {
    fn from(e: serde_json::Error) -> Self {
        Self::CatalogParse(e)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn io_error_keeps_source() {
        let err = OrbisError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "earth.jpg",
        ));
        assert!(err.to_string().starts_with("I/O error"));
        assert!(err.source().is_some());
    }

    #[test]
    fn texture_error_has_no_source() {
        let err = OrbisError::Texture("bad header".into());
        assert_eq!(err.to_string(), "texture error: bad header");
        assert!(err.source().is_none());
    }
}
