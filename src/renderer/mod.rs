//! Renderers for the demo mesh and the native label overlay.

pub mod label_markers;
pub mod mesh_renderer;

pub use label_markers::LabelMarkerRenderer;
pub use mesh_renderer::{MeshRenderer, MeshUniform};
