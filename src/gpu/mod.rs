//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, uniform bindings for the
//! camera and light, textures, dynamic buffers and shader composition.

/// Camera uniform buffer and bind group.
pub mod camera_binding;
/// Growable GPU buffers with automatic reallocation.
pub mod dynamic_buffer;
/// Directional light uniform and bind group.
pub mod lighting;
/// Shared wgpu boilerplate for layouts and pipelines.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Depth target and sampled image textures.
pub mod texture;
