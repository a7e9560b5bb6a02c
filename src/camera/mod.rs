//! Camera system for 3D scene viewing.
//!
//! Provides a perspective camera, an orbit controller with rotation, pan and
//! zoom, and the fly-to rotation used when a label is chosen.

/// Orbit controller managing rotation, pan, zoom and fly-to.
pub mod controller;
/// Core camera struct and GPU uniform types.
pub mod core;
/// Rotation of the camera about the origin toward a target point.
pub mod fly_to;

pub use controller::OrbitController;
pub use core::{Camera, CameraUniform};
