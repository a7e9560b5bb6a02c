// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Unused / redundant code
#![warn(unused_results)]
#![warn(unused_qualifications)]
// Cast hygiene
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]

//! Interactive globe demos rendered with wgpu.
//!
//! Orbis ships three demo scenes of increasing feature count: a spinning
//! cube, an orbit-controlled textured globe, and a globe annotated with
//! clickable capital-city labels that hide when the globe occludes them.
//!
//! # Key entry points
//!
//! - [`engine::DemoEngine`] - GPU-backed engine driving one demo
//! - [`scene::Stage`] - platform-independent application state (camera,
//!   mesh transform, clock, labels)
//! - [`options::Options`] - runtime configuration (camera, lighting,
//!   display, labels)
//! - `Viewer` - standalone winit window (feature `viewer`)
//!
//! # Architecture
//!
//! Everything runs on one thread. The host (a winit event loop or the
//! browser's `requestAnimationFrame`) calls [`engine::DemoEngine::update`]
//! and [`engine::DemoEngine::render`] once per frame and forwards resize
//! and pointer events synchronously.

pub mod camera;
pub mod demo;
pub mod engine;
pub mod error;
pub mod geo;
pub mod gpu;
pub mod input;
pub mod labels;
pub mod options;
pub mod renderer;
pub mod scene;
pub mod util;

#[cfg(feature = "viewer")]
pub mod viewer;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use demo::DemoKind;
pub use engine::{command::Command, DemoEngine};
pub use error::OrbisError;
pub use input::{InputEvent, MouseButton};
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
