//! Shared utilities: frame clock, FPS counter and easing curves.

pub mod clock;
pub mod easing;
pub mod frame_timing;
