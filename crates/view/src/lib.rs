//! View model: how world space lands in the viewport.
//!
//! # Invariants
//! - The cover scale always fills the viewport on both axes (crop, never letterbox).
//! - Camera offset stays within `[0, max_scroll]` and never overshoots its target.
//! - `Projection::to_world` is the exact inverse of `Projection::to_ndc` for one snapshot.

mod camera;
mod mapper;
mod viewport;

pub use camera::{Camera, DEFAULT_DAMPING};
pub use mapper::{Mapping, NdcQuad, NdcVertex, Projection, validate_pointer};
pub use viewport::{CoverScale, ViewportState};

pub fn crate_info() -> &'static str {
    "parallax-view v0.1.0"
}
