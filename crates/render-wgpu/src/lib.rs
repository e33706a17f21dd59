//! wgpu render backend for the parallax scene.
//!
//! Draws every layer as textured quads through one alpha-blended pipeline.
//!
//! # Invariants
//! - The backend never mutates scene state; it only consumes draw requests.
//! - Quads are submitted in request order, so layer order is preserved.
//! - Draws naming a texture this backend never uploaded are skipped with a warning.

mod gpu;
mod shaders;

pub use gpu::{BackendError, WgpuBackend};
pub use shaders::QUAD_SHADER;
