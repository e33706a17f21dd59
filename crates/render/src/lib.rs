//! Rendering: fixed-order layer composition over a backend-agnostic draw interface.
//!
//! # Invariants
//! - Draw order per frame is background, then sprites in insertion order, then particles.
//! - Compositing never mutates scene state.
//! - World layers are skipped, not failed, until a background establishes the world.
//!
//! # Workaround
//! Ships a debug text backend alongside the trait so hosts without a GPU
//! (CLI, tests) can drive the full pipeline. Swap in the wgpu backend
//! without changing the scene.

mod backend;
mod compositor;
mod config;
mod scene;

pub use backend::{DebugTextBackend, DrawRequest, GpuBackend, Layer};
pub use compositor::{FrameInput, FrameStats, RenderCompositor};
pub use config::{CompositionPolicy, ConfigError, SceneConfig};
pub use scene::{Background, Scene, TickReport};

pub fn crate_info() -> &'static str {
    "parallax-render v0.1.0"
}
