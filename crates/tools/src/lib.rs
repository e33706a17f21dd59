//! Developer tooling: read-only scene inspection for the CLI and desktop overlay.
//!
//! # Invariants
//! - Inspection never mutates the scene.

mod inspector;

pub use inspector::{SceneInspector, SceneSummary, SpriteInfo};

pub fn crate_info() -> &'static str {
    "parallax-tools v0.1.0"
}
