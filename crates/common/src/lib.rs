//! Shared types for the parallax scene core.
//!
//! # Invariants
//! - World-space values are expressed in background units, never viewport pixels.
//! - Every fallible core operation reports a [`SceneError`].

mod error;
mod types;

pub use error::SceneError;
pub use types::{Rect, SpriteId, TextureHandle, WorldSize};

pub fn crate_info() -> &'static str {
    "parallax-common v0.1.0"
}
