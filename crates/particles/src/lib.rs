//! Particles: the ephemeral smoke layer.
//!
//! # Invariants
//! - Particles spawn in symmetric pairs at the two emission anchors.
//! - Alpha only decreases; a particle is culled on the tick its alpha reaches zero
//!   (within a residue scaled to its decay).
//! - The live set never exceeds the configured cap.

mod emitter;

pub use emitter::{EmitterConfig, Particle, ParticleEmitter, TickStats, ValueRange};

pub fn crate_info() -> &'static str {
    "parallax-particles v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("particles"));
    }
}
