use parallax_common::{Rect, SceneError, TextureHandle};
use parallax_input::SpriteRegistry;
use parallax_particles::Particle;
use parallax_view::{Camera, Mapping, Projection, ViewportState};

use crate::backend::{DrawRequest, GpuBackend, Layer};
use crate::config::CompositionPolicy;

/// What one `compose` call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub drawn: usize,
    /// Drawables skipped because they had no texture yet.
    pub skipped_missing_texture: usize,
    /// World layers were skipped because no background has been set.
    pub not_ready: bool,
}

/// Read-only view of everything drawn in one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    pub viewport: &'a ViewportState,
    pub camera: &'a Camera,
    pub background: Option<TextureHandle>,
    pub sprites: &'a SpriteRegistry,
    pub particles: &'a [Particle],
    pub particle_texture: Option<TextureHandle>,
}

/// Walks the layers in fixed order and hands each quad to a backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderCompositor {
    policy: CompositionPolicy,
}

impl RenderCompositor {
    pub fn new(policy: CompositionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> CompositionPolicy {
        self.policy
    }

    /// Compose one frame: background, then sprites, then particles.
    ///
    /// `begin_frame`/`end_frame` are always called, even when nothing can be
    /// drawn yet, so the backend still clears.
    pub fn compose<B: GpuBackend + ?Sized>(
        &self,
        input: &FrameInput<'_>,
        backend: &mut B,
    ) -> FrameStats {
        let mut stats = FrameStats::default();
        backend.begin_frame();

        match Projection::new(input.viewport, input.camera) {
            Ok(projection) => self.draw_layers(&projection, input, backend, &mut stats),
            Err(SceneError::NotReady) => {
                tracing::trace!("no background yet, world layers skipped");
                stats.not_ready = true;
            }
            Err(err) => {
                tracing::warn!(%err, "projection failed, world layers skipped");
                stats.not_ready = true;
            }
        }

        backend.end_frame();
        stats
    }

    fn draw_layers<B: GpuBackend + ?Sized>(
        &self,
        projection: &Projection,
        input: &FrameInput<'_>,
        backend: &mut B,
        stats: &mut FrameStats,
    ) {
        let offset = projection.offset();
        let mut emit = |layer: Layer,
                        texture: Option<TextureHandle>,
                        rect: Rect,
                        mapping: Mapping,
                        alpha: f32,
                        hover: bool| {
            let Some(texture) = texture else {
                tracing::trace!(?layer, "missing texture, drawable skipped");
                stats.skipped_missing_texture += 1;
                return;
            };
            backend.draw(&DrawRequest {
                layer,
                texture,
                quad: projection.to_ndc(rect, mapping),
                alpha,
                hover,
                offset,
            });
            stats.drawn += 1;
        };

        emit(
            Layer::Background,
            input.background,
            projection.world().rect(),
            self.policy.background_mapping(),
            1.0,
            false,
        );

        let overlay = self.policy.overlay_mapping();
        for (id, sprite) in input.sprites.iter() {
            emit(
                Layer::Sprite(id),
                sprite.texture(),
                sprite.rect(),
                overlay,
                1.0,
                sprite.is_hovered(),
            );
        }

        for (index, particle) in input.particles.iter().enumerate() {
            emit(
                Layer::Particle(index),
                input.particle_texture,
                particle.rect(),
                overlay,
                particle.alpha.clamp(0.0, 1.0),
                false,
            );
        }
    }
}
