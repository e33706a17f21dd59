use glam::Vec2;
use parallax_common::{Rect, SceneError, SpriteId, TextureHandle, WorldSize};
use parallax_input::{InputSink, InteractionHandler, PickingResolver, SpriteRegistry};
use parallax_particles::{Particle, ParticleEmitter, TickStats};
use parallax_view::{Camera, Projection, ViewportState, validate_pointer};

use crate::backend::GpuBackend;
use crate::compositor::{FrameInput, FrameStats, RenderCompositor};
use crate::config::SceneConfig;

/// The world-defining background layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Background {
    pub size: WorldSize,
    pub texture: Option<TextureHandle>,
}

/// What one `Scene::tick` advanced.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// Camera offset after the tick.
    pub offset: f32,
    /// Whether a particle pair spawned this tick.
    pub spawned: bool,
    /// Particle stats; `None` until a background establishes the world.
    pub particles: Option<TickStats>,
}

/// One renderer instance: owns the viewport, camera, sprites, picking and smoke.
///
/// Hosts drive it with input events (through [`InputSink`]), then one
/// [`Scene::tick`] and one [`Scene::render`] per frame.
#[derive(Debug)]
pub struct Scene {
    config: SceneConfig,
    viewport: ViewportState,
    camera: Camera,
    sprites: SpriteRegistry,
    picking: PickingResolver,
    emitter: ParticleEmitter,
    compositor: RenderCompositor,
    background: Option<Background>,
    particle_texture: Option<TextureHandle>,
    ticks: u64,
}

impl Scene {
    /// Scene with an OS-seeded particle emitter.
    pub fn new(config: SceneConfig) -> Result<Self, SceneError> {
        config.validate()?;
        let emitter = ParticleEmitter::new(config.smoke.clone())?;
        Self::with_emitter(config, emitter)
    }

    /// Scene whose smoke is reproducible for a given seed.
    pub fn with_seed(config: SceneConfig, seed: u64) -> Result<Self, SceneError> {
        config.validate()?;
        let emitter = ParticleEmitter::with_seed(config.smoke.clone(), seed)?;
        Self::with_emitter(config, emitter)
    }

    fn with_emitter(config: SceneConfig, emitter: ParticleEmitter) -> Result<Self, SceneError> {
        Ok(Self {
            camera: Camera::new(config.damping)?,
            compositor: RenderCompositor::new(config.composition),
            viewport: ViewportState::default(),
            sprites: SpriteRegistry::new(),
            picking: PickingResolver::new(),
            emitter,
            background: None,
            particle_texture: None,
            ticks: 0,
            config,
        })
    }

    /// Set (or replace) the background, which defines world space.
    ///
    /// The first background centers the camera in its pan range.
    pub fn set_background(&mut self, size: WorldSize, texture: Option<TextureHandle>) {
        let first = self.background.is_none();
        self.background = Some(Background { size, texture });
        self.viewport.set_world(size);
        self.refresh_bounds();
        if first {
            self.camera.center();
        }
        tracing::debug!(
            width = size.width,
            height = size.height,
            max_scroll = self.camera.max_scroll(),
            offset = self.camera.offset(),
            "background set"
        );
    }

    /// Attach the background texture once it is ready.
    pub fn set_background_texture(&mut self, texture: TextureHandle) -> Result<(), SceneError> {
        let background = self.background.as_mut().ok_or(SceneError::NotReady)?;
        background.texture = Some(texture);
        Ok(())
    }

    pub fn add_sprite(
        &mut self,
        rect: Rect,
        texture: Option<TextureHandle>,
        handler: impl InteractionHandler + 'static,
    ) -> Result<SpriteId, SceneError> {
        self.sprites.add(rect, texture, Box::new(handler))
    }

    pub fn set_sprite_texture(
        &mut self,
        id: SpriteId,
        texture: TextureHandle,
    ) -> Result<(), SceneError> {
        self.sprites.set_texture(id, texture)
    }

    pub fn set_particle_texture(&mut self, texture: TextureHandle) {
        self.particle_texture = Some(texture);
    }

    /// Check that every drawable has a texture. Rendering tolerates gaps;
    /// hosts that upload everything up front can use this to fail fast.
    pub fn ensure_textures(&self) -> Result<(), SceneError> {
        let background = self.background.ok_or(SceneError::NotReady)?;
        if background.texture.is_none() {
            return Err(SceneError::MissingTexture("background".into()));
        }
        if let Some((id, _)) = self.sprites.iter().find(|(_, s)| s.texture().is_none()) {
            return Err(SceneError::MissingTexture(id.to_string()));
        }
        if self.particle_texture.is_none() {
            return Err(SceneError::MissingTexture("particles".into()));
        }
        Ok(())
    }

    /// Advance one frame: ease the camera, then spawn, integrate and cull smoke.
    pub fn tick(&mut self) -> TickReport {
        self.ticks += 1;
        let offset = self.camera.tick();
        let Some(background) = self.background else {
            return TickReport {
                offset,
                ..TickReport::default()
            };
        };
        let spawned = self.emitter.maybe_spawn(background.size);
        let stats = self.emitter.tick();
        TickReport {
            offset,
            spawned,
            particles: Some(stats),
        }
    }

    /// Compose the current state through a backend. Never mutates the scene.
    pub fn render<B: GpuBackend + ?Sized>(&self, backend: &mut B) -> FrameStats {
        let input = FrameInput {
            viewport: &self.viewport,
            camera: &self.camera,
            background: self.background.and_then(|b| b.texture),
            sprites: &self.sprites,
            particles: self.emitter.particles(),
            particle_texture: self.particle_texture,
        };
        self.compositor.compose(&input, backend)
    }

    fn refresh_bounds(&mut self) {
        let max_scroll = self.viewport.max_scroll(self.config.max_parallax_fraction);
        self.camera.set_max_scroll(max_scroll);
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn sprites(&self) -> &SpriteRegistry {
        &self.sprites
    }

    pub fn background(&self) -> Option<Background> {
        self.background
    }

    pub fn particles(&self) -> &[Particle] {
        self.emitter.particles()
    }

    pub fn hovered(&self) -> Option<SpriteId> {
        self.picking.active()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_ready(&self) -> bool {
        self.viewport.is_ready()
    }
}

impl InputSink for Scene {
    /// Retarget the camera to `x · max_scroll` and re-resolve hover against
    /// the current (pre-tick) camera snapshot.
    ///
    /// Before a background exists a valid pointer is accepted and ignored.
    fn on_pointer_move(&mut self, x: f32, y: f32) -> Result<(), SceneError> {
        let pointer = Vec2::new(x, y);
        validate_pointer(pointer)?;
        let projection = match Projection::new(&self.viewport, &self.camera) {
            Ok(projection) => projection,
            Err(SceneError::NotReady) => return Ok(()),
            Err(err) => return Err(err),
        };

        self.picking.pointer_moved(
            &mut self.sprites,
            &projection,
            self.config.composition.overlay_mapping(),
            pointer,
        )?;
        self.camera.set_target(x * self.camera.max_scroll())?;
        Ok(())
    }

    fn on_pointer_leave(&mut self) {
        self.picking.pointer_left(&mut self.sprites);
    }

    fn on_click(&mut self) -> Option<SpriteId> {
        self.picking.click(&mut self.sprites)
    }

    fn on_resize(
        &mut self,
        width: f32,
        height: f32,
        device_pixel_ratio: f32,
    ) -> Result<(), SceneError> {
        if self.viewport.resize(width, height, device_pixel_ratio)? {
            self.refresh_bounds();
        }
        Ok(())
    }
}
