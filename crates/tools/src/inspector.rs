use parallax_common::{Rect, SpriteId};
use parallax_render::Scene;
use serde::Serialize;

/// Scene inspector for developer tooling.
///
/// Provides read-only queries against a scene for debugging and UI overlays.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene state.
    pub fn summary(scene: &Scene) -> SceneSummary {
        let viewport = scene.viewport();
        let camera = scene.camera();
        let cover = viewport.cover().ok();
        SceneSummary {
            ticks: scene.ticks(),
            ready: scene.is_ready(),
            viewport: [viewport.width(), viewport.height()],
            world: viewport.world().map(|w| [w.width, w.height]),
            scale: cover.map(|c| c.scale),
            view_world: cover.map(|c| [c.view_width, c.view_height]),
            offset: camera.offset(),
            target: camera.target(),
            max_scroll: camera.max_scroll(),
            sprite_count: scene.sprites().len(),
            hovered: scene.hovered(),
            particle_count: scene.particles().len(),
        }
    }

    pub fn inspect_sprite(scene: &Scene, id: SpriteId) -> Option<SpriteInfo> {
        scene.sprites().get(id).map(|sprite| SpriteInfo {
            id,
            rect: sprite.rect(),
            has_texture: sprite.texture().is_some(),
            hovered: sprite.is_hovered(),
        })
    }

    /// List all sprites, bottom to top.
    pub fn list_sprites(scene: &Scene) -> Vec<SpriteInfo> {
        scene
            .sprites()
            .iter()
            .filter_map(|(id, _)| Self::inspect_sprite(scene, id))
            .collect()
    }
}

/// Summary of scene state for the inspector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSummary {
    pub ticks: u64,
    pub ready: bool,
    pub viewport: [f32; 2],
    pub world: Option<[f32; 2]>,
    pub scale: Option<f32>,
    pub view_world: Option<[f32; 2]>,
    pub offset: f32,
    pub target: f32,
    pub max_scroll: f32,
    pub sprite_count: usize,
    pub hovered: Option<SpriteId>,
    pub particle_count: usize,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: ticks={} viewport={}x{}",
            self.ticks, self.viewport[0], self.viewport[1]
        )?;
        match (self.world, self.scale) {
            (Some(world), Some(scale)) => {
                write!(f, " world={}x{} scale={scale:.4}", world[0], world[1])?
            }
            _ => write!(f, " world=<not ready>")?,
        }
        write!(
            f,
            " offset={:.2} target={:.2} max_scroll={:.2} sprites={} hovered={} particles={}",
            self.offset,
            self.target,
            self.max_scroll,
            self.sprite_count,
            self.hovered
                .map_or_else(|| "none".to_string(), |id| id.to_string()),
            self.particle_count
        )
    }
}

/// Detailed info about a single sprite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpriteInfo {
    pub id: SpriteId,
    pub rect: Rect,
    pub has_texture: bool,
    pub hovered: bool,
}

impl std::fmt::Display for SpriteInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} rect=({:.1}, {:.1}, {:.1}x{:.1}) texture={} hovered={}",
            self.id, self.rect.x, self.rect.y, self.rect.w, self.rect.h, self.has_texture,
            self.hovered
        )
    }
}
