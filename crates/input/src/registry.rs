use glam::Vec2;
use parallax_common::{Rect, SceneError, SpriteId, TextureHandle};

use crate::handler::InteractionHandler;

/// An interactive world-space rectangle.
pub struct Sprite {
    rect: Rect,
    texture: Option<TextureHandle>,
    hovered: bool,
    handler: Box<dyn InteractionHandler>,
}

impl Sprite {
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// `None` until the backend has produced a texture for this sprite.
    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub(crate) fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    pub(crate) fn handler_mut(&mut self) -> &mut dyn InteractionHandler {
        self.handler.as_mut()
    }
}

impl std::fmt::Debug for Sprite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sprite")
            .field("rect", &self.rect)
            .field("texture", &self.texture)
            .field("hovered", &self.hovered)
            .finish_non_exhaustive()
    }
}

/// Ordered sprite collection. Later insertions draw, and pick, on top.
///
/// Sprites live for the registry's lifetime; `SpriteId` is the insertion index.
#[derive(Debug, Default)]
pub struct SpriteRegistry {
    sprites: Vec<Sprite>,
}

impl SpriteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        rect: Rect,
        texture: Option<TextureHandle>,
        handler: Box<dyn InteractionHandler>,
    ) -> Result<SpriteId, SceneError> {
        if !rect.is_finite() || rect.w < 0.0 || rect.h < 0.0 {
            return Err(SceneError::invalid_input(format!(
                "sprite rect must be finite with non-negative size, got {rect:?}"
            )));
        }
        let id = SpriteId(self.sprites.len());
        self.sprites.push(Sprite {
            rect,
            texture,
            hovered: false,
            handler,
        });
        tracing::debug!(%id, ?rect, has_texture = texture.is_some(), "sprite added");
        Ok(id)
    }

    /// Attach (or replace) a sprite's texture once the backend has one.
    pub fn set_texture(&mut self, id: SpriteId, texture: TextureHandle) -> Result<(), SceneError> {
        let sprite = self
            .sprites
            .get_mut(id.0)
            .ok_or_else(|| SceneError::invalid_input(format!("unknown {id}")))?;
        sprite.texture = Some(texture);
        Ok(())
    }

    pub fn get(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.sprites.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Sprites in insertion (draw) order.
    pub fn iter(&self) -> impl Iterator<Item = (SpriteId, &Sprite)> {
        self.sprites
            .iter()
            .enumerate()
            .map(|(i, sprite)| (SpriteId(i), sprite))
    }

    /// Topmost sprite containing `point`, scanning newest first.
    pub fn resolve(&self, point: Vec2) -> Option<SpriteId> {
        self.sprites
            .iter()
            .rposition(|sprite| sprite.rect.contains(point))
            .map(SpriteId)
    }

    pub fn hovered_count(&self) -> usize {
        self.sprites.iter().filter(|s| s.hovered).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::NoopHandler;

    fn add(registry: &mut SpriteRegistry, rect: Rect) -> SpriteId {
        registry.add(rect, None, Box::new(NoopHandler)).unwrap()
    }

    #[test]
    fn ids_follow_insertion_order() {
        let mut registry = SpriteRegistry::new();
        let a = add(&mut registry, Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = add(&mut registry, Rect::new(20.0, 0.0, 10.0, 10.0));
        assert_eq!((a, b), (SpriteId(0), SpriteId(1)));
        let order: Vec<SpriteId> = registry.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![a, b]);
    }

    #[test]
    fn topmost_wins_on_overlap() {
        let mut registry = SpriteRegistry::new();
        let _a = add(&mut registry, Rect::new(0.0, 0.0, 100.0, 100.0));
        let b = add(&mut registry, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(registry.resolve(Vec2::new(50.0, 50.0)), Some(b));
    }

    #[test]
    fn partial_overlap_resolves_each_region() {
        let mut registry = SpriteRegistry::new();
        let a = add(&mut registry, Rect::new(0.0, 0.0, 100.0, 100.0));
        let b = add(&mut registry, Rect::new(50.0, 0.0, 100.0, 100.0));
        assert_eq!(registry.resolve(Vec2::new(25.0, 50.0)), Some(a));
        assert_eq!(registry.resolve(Vec2::new(75.0, 50.0)), Some(b));
        assert_eq!(registry.resolve(Vec2::new(175.0, 50.0)), None);
    }

    #[test]
    fn rejects_invalid_rects() {
        let mut registry = SpriteRegistry::new();
        assert!(
            registry
                .add(
                    Rect::new(f32::NAN, 0.0, 1.0, 1.0),
                    None,
                    Box::new(NoopHandler),
                )
                .is_err()
        );
        assert!(
            registry
                .add(Rect::new(0.0, 0.0, -1.0, 1.0), None, Box::new(NoopHandler))
                .is_err()
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn late_texture_attaches() {
        let mut registry = SpriteRegistry::new();
        let id = add(&mut registry, Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(registry.get(id).unwrap().texture(), None);
        registry.set_texture(id, TextureHandle(7)).unwrap();
        assert_eq!(registry.get(id).unwrap().texture(), Some(TextureHandle(7)));
        assert!(registry.set_texture(SpriteId(9), TextureHandle(1)).is_err());
    }
}
