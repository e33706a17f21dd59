use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::SceneError;

/// Opaque texture handle owned by the GPU backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureHandle(pub u64);

/// Identifier of a sprite: its insertion index in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpriteId(pub usize);

impl std::fmt::Display for SpriteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sprite#{}", self.0)
    }
}

/// Background dimensions in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldSize {
    pub width: f32,
    pub height: f32,
}

impl WorldSize {
    /// Both dimensions must be finite and positive.
    pub fn new(width: f32, height: f32) -> Result<Self, SceneError> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(SceneError::invalid_input(format!(
                "world size must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Point at the given fraction of the world, e.g. `(0.5, 0.5)` is the center.
    pub fn at_fraction(&self, fraction: Vec2) -> Vec2 {
        Vec2::new(self.width * fraction.x, self.height * fraction.y)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Axis-aligned rectangle in world space. `y` grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square of side `size` centered on `center`.
    pub fn centered(center: Vec2, size: f32) -> Self {
        let half = size * 0.5;
        Self::new(center.x - half, center.y - half, size, size)
    }

    /// Inclusive containment over `[x, x+w] x [y, y+h]`.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.w
            && point.y >= self.y
            && point.y <= self.y + self.h
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_size_rejects_non_positive() {
        assert!(WorldSize::new(1920.0, 1080.0).is_ok());
        assert!(matches!(
            WorldSize::new(0.0, 1080.0),
            Err(SceneError::InvalidInput(_))
        ));
        assert!(WorldSize::new(f32::NAN, 10.0).is_err());
        assert!(WorldSize::new(10.0, f32::INFINITY).is_err());
    }

    #[test]
    fn rect_containment_is_inclusive() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert!(r.contains(Vec2::new(10.0, 20.0)));
        assert!(r.contains(Vec2::new(40.0, 60.0)));
        assert!(r.contains(Vec2::new(25.0, 30.0)));
        assert!(!r.contains(Vec2::new(9.9, 30.0)));
        assert!(!r.contains(Vec2::new(25.0, 60.1)));
    }

    #[test]
    fn centered_rect() {
        let r = Rect::centered(Vec2::new(100.0, 50.0), 20.0);
        assert_eq!(r, Rect::new(90.0, 40.0, 20.0, 20.0));
    }

    #[test]
    fn fraction_of_world() {
        let world = WorldSize::new(200.0, 100.0).unwrap();
        assert_eq!(world.at_fraction(Vec2::new(0.25, 0.5)), Vec2::new(50.0, 50.0));
        assert_eq!(world.rect(), Rect::new(0.0, 0.0, 200.0, 100.0));
    }
}
