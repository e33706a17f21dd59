use glam::Vec2;
use parallax_common::{Rect, SceneError, WorldSize};
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::viewport::{CoverScale, ViewportState};

/// How a world rectangle is positioned relative to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mapping {
    /// Shifted by the camera offset (pans with parallax).
    CameraRelative,
    /// Anchored to the viewport's left edge, ignoring the camera offset.
    ViewportFixed,
}

/// One corner of a mapped quad: NDC position plus texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NdcVertex {
    pub position: Vec2,
    pub uv: Vec2,
}

/// Four corners in triangle-strip order: bottom-left, bottom-right, top-left, top-right.
///
/// Texture coordinates use a top-left origin, so `v = 0` on the top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NdcQuad(pub [NdcVertex; 4]);

impl NdcQuad {
    pub fn bottom_left(&self) -> Vec2 {
        self.0[0].position
    }

    pub fn bottom_right(&self) -> Vec2 {
        self.0[1].position
    }

    pub fn top_left(&self) -> Vec2 {
        self.0[2].position
    }

    pub fn top_right(&self) -> Vec2 {
        self.0[3].position
    }
}

/// A frozen camera/scale snapshot that maps between world space and NDC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    world: WorldSize,
    cover: CoverScale,
    offset: f32,
    origin_y: f32,
}

impl Projection {
    /// Snapshot the viewport and camera. `NotReady` until a world is set.
    pub fn new(viewport: &ViewportState, camera: &Camera) -> Result<Self, SceneError> {
        let world = viewport.world().ok_or(SceneError::NotReady)?;
        let cover = viewport.cover()?;
        Ok(Self::from_parts(world, cover, camera.offset()))
    }

    pub fn from_parts(world: WorldSize, cover: CoverScale, offset: f32) -> Self {
        // Vertical crop is centered; the camera only pans horizontally.
        let origin_y = (world.height - cover.view_height) * 0.5;
        Self {
            world,
            cover,
            offset,
            origin_y,
        }
    }

    pub fn world(&self) -> WorldSize {
        self.world
    }

    pub fn cover(&self) -> CoverScale {
        self.cover
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    fn origin_x(&self, mapping: Mapping) -> f32 {
        match mapping {
            Mapping::CameraRelative => self.offset,
            Mapping::ViewportFixed => 0.0,
        }
    }

    /// World point to NDC (Y flipped: world Y grows down, NDC Y grows up).
    pub fn point_to_ndc(&self, point: Vec2, mapping: Mapping) -> Vec2 {
        let x = (point.x - self.origin_x(mapping)) / self.cover.view_width;
        let y = (point.y - self.origin_y) / self.cover.view_height;
        Vec2::new(x * 2.0 - 1.0, 1.0 - y * 2.0)
    }

    /// Map a world rectangle to a textured quad in NDC.
    pub fn to_ndc(&self, rect: Rect, mapping: Mapping) -> NdcQuad {
        let top_left = self.point_to_ndc(Vec2::new(rect.x, rect.y), mapping);
        let far_corner = Vec2::new(rect.x + rect.w, rect.y + rect.h);
        let bottom_right = self.point_to_ndc(far_corner, mapping);
        let (left, top) = (top_left.x, top_left.y);
        let (right, bottom) = (bottom_right.x, bottom_right.y);

        NdcQuad([
            NdcVertex {
                position: Vec2::new(left, bottom),
                uv: Vec2::new(0.0, 1.0),
            },
            NdcVertex {
                position: Vec2::new(right, bottom),
                uv: Vec2::new(1.0, 1.0),
            },
            NdcVertex {
                position: Vec2::new(left, top),
                uv: Vec2::new(0.0, 0.0),
            },
            NdcVertex {
                position: Vec2::new(right, top),
                uv: Vec2::new(1.0, 0.0),
            },
        ])
    }

    /// NDC position to the pointer fraction of the viewport (`[0,1]^2`, top-left origin).
    pub fn ndc_to_pointer(ndc: Vec2) -> Vec2 {
        Vec2::new((ndc.x + 1.0) * 0.5, (1.0 - ndc.y) * 0.5)
    }

    /// Pointer fraction to world point; the inverse of [`Projection::point_to_ndc`].
    ///
    /// Fractions must be finite and within `[0, 1]`.
    pub fn to_world(&self, pointer: Vec2, mapping: Mapping) -> Result<Vec2, SceneError> {
        validate_pointer(pointer)?;
        Ok(self.unchecked_to_world(pointer, mapping))
    }

    fn unchecked_to_world(&self, pointer: Vec2, mapping: Mapping) -> Vec2 {
        Vec2::new(
            pointer.x * self.cover.view_width + self.origin_x(mapping),
            pointer.y * self.cover.view_height + self.origin_y,
        )
    }
}

/// Reject pointer fractions that are non-finite or outside the viewport.
pub fn validate_pointer(pointer: Vec2) -> Result<(), SceneError> {
    let in_range = |v: f32| v.is_finite() && (0.0..=1.0).contains(&v);
    if in_range(pointer.x) && in_range(pointer.y) {
        Ok(())
    } else {
        Err(SceneError::invalid_input(format!(
            "pointer fraction must lie in [0,1]^2, got ({}, {})",
            pointer.x, pointer.y
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn projection(width: f32, height: f32, offset: f32) -> Projection {
        let world = WorldSize::new(1920.0, 1080.0).unwrap();
        Projection::from_parts(world, CoverScale::compute(width, height, world), offset)
    }

    fn assert_close(a: Vec2, b: Vec2) {
        assert!((a - b).length() < EPS, "{a:?} != {b:?}");
    }

    #[test]
    fn not_ready_before_world() {
        let viewport = ViewportState::default();
        let camera = Camera::default();
        assert_eq!(
            Projection::new(&viewport, &camera),
            Err(SceneError::NotReady)
        );
    }

    #[test]
    fn full_view_maps_to_unit_square() {
        // 960x540 viewport shows the whole 1920x1080 world at scale 0.5.
        let p = projection(960.0, 540.0, 0.0);
        let quad = p.to_ndc(Rect::new(0.0, 0.0, 1920.0, 1080.0), Mapping::CameraRelative);
        assert_close(quad.top_left(), Vec2::new(-1.0, 1.0));
        assert_close(quad.top_right(), Vec2::new(1.0, 1.0));
        assert_close(quad.bottom_left(), Vec2::new(-1.0, -1.0));
        assert_close(quad.bottom_right(), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn camera_offset_shifts_only_camera_relative() {
        let p = projection(1000.0, 1080.0, 200.0);
        let rect = Rect::new(200.0, 0.0, 100.0, 100.0);

        let rel = p.to_ndc(rect, Mapping::CameraRelative);
        assert_close(rel.top_left(), Vec2::new(-1.0, 1.0));

        let fixed = p.to_ndc(rect, Mapping::ViewportFixed);
        let left = -1.0 + 2.0 * 200.0 / 1000.0;
        assert_close(fixed.top_left(), Vec2::new(left, 1.0));
    }

    #[test]
    fn texture_coordinates_follow_strip_order() {
        let p = projection(960.0, 540.0, 0.0);
        let quad = p.to_ndc(Rect::new(0.0, 0.0, 10.0, 10.0), Mapping::ViewportFixed);
        let uvs: Vec<Vec2> = quad.0.iter().map(|v| v.uv).collect();
        assert_eq!(
            uvs,
            vec![
                Vec2::new(0.0, 1.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
            ]
        );
    }

    #[test]
    fn vertical_crop_is_centered() {
        // Wide viewport: whole width visible, 540 of 1080 rows visible.
        let p = projection(3840.0, 1080.0, 0.0);
        let band = Rect::new(0.0, 270.0, 1920.0, 540.0);
        let quad = p.to_ndc(band, Mapping::CameraRelative);
        assert_close(quad.top_left(), Vec2::new(-1.0, 1.0));
        assert_close(quad.bottom_right(), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn round_trip_reconstructs_rect() {
        let rects = [
            Rect::new(0.0, 0.0, 1920.0, 1080.0),
            Rect::new(512.5, 300.25, 64.0, 128.0),
            Rect::new(1500.0, 900.0, 20.0, 10.0),
        ];
        for (width, height, offset) in [
            (800.0, 800.0, 420.0),
            (1000.0, 1080.0, 0.0),
            (3840.0, 1080.0, 0.0),
        ] {
            let p = projection(width, height, offset);
            for mapping in [Mapping::CameraRelative, Mapping::ViewportFixed] {
                for rect in rects {
                    let quad = p.to_ndc(rect, mapping);
                    let tl_pointer = Projection::ndc_to_pointer(quad.top_left());
                    let br_pointer = Projection::ndc_to_pointer(quad.bottom_right());
                    let tl = p.unchecked_to_world(tl_pointer, mapping);
                    let br = p.unchecked_to_world(br_pointer, mapping);
                    let back = Rect::new(tl.x, tl.y, br.x - tl.x, br.y - tl.y);
                    assert!((back.x - rect.x).abs() < EPS, "{back:?} vs {rect:?}");
                    assert!((back.y - rect.y).abs() < EPS, "{back:?} vs {rect:?}");
                    assert!((back.w - rect.w).abs() < EPS, "{back:?} vs {rect:?}");
                    assert!((back.h - rect.h).abs() < EPS, "{back:?} vs {rect:?}");
                }
            }
        }
    }

    #[test]
    fn to_world_inverts_pointer_inside_viewport() {
        let p = projection(800.0, 800.0, 420.0);
        let world = p.to_world(Vec2::new(0.5, 0.25), Mapping::CameraRelative).unwrap();
        assert_close(world, Vec2::new(420.0 + 540.0, 270.0));
        let back = Projection::ndc_to_pointer(p.point_to_ndc(world, Mapping::CameraRelative));
        assert_close(back, Vec2::new(0.5, 0.25));
    }

    #[test]
    fn to_world_rejects_bad_pointer() {
        let p = projection(800.0, 800.0, 0.0);
        for bad in [
            Vec2::new(f32::NAN, 0.5),
            Vec2::new(0.5, f32::INFINITY),
            Vec2::new(-0.01, 0.5),
            Vec2::new(0.5, 1.01),
        ] {
            assert!(matches!(
                p.to_world(bad, Mapping::CameraRelative),
                Err(SceneError::InvalidInput(_))
            ));
        }
    }
}
