use parallax_common::{SceneError, WorldSize};
use serde::{Deserialize, Serialize};

/// Uniform "cover" fit of the world into the viewport.
///
/// `scale = max(W/Bw, H/Bh)`, so the world fills both axes and the larger
/// fitting axis is cropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverScale {
    /// Viewport pixels per world unit.
    pub scale: f32,
    /// Visible world width.
    pub view_width: f32,
    /// Visible world height.
    pub view_height: f32,
}

impl CoverScale {
    pub fn compute(width: f32, height: f32, world: WorldSize) -> Self {
        let scale = (width / world.width).max(height / world.height);
        Self {
            scale,
            view_width: width / scale,
            view_height: height / scale,
        }
    }
}

/// Viewport pixel dimensions and the cover scale derived from them.
///
/// Scale fields stay unset until a world size is known; mapping requests
/// made before that are `NotReady`.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportState {
    width: f32,
    height: f32,
    device_pixel_ratio: f32,
    backing_width: u32,
    backing_height: u32,
    world: Option<WorldSize>,
    cover: Option<CoverScale>,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            device_pixel_ratio: 1.0,
            backing_width: 1280,
            backing_height: 720,
            world: None,
            cover: None,
        }
    }
}

impl ViewportState {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Result<Self, SceneError> {
        let mut viewport = Self::default();
        viewport.resize(width, height, device_pixel_ratio)?;
        Ok(viewport)
    }

    /// Apply new viewport dimensions. Dimensions below one pixel clamp to one.
    ///
    /// Returns whether anything changed; repeating a resize is a no-op.
    pub fn resize(
        &mut self,
        width: f32,
        height: f32,
        device_pixel_ratio: f32,
    ) -> Result<bool, SceneError> {
        if !(width.is_finite() && height.is_finite() && device_pixel_ratio.is_finite()) {
            return Err(SceneError::invalid_input(format!(
                "viewport dimensions must be finite, got {width}x{height}@{device_pixel_ratio}"
            )));
        }
        if device_pixel_ratio <= 0.0 {
            return Err(SceneError::invalid_input(format!(
                "device pixel ratio must be positive, got {device_pixel_ratio}"
            )));
        }

        let width = width.max(1.0);
        let height = height.max(1.0);
        let backing_width = ((width * device_pixel_ratio).floor() as u32).max(1);
        let backing_height = ((height * device_pixel_ratio).floor() as u32).max(1);

        let changed = width != self.width
            || height != self.height
            || device_pixel_ratio != self.device_pixel_ratio
            || self.backing_width != backing_width
            || self.backing_height != backing_height;

        self.width = width;
        self.height = height;
        self.device_pixel_ratio = device_pixel_ratio;
        self.backing_width = backing_width;
        self.backing_height = backing_height;
        self.recompute();

        if changed {
            tracing::debug!(
                width,
                height,
                device_pixel_ratio,
                backing_width,
                backing_height,
                "viewport resized"
            );
        }
        Ok(changed)
    }

    /// Establish (or replace) the world the viewport covers.
    pub fn set_world(&mut self, world: WorldSize) {
        self.world = Some(world);
        self.recompute();
    }

    fn recompute(&mut self) {
        self.cover = self
            .world
            .map(|world| CoverScale::compute(self.width, self.height, world));
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    /// Backing-store size in physical pixels: `max(1, floor(W * dpr))` per axis.
    pub fn backing_size(&self) -> (u32, u32) {
        (self.backing_width, self.backing_height)
    }

    pub fn world(&self) -> Option<WorldSize> {
        self.world
    }

    pub fn is_ready(&self) -> bool {
        self.cover.is_some()
    }

    pub fn cover(&self) -> Result<CoverScale, SceneError> {
        self.cover.ok_or(SceneError::NotReady)
    }

    /// Furthest the camera may pan: `max(0, Bw - viewWorldWidth)`, optionally
    /// bounded to a fraction of the background width. Zero before a world exists.
    pub fn max_scroll(&self, max_parallax_fraction: Option<f32>) -> f32 {
        let (Some(world), Some(cover)) = (self.world, self.cover) else {
            return 0.0;
        };
        let overflow = (world.width - cover.view_width).max(0.0);
        match max_parallax_fraction {
            Some(fraction) => overflow.min(fraction * world.width),
            None => overflow,
        }
    }
}
