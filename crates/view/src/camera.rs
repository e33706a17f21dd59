use parallax_common::SceneError;

/// Default smoothing factor: roughly 8% of the remaining distance per tick.
pub const DEFAULT_DAMPING: f32 = 0.08;

/// Horizontal parallax camera with exponentially damped motion.
///
/// The offset is measured in world units from the left edge of the
/// background. Each tick closes a fixed fraction (`damping`) of the gap to
/// the target, so the error decays geometrically and never overshoots.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    offset: f32,
    target: f32,
    damping: f32,
    max_scroll: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: 0.0,
            target: 0.0,
            damping: DEFAULT_DAMPING,
            max_scroll: 0.0,
        }
    }
}

impl Camera {
    /// Create a camera at offset zero. `damping` must lie in `(0, 1]`.
    pub fn new(damping: f32) -> Result<Self, SceneError> {
        if !damping.is_finite() || damping <= 0.0 || damping > 1.0 {
            return Err(SceneError::InvalidConfig(format!(
                "damping must be in (0, 1], got {damping}"
            )));
        }
        Ok(Self {
            damping,
            ..Self::default()
        })
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn damping(&self) -> f32 {
        self.damping
    }

    pub fn max_scroll(&self) -> f32 {
        self.max_scroll
    }

    /// Store a new target clamped to `[0, max_scroll]`. Returns the stored value.
    ///
    /// Non-finite targets are rejected and the previous target is kept.
    pub fn set_target(&mut self, value: f32) -> Result<f32, SceneError> {
        if !value.is_finite() {
            return Err(SceneError::invalid_input(format!(
                "camera target must be finite, got {value}"
            )));
        }
        self.target = value.clamp(0.0, self.max_scroll);
        Ok(self.target)
    }

    /// Update the pan bound and re-clamp both the target and the current offset.
    pub fn set_max_scroll(&mut self, max_scroll: f32) {
        self.max_scroll = max_scroll.max(0.0);
        self.target = self.target.clamp(0.0, self.max_scroll);
        self.offset = self.offset.clamp(0.0, self.max_scroll);
    }

    /// Place offset and target at the middle of the pan range.
    pub fn center(&mut self) {
        self.offset = self.max_scroll * 0.5;
        self.target = self.offset;
    }

    /// Advance one step: `offset += (target - offset) * damping`.
    pub fn tick(&mut self) -> f32 {
        self.offset += (self.target - self.offset) * self.damping;
        self.offset
    }
}
