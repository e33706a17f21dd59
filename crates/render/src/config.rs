use std::path::Path;

use parallax_common::SceneError;
use parallax_particles::EmitterConfig;
use parallax_view::{DEFAULT_DAMPING, Mapping};
use serde::{Deserialize, Serialize};

/// How sprites and particles relate to the camera pan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionPolicy {
    /// The camera pans over a world larger than the viewport; background,
    /// sprites and particles share that world frame and pan together.
    #[default]
    SharedWorldFrame,
    /// Only the background pans; sprites and particles are fixed to the viewport.
    ScreenFixedSprites,
}

impl CompositionPolicy {
    pub fn background_mapping(self) -> Mapping {
        Mapping::CameraRelative
    }

    /// Mapping for sprites and particles, used both for drawing and picking.
    pub fn overlay_mapping(self) -> Mapping {
        match self {
            Self::SharedWorldFrame => Mapping::CameraRelative,
            Self::ScreenFixedSprites => Mapping::ViewportFixed,
        }
    }
}

/// Errors from loading a scene configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] SceneError),
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Scene tuning. Every field has a default, so partial files are fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Camera smoothing factor in `(0, 1]`.
    pub damping: f32,
    /// Optional bound on the pan range as a fraction of background width.
    pub max_parallax_fraction: Option<f32>,
    pub composition: CompositionPolicy,
    pub smoke: EmitterConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            max_parallax_fraction: None,
            composition: CompositionPolicy::default(),
            smoke: EmitterConfig::default(),
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> Result<(), SceneError> {
        if !self.damping.is_finite() || self.damping <= 0.0 || self.damping > 1.0 {
            return Err(SceneError::InvalidConfig(format!(
                "damping must be in (0, 1], got {}",
                self.damping
            )));
        }
        if let Some(fraction) = self.max_parallax_fraction {
            if !fraction.is_finite() || fraction < 0.0 {
                return Err(SceneError::InvalidConfig(format!(
                    "max_parallax_fraction must be non-negative, got {fraction}"
                )));
            }
        }
        self.smoke.validate()
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.yaml`/`.yml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&data),
            Some("json") => Self::from_json_str(&data),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
