/// Error kinds shared by every core component.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    /// World-relative work was requested before a background established the world.
    #[error("scene not ready: no background has been set")]
    NotReady,
    /// A non-finite or out-of-range value was rejected; prior state is retained.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A drawable has no texture handle yet.
    #[error("missing texture: {0}")]
    MissingTexture(String),
    /// A configuration value failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl SceneError {
    pub fn invalid_input(what: impl Into<String>) -> Self {
        Self::InvalidInput(what.into())
    }
}
