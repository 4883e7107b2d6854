/// Convenience result type used across panostitch.
pub type PanoResult<T> = Result<T, PanoError>;

/// Top-level error taxonomy used by stitching APIs.
#[derive(thiserror::Error, Debug)]
pub enum PanoError {
    /// The scene description could not be read, parsed or validated.
    #[error("scene load error: {0}")]
    SceneLoad(String),

    /// No view in the scene has both a pose and an intrinsic resolved.
    #[error("no valid cameras: no view has both a pose and an intrinsic")]
    NoValidCameras,

    /// Invalid stitching options (rejected before the canvas is allocated).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A source image could not be decoded. Recoverable per view.
    #[error("image read error: {0}")]
    ImageRead(String),

    /// The panorama could not be encoded or written.
    #[error("image write error: {0}")]
    ImageWrite(String),

    /// Every valid view was skipped, so the canvas holds no contribution.
    #[error("no view could be composited onto the panorama")]
    NothingComposited,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PanoError {
    /// Build a [`PanoError::SceneLoad`] value.
    pub fn scene_load(msg: impl Into<String>) -> Self {
        Self::SceneLoad(msg.into())
    }

    /// Build a [`PanoError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`PanoError::ImageRead`] value.
    pub fn image_read(msg: impl Into<String>) -> Self {
        Self::ImageRead(msg.into())
    }

    /// Build a [`PanoError::ImageWrite`] value.
    pub fn image_write(msg: impl Into<String>) -> Self {
        Self::ImageWrite(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
