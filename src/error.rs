use thiserror::Error;

/// Failures the widget reports to its host.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RevealError {
    #[error("failed to load image asset `{url}`")]
    AssetLoadFailed { url: String },

    #[error("drawing surface unavailable: {0}")]
    DrawSurfaceUnavailable(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("image has zero width or height")]
    EmptyImage,

    #[error("dom error: {0}")]
    Dom(String),
}

pub type Result<T> = std::result::Result<T, RevealError>;
