use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Element not found: {0}")]
    MissingElement(String),

    #[error("Degenerate geometry: scrollable extent {extent} is not positive")]
    DegenerateGeometry { extent: f64 },

    #[error("Asset load failed: {0}")]
    AssetLoad(String),

    #[error("Media playback rejected: {0}")]
    MediaPlay(String),

    #[error("Invalid timeline: {0}")]
    InvalidTimeline(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
