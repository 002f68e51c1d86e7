//! Error types for rnvisual

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisualError {
    #[error("Screenshot not found: {0}")]
    ScreenshotNotFound(String),

    #[error("Baseline not found: {0}")]
    BaselineNotFound(String),

    #[error("Invalid raster: {0}")]
    InvalidRaster(String),

    #[error("Invalid region '{input}': {reason}")]
    InvalidRegion { input: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Comparison task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type VisualResult<T> = Result<T, VisualError>;
