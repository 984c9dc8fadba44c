use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InpError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid puppet container: {0}")]
    InvalidContainer(String),

    #[error("puppet json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("texture decode: {0}")]
    Image(#[from] image::ImageError),

    #[error("unsupported texture format {0}")]
    UnsupportedTexture(u8),

    #[error("rendering context: {0}")]
    Context(String),

    #[error("engine used before init")]
    NotInitialized,
}

impl From<reqwest::Error> for InpError {
    fn from(err: reqwest::Error) -> Self {
        InpError::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, InpError>;
