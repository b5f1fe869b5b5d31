use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("No reference image loaded")]
    NoImage,
}

pub type Result<T> = std::result::Result<T, ZoneError>;
