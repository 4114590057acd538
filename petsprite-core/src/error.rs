//! Error type shared by every stage of the sprite pipeline

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpriteError {
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Background removal left no opaque pixels")]
    EmptyResult,
    /// `width` is 0 when `height` is 0; no width is derived for a zero height.
    #[error("Degenerate output size {width}x{height}")]
    DegenerateSize { width: u32, height: u32 },
}

impl SpriteError {
    /// Short machine-friendly name of the failure kind, used in batch summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode",
            Self::Encode(_) => "encode",
            Self::Io(_) => "io",
            Self::EmptyResult => "empty",
            Self::DegenerateSize { .. } => "degenerate-size",
        }
    }
}
