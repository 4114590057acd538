//! Loading and saving sprites
//!
//! Kept apart from the transform so the pipeline itself never touches the
//! filesystem.

use std::io::Cursor;
use std::path::Path;

use image::error::{ImageFormatHint, UnsupportedError, UnsupportedErrorKind};
use image::{DynamicImage, ExtendedColorType, ImageError, ImageFormat, RgbaImage};

use crate::SpriteError;

/// Load an image without converting it, keeping its original color type.
pub fn open_image(path: impl AsRef<Path>) -> Result<DynamicImage, SpriteError> {
    let bytes = std::fs::read(path)?;
    image::load_from_memory(&bytes).map_err(SpriteError::Decode)
}

/// Decode sprite bytes in any supported raster format into RGBA8.
pub fn decode_sprite(bytes: &[u8]) -> Result<RgbaImage, SpriteError> {
    let img = image::load_from_memory(bytes).map_err(SpriteError::Decode)?;
    Ok(img.into_rgba8())
}

/// Load a sprite from a file path.
pub fn load_sprite(path: impl AsRef<Path>) -> Result<RgbaImage, SpriteError> {
    let bytes = std::fs::read(path)?;
    decode_sprite(&bytes)
}

/// Whether `format` stores an alpha channel when written as RGBA8.
pub fn keeps_alpha(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Png
            | ImageFormat::Gif
            | ImageFormat::WebP
            | ImageFormat::Tiff
            | ImageFormat::Tga
            | ImageFormat::Bmp
            | ImageFormat::Ico
            | ImageFormat::Qoi
            | ImageFormat::Farbfeld
    )
}

/// Encode a sprite into an in-memory buffer.
///
/// Formats that would drop the alpha channel (JPEG, PNM, ...) are rejected
/// with [`SpriteError::Encode`] instead of flattening the background.
pub fn encode_sprite(image: &RgbaImage, format: ImageFormat) -> Result<Vec<u8>, SpriteError> {
    if !keeps_alpha(format) {
        return Err(SpriteError::Encode(ImageError::Unsupported(
            UnsupportedError::from_format_and_kind(
                ImageFormatHint::Exact(format),
                UnsupportedErrorKind::Color(ExtendedColorType::Rgba8),
            ),
        )));
    }

    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, format).map_err(SpriteError::Encode)?;
    Ok(buf.into_inner())
}

/// Save a sprite, choosing the format from the file extension (PNG when the
/// extension is missing or unknown). See [`keeps_alpha`] for the formats
/// accepted.
///
/// The image is fully encoded before the file is opened, so a failed encode
/// leaves any existing file untouched.
pub fn save_sprite(image: &RgbaImage, path: impl AsRef<Path>) -> Result<(), SpriteError> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);
    let bytes = encode_sprite(image, format)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}
