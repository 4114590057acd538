//! Aspect-preserving nearest-neighbor resize

use image::{imageops, imageops::FilterType, RgbaImage};

use crate::SpriteError;

/// Width that keeps the aspect ratio of a `width` x `height` image scaled to
/// `target_height`: `round(width * target_height / height)`, halves rounding up.
///
/// Returns 0 for a zero `height`.
pub fn scaled_width(width: u32, height: u32, target_height: u32) -> u32 {
    if height == 0 {
        return 0;
    }
    let numerator = 2 * width as u64 * target_height as u64 + height as u64;
    let denominator = 2 * height as u64;
    u32::try_from(numerator / denominator).unwrap_or(u32::MAX)
}

/// Resize `image` to exactly `target_height` rows, width derived with
/// [`scaled_width`], sampling nearest-neighbor so no new colors appear.
pub fn resize_to_height(image: &RgbaImage, target_height: u32) -> Result<RgbaImage, SpriteError> {
    let (width, height) = image.dimensions();
    let target_width = scaled_width(width, height, target_height);

    if target_height == 0 || target_width == 0 {
        return Err(SpriteError::DegenerateSize {
            width: target_width,
            height: target_height,
        });
    }

    if (target_width, target_height) == (width, height) {
        return Ok(image.clone());
    }

    log::debug!(
        "Resize: {}x{} -> {}x{} (nearest)",
        width,
        height,
        target_width,
        target_height
    );

    Ok(imageops::resize(image, target_width, target_height, FilterType::Nearest))
}
