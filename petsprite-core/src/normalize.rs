//! The sprite normalization pipeline
//!
//! Order is fixed: alpha cleanup, background removal, bounding box, crop,
//! resize. The input is borrowed, so on any error the caller still holds the
//! untouched original.
//!
//! Flood fill only runs on inputs without fully transparent pixels. A sprite
//! that already carries transparency has had its backdrop removed, and its
//! trimmed corners are content.

use image::RgbaImage;

use crate::background::{alpha_cleanup, color_key, flood_fill_corners};
use crate::bbox::{bounding_box, crop_to};
use crate::resize::resize_to_height;
use crate::{NormalizeOptions, SpriteError};

/// Produce a normalized sprite from `image`.
///
/// # Errors
/// - [`SpriteError::DegenerateSize`] when `target_height` is `Some(0)` or the
///   derived width rounds to 0.
/// - [`SpriteError::EmptyResult`] when nothing opaque survives background
///   removal.
pub fn normalize(image: &RgbaImage, options: &NormalizeOptions) -> Result<RgbaImage, SpriteError> {
    if options.target_height == Some(0) {
        return Err(SpriteError::DegenerateSize { width: 0, height: 0 });
    }

    let has_transparency = image.pixels().any(|p| p.0[3] == 0);
    let mut work = image.clone();

    let alpha_cleared = alpha_cleanup(&mut work, options.alpha_threshold);
    let flooded = if options.background.floods() && !has_transparency {
        flood_fill_corners(&mut work, options.flood_tolerance)
    } else {
        0
    };
    let keyed = if options.background.keys() {
        color_key(&mut work, options.key_threshold)
    } else {
        0
    };

    log::debug!(
        "Background ({}): alpha-cleared={}, flooded={}, keyed={}",
        options.background.as_str(),
        alpha_cleared,
        flooded,
        keyed
    );

    let bbox = bounding_box(&work).ok_or(SpriteError::EmptyResult)?;
    let cropped = if bbox.covers(work.width(), work.height()) {
        work
    } else {
        crop_to(&work, bbox)
    };

    let output = match options.target_height {
        Some(target_height) => resize_to_height(&cropped, target_height)?,
        None => cropped,
    };

    log::debug!(
        "Normalized {}x{} -> box {} -> {}x{}",
        image.width(),
        image.height(),
        bbox,
        output.width(),
        output.height()
    );

    Ok(output)
}
