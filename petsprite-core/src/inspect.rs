//! Quick diagnostics for a sprite before or after normalization

use std::fmt;

use image::{ColorType, DynamicImage, GenericImageView, Rgba};

use crate::bbox::{bounding_box, BoundingBox};

/// Channel level above which an opaque pixel counts as "white-ish".
pub const WHITISH_LEVEL: u8 = 240;

/// Summary of a sprite's shape and leftover background.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteReport {
    pub color_type: ColorType,
    pub width: u32,
    pub height: u32,
    /// Top-left, top-right, bottom-left, bottom-right.
    pub corners: [Rgba<u8>; 4],
    /// Opaque pixels with every color channel above [`WHITISH_LEVEL`].
    pub opaque_whitish: usize,
    pub total_pixels: usize,
    pub bbox: Option<BoundingBox>,
}

impl SpriteReport {
    /// Whether all four corners are already fully transparent.
    pub fn corners_transparent(&self) -> bool {
        self.corners.iter().all(|p| p.0[3] == 0)
    }
}

/// Build a [`SpriteReport`] for `image`.
pub fn inspect(image: &DynamicImage) -> SpriteReport {
    let rgba = image.to_rgba8();
    let (width, height) = image.dimensions();
    let (right, bottom) = (width.saturating_sub(1), height.saturating_sub(1));

    let corners = if width == 0 || height == 0 {
        [Rgba([0, 0, 0, 0]); 4]
    } else {
        [
            *rgba.get_pixel(0, 0),
            *rgba.get_pixel(right, 0),
            *rgba.get_pixel(0, bottom),
            *rgba.get_pixel(right, bottom),
        ]
    };

    let opaque_whitish = rgba
        .pixels()
        .filter(|p| {
            let [r, g, b, a] = p.0;
            a > 0 && r > WHITISH_LEVEL && g > WHITISH_LEVEL && b > WHITISH_LEVEL
        })
        .count();

    SpriteReport {
        color_type: image.color(),
        width,
        height,
        corners,
        opaque_whitish,
        total_pixels: width as usize * height as usize,
        bbox: bounding_box(&rgba),
    }
}

impl fmt::Display for SpriteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Mode: {:?}", self.color_type)?;
        writeln!(f, "  Size: {}x{}", self.width, self.height)?;
        writeln!(f, "  Corner Pixels:")?;

        let (right, bottom) = (self.width.saturating_sub(1), self.height.saturating_sub(1));
        let positions = [(0, 0), (right, 0), (0, bottom), (right, bottom)];
        for ((x, y), pixel) in positions.iter().zip(self.corners.iter()) {
            writeln!(f, "    ({}, {}): {:?}", x, y, pixel.0)?;
        }

        writeln!(
            f,
            "  Opaque White-ish Pixels: {} / {}",
            self.opaque_whitish, self.total_pixels
        )?;
        match self.bbox {
            Some(bbox) => write!(f, "  Bounding Box: {}", bbox),
            None => write!(f, "  Bounding Box: none (fully transparent)"),
        }
    }
}
