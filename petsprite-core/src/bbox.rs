//! Bounding box of visible pixels and cropping

use image::{imageops, RgbaImage};

/// Minimal rectangle containing every pixel with alpha > 0.
///
/// `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl BoundingBox {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    /// True when the box covers the whole `width` x `height` image.
    pub fn covers(&self, width: u32, height: u32) -> bool {
        self.left == 0 && self.top == 0 && self.right == width && self.bottom == height
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {}, {})", self.left, self.top, self.right, self.bottom)
    }
}

/// Compute the bounding box of non-transparent pixels, or `None` when every
/// pixel has alpha 0.
pub fn bounding_box(image: &RgbaImage) -> Option<BoundingBox> {
    let mut found: Option<BoundingBox> = None;

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel.0[3] == 0 {
            continue;
        }
        found = Some(match found {
            None => BoundingBox {
                left: x,
                top: y,
                right: x + 1,
                bottom: y + 1,
            },
            Some(b) => BoundingBox {
                left: b.left.min(x),
                top: b.top.min(y),
                right: b.right.max(x + 1),
                bottom: b.bottom.max(y + 1),
            },
        });
    }

    found
}

/// Copy the region under `bbox` out of `image`.
pub fn crop_to(image: &RgbaImage, bbox: BoundingBox) -> RgbaImage {
    imageops::crop_imm(image, bbox.left, bbox.top, bbox.width(), bbox.height()).to_image()
}
