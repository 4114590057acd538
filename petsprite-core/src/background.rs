//! Background removal passes
//!
//! Every pass rewrites matched pixels to [`TRANSPARENT`] and returns how many
//! pixels it changed, so callers can log what each pass actually did.

use std::collections::VecDeque;

use image::{Rgba, RgbaImage};

/// The canonical cleared pixel.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Clear every pixel whose alpha is below `threshold`.
///
/// A threshold of 0 is a no-op; 255 keeps only fully opaque pixels.
pub fn alpha_cleanup(image: &mut RgbaImage, threshold: u8) -> usize {
    let mut cleared = 0;
    for pixel in image.pixels_mut() {
        if pixel.0[3] < threshold && *pixel != TRANSPARENT {
            *pixel = TRANSPARENT;
            cleared += 1;
        }
    }
    cleared
}

/// Clear every pixel whose red, green and blue channels are all below `threshold`.
///
/// Alpha is not consulted, so a near-black opaque backdrop is keyed out.
pub fn color_key(image: &mut RgbaImage, threshold: u8) -> usize {
    let mut cleared = 0;
    for pixel in image.pixels_mut() {
        let [r, g, b, _] = pixel.0;
        if r < threshold && g < threshold && b < threshold && *pixel != TRANSPARENT {
            *pixel = TRANSPARENT;
            cleared += 1;
        }
    }
    cleared
}

/// Sum of absolute per-channel differences, alpha included.
pub fn color_distance(a: Rgba<u8>, b: Rgba<u8>) -> u32 {
    a.0.iter()
        .zip(b.0.iter())
        .map(|(&x, &y)| (x as i32 - y as i32).unsigned_abs())
        .sum()
}

/// Flood the 4-connected region around `seed` whose colors lie within
/// `tolerance` of the seed color, clearing it to transparent.
///
/// The seed is skipped when it is already within `tolerance` of transparent,
/// which makes repeated fills from an already cleared corner a no-op.
/// Out-of-bounds seeds are ignored.
pub fn flood_fill(image: &mut RgbaImage, seed: (u32, u32), tolerance: u32) -> usize {
    let (width, height) = image.dimensions();
    let (sx, sy) = seed;
    if sx >= width || sy >= height {
        return 0;
    }

    let seed_color = *image.get_pixel(sx, sy);
    if color_distance(seed_color, TRANSPARENT) <= tolerance {
        return 0;
    }

    let index = |x: u32, y: u32| (y as usize) * (width as usize) + x as usize;
    let mut visited = vec![false; width as usize * height as usize];
    let mut queue = VecDeque::new();

    visited[index(sx, sy)] = true;
    queue.push_back((sx, sy));

    let mut filled = 0;
    while let Some((x, y)) = queue.pop_front() {
        image.put_pixel(x, y, TRANSPARENT);
        filled += 1;

        let neighbors = [
            (x.checked_sub(1), Some(y)),
            (x.checked_add(1).filter(|&nx| nx < width), Some(y)),
            (Some(x), y.checked_sub(1)),
            (Some(x), y.checked_add(1).filter(|&ny| ny < height)),
        ];

        for (nx, ny) in neighbors {
            let (Some(nx), Some(ny)) = (nx, ny) else {
                continue;
            };
            let i = index(nx, ny);
            if visited[i] {
                continue;
            }
            if color_distance(*image.get_pixel(nx, ny), seed_color) <= tolerance {
                visited[i] = true;
                queue.push_back((nx, ny));
            }
        }
    }

    filled
}

/// Flood fill from the four corners in order: top-left, top-right,
/// bottom-left, bottom-right.
///
/// Each corner is seeded with its own color, so a background with a
/// gradient or different corner tints is still removed.
pub fn flood_fill_corners(image: &mut RgbaImage, tolerance: u32) -> usize {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return 0;
    }
    let (right, bottom) = (width - 1, height - 1);

    [(0, 0), (right, 0), (0, bottom), (right, bottom)]
        .into_iter()
        .map(|corner| flood_fill(image, corner, tolerance))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const RED: Rgba<u8> = Rgba([200, 30, 30, 255]);

    #[test]
    fn test_alpha_cleanup_threshold() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([10, 20, 30, 49]));
        img.put_pixel(1, 0, Rgba([10, 20, 30, 50]));

        assert_eq!(alpha_cleanup(&mut img, 50), 1);
        assert_eq!(*img.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*img.get_pixel(1, 0), Rgba([10, 20, 30, 50]));
    }

    #[test]
    fn test_alpha_cleanup_zero_is_noop() {
        let mut img = RgbaImage::from_pixel(3, 3, Rgba([1, 2, 3, 0]));
        assert_eq!(alpha_cleanup(&mut img, 0), 0);
        assert_eq!(*img.get_pixel(1, 1), Rgba([1, 2, 3, 0]));
    }

    #[test]
    fn test_alpha_cleanup_hard_cut() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([90, 90, 90, 254]));
        img.put_pixel(1, 0, RED);

        assert_eq!(alpha_cleanup(&mut img, 255), 1);
        assert_eq!(*img.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*img.get_pixel(1, 0), RED);
    }

    #[test]
    fn test_color_key_clears_dark_pixels_only() {
        let mut img = RgbaImage::from_pixel(3, 1, Rgba([9, 9, 9, 255]));
        img.put_pixel(1, 0, Rgba([9, 10, 9, 255]));
        img.put_pixel(2, 0, RED);

        assert_eq!(color_key(&mut img, 10), 1);
        assert_eq!(*img.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*img.get_pixel(1, 0), Rgba([9, 10, 9, 255]));
        assert_eq!(*img.get_pixel(2, 0), RED);
    }

    #[test]
    fn test_color_key_is_idempotent() {
        let mut img = RgbaImage::from_pixel(4, 4, BLACK);
        img.put_pixel(2, 2, WHITE);

        assert_eq!(color_key(&mut img, 20), 15);
        assert_eq!(color_key(&mut img, 20), 0);
    }

    #[test]
    fn test_color_distance() {
        assert_eq!(color_distance(BLACK, BLACK), 0);
        assert_eq!(color_distance(BLACK, TRANSPARENT), 255);
        assert_eq!(color_distance(Rgba([10, 0, 5, 255]), Rgba([0, 10, 0, 250])), 30);
    }

    #[test]
    fn test_flood_fill_stops_at_tolerance() {
        // White background with a red bar splitting it in two.
        let mut img = RgbaImage::from_pixel(5, 3, WHITE);
        for y in 0..3 {
            img.put_pixel(2, y, RED);
        }

        let filled = flood_fill(&mut img, (0, 0), 50);
        assert_eq!(filled, 6);
        assert_eq!(*img.get_pixel(1, 2), TRANSPARENT);
        assert_eq!(*img.get_pixel(2, 1), RED);
        assert_eq!(*img.get_pixel(4, 0), WHITE);
    }

    #[test]
    fn test_flood_fill_absorbs_compression_noise() {
        let mut img = RgbaImage::from_pixel(4, 4, WHITE);
        img.put_pixel(1, 1, Rgba([240, 245, 250, 255]));

        assert_eq!(flood_fill(&mut img, (0, 0), 50), 16);
    }

    #[test]
    fn test_flood_fill_skips_transparent_seed() {
        let mut img = RgbaImage::from_pixel(3, 3, WHITE);
        img.put_pixel(0, 0, TRANSPARENT);

        assert_eq!(flood_fill(&mut img, (0, 0), 50), 0);
        assert_eq!(*img.get_pixel(1, 0), WHITE);
    }

    #[test]
    fn test_flood_fill_out_of_bounds_seed() {
        let mut img = RgbaImage::from_pixel(2, 2, WHITE);
        assert_eq!(flood_fill(&mut img, (5, 0), 50), 0);
    }

    #[test]
    fn test_flood_fill_corners_leaves_enclosed_region() {
        // White frame, red ring, white interior not connected to any corner.
        let mut img = RgbaImage::from_pixel(7, 7, WHITE);
        for i in 1..6 {
            img.put_pixel(i, 1, RED);
            img.put_pixel(i, 5, RED);
            img.put_pixel(1, i, RED);
            img.put_pixel(5, i, RED);
        }

        let filled = flood_fill_corners(&mut img, 50);
        assert_eq!(filled, 24);
        assert_eq!(*img.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*img.get_pixel(6, 6), TRANSPARENT);
        assert_eq!(*img.get_pixel(3, 3), WHITE);
        assert_eq!(*img.get_pixel(1, 1), RED);
    }

    #[test]
    fn test_flood_fill_corners_uses_each_corner_color() {
        // Left half white, right half light grey: two separate backgrounds.
        let grey = Rgba([180, 180, 180, 255]);
        let mut img = RgbaImage::from_pixel(6, 2, WHITE);
        for y in 0..2 {
            for x in 3..6 {
                img.put_pixel(x, y, grey);
            }
        }

        assert_eq!(flood_fill_corners(&mut img, 10), 12);
        assert!(img.pixels().all(|p| *p == TRANSPARENT));
    }

    #[test]
    fn test_flood_fill_single_pixel_image() {
        let mut img = RgbaImage::from_pixel(1, 1, WHITE);
        assert_eq!(flood_fill_corners(&mut img, 0), 1);
        assert_eq!(*img.get_pixel(0, 0), TRANSPARENT);
    }
}
