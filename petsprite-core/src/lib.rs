//! # petsprite-core
//!
//! Normalizes raw pet sprites into crisp, trimmed pixel-art icons.
//!
//! ## Features
//! - Alpha cleanup of semi-transparent noise (including the "hard cut")
//! - Color-key background removal for near-black backdrops
//! - Flood-fill background removal from the four corners
//! - Trim to the bounding box of opaque pixels
//! - Nearest-neighbor resize to a fixed height, aspect ratio preserved
//! - Load/save helpers and a quick inspection report
//!
//! ## Example
//!
//! ```no_run
//! use petsprite_core::{load_sprite, normalize, save_sprite, BackgroundMode, NormalizeOptions};
//!
//! fn main() -> Result<(), petsprite_core::SpriteError> {
//!     let raw = load_sprite("raw/cow.jpg")?;
//!
//!     let options = NormalizeOptions::default()
//!         .with_background(BackgroundMode::ColorKey)
//!         .with_key_threshold(20)
//!         .with_target_height(Some(64));
//!
//!     let sprite = normalize(&raw, &options)?;
//!     save_sprite(&sprite, "pixel_cow.png")
//! }
//! ```

pub mod background;
pub mod bbox;
mod error;
pub mod inspect;
mod io;
mod normalize;
mod options;
pub mod resize;

pub use background::{alpha_cleanup, color_distance, color_key, flood_fill, flood_fill_corners, TRANSPARENT};
pub use bbox::{bounding_box, crop_to, BoundingBox};
pub use error::SpriteError;
pub use inspect::{inspect, SpriteReport};
pub use io::{decode_sprite, encode_sprite, keeps_alpha, load_sprite, open_image, save_sprite};
pub use normalize::normalize;
pub use options::{BackgroundMode, NormalizeOptions};
pub use resize::{resize_to_height, scaled_width};

// Re-export commonly used types
pub use image::{ImageFormat, Rgba, RgbaImage};
