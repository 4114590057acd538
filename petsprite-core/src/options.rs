//! Normalization options

use serde::Deserialize;

/// How background pixels are detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundMode {
    /// Every pixel darker than `key_threshold` on all three color channels.
    #[default]
    ColorKey,
    /// Region connected to one of the four corners, within `flood_tolerance`.
    FloodFill,
    /// Flood fill first, then color-key whatever dark pixels remain enclosed.
    FloodThenKey,
    /// Leave the background alone (trim and resize only).
    None,
}

impl BackgroundMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "color-key" | "colorkey" | "key" => Some(Self::ColorKey),
            "flood-fill" | "floodfill" | "flood" => Some(Self::FloodFill),
            "flood-then-key" | "both" => Some(Self::FloodThenKey),
            "none" | "off" => Some(Self::None),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ColorKey => "color-key",
            Self::FloodFill => "flood-fill",
            Self::FloodThenKey => "flood-then-key",
            Self::None => "none",
        }
    }

    pub(crate) fn floods(self) -> bool {
        matches!(self, Self::FloodFill | Self::FloodThenKey)
    }

    pub(crate) fn keys(self) -> bool {
        matches!(self, Self::ColorKey | Self::FloodThenKey)
    }
}

/// Parameters for [`normalize`](crate::normalize).
///
/// Resampling is always nearest-neighbor so pixel edges stay hard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Background detection strategy.
    pub background: BackgroundMode,
    /// Channel intensity below which a pixel is keyed out (color-key).
    pub key_threshold: u8,
    /// Maximum distance from the corner seed for the flood to spread.
    pub flood_tolerance: u32,
    /// Pixels with alpha below this are cleared first (0 disables).
    pub alpha_threshold: u8,
    /// Output height; `None` keeps the cropped size.
    pub target_height: Option<u32>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            background: BackgroundMode::ColorKey,
            key_threshold: 10,
            flood_tolerance: 50,
            alpha_threshold: 0,
            target_height: Some(64),
        }
    }
}

impl NormalizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background(mut self, background: BackgroundMode) -> Self {
        self.background = background;
        self
    }

    pub fn with_key_threshold(mut self, threshold: u8) -> Self {
        self.key_threshold = threshold;
        self
    }

    pub fn with_flood_tolerance(mut self, tolerance: u32) -> Self {
        self.flood_tolerance = tolerance;
        self
    }

    pub fn with_alpha_threshold(mut self, threshold: u8) -> Self {
        self.alpha_threshold = threshold;
        self
    }

    pub fn with_target_height(mut self, height: Option<u32>) -> Self {
        self.target_height = height;
        self
    }
}
