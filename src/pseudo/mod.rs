//! Pseudo-color palettes and the five-color mapper.
//!
//! A [`PseudoColorConfig`] holds exactly five control colors and a smoothness
//! factor. The colors split `[0, 1]` into four bands of width 0.25; see
//! [`mapper`] for the per-pixel transfer function.

pub mod mapper;

pub use mapper::{map, map_luma, map_with, mix, smoothstep, Band, ProcessingMode};

use std::fs;
use std::path::Path;

use bytemuck::{Pod, Zeroable};
use glam::Vec4;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of control colors in a palette.
pub const COLOR_COUNT: usize = 5;

#[derive(Error, Debug, PartialEq)]
pub enum PseudoColorError {
    #[error("Field must be non-empty, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("Palette needs exactly 5 colors, got {0}")]
    InvalidColorCount(usize),
    #[error("Invalid color '{0}', expected 0xRRGGBB")]
    InvalidHexColor(String),
    #[error("Cannot read palette: {0}")]
    Palette(String),
    #[error("Cannot build thread pool: {0}")]
    ThreadPool(String),
}

/// RGBA color with float channels, conventionally in `[0, 1]`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const MAGENTA: Self = Self::rgb(1.0, 0.0, 1.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const CYAN: Self = Self::rgb(0.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Opaque color from `0xRRGGBB`.
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| ((hex >> shift) & 0xFF) as f32 / 255.0;
        Self::rgb(channel(16), channel(8), channel(0))
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.r, self.g, self.b, self.a)
    }

    pub fn from_vec4(v: Vec4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl From<[f32; 4]> for Color {
    fn from(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }
}

impl From<Color> for [f32; 4] {
    fn from(c: Color) -> Self {
        c.to_array()
    }
}

/// Five control colors plus the linear/smoothstep balance.
///
/// `smoothness = 0.0` gives pure linear interpolation within each band,
/// `1.0` gives pure smoothstep. Values outside `[0, 1]` are accepted and
/// extrapolate between the two curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PseudoColorConfig {
    colors: [Color; COLOR_COUNT],
    smoothness: f32,
}

impl PseudoColorConfig {
    /// Build a config from a slice of colors.
    ///
    /// # Example
    ///
    /// ```
    /// use depthcam::pseudo::{Color, PseudoColorConfig, PseudoColorError};
    ///
    /// let four = [Color::BLUE; 4];
    /// assert_eq!(
    ///     PseudoColorConfig::new(&four, 0.5),
    ///     Err(PseudoColorError::InvalidColorCount(4))
    /// );
    /// ```
    pub fn new(colors: &[Color], smoothness: f32) -> Result<Self, PseudoColorError> {
        let colors: [Color; COLOR_COUNT] = colors
            .try_into()
            .map_err(|_| PseudoColorError::InvalidColorCount(colors.len()))?;
        Ok(Self::from_colors(colors, smoothness))
    }

    pub const fn from_colors(colors: [Color; COLOR_COUNT], smoothness: f32) -> Self {
        Self { colors, smoothness }
    }

    pub fn with_smoothness(self, smoothness: f32) -> Self {
        Self { smoothness, ..self }
    }

    pub fn colors(&self) -> &[Color; COLOR_COUNT] {
        &self.colors
    }

    /// Control color `index`, `0..5`.
    pub fn color(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    pub fn smoothness(&self) -> f32 {
        self.smoothness
    }
}

impl Default for PseudoColorConfig {
    /// Magenta, blue, green, magenta, cyan with smoothness 0.5.
    fn default() -> Self {
        Self::from_colors(
            [
                Color::MAGENTA,
                Color::BLUE,
                Color::GREEN,
                Color::MAGENTA,
                Color::CYAN,
            ],
            0.5,
        )
    }
}

/// Parse a comma-separated list like `0xFF00FF,0x0000FF,...`.
///
/// The `0x` prefix is optional. Count is not checked here; pass the result to
/// [`PseudoColorConfig::new`].
pub fn parse_hex_palette(s: &str) -> Result<Vec<Color>, PseudoColorError> {
    s.split(',')
        .map(|entry| {
            let entry = entry.trim();
            let digits = entry
                .strip_prefix("0x")
                .or_else(|| entry.strip_prefix("0X"))
                .or_else(|| entry.strip_prefix('#'))
                .unwrap_or(entry);
            if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(PseudoColorError::InvalidHexColor(entry.to_string()));
            }
            u32::from_str_radix(digits, 16)
                .map(Color::from_hex)
                .map_err(|_| PseudoColorError::InvalidHexColor(entry.to_string()))
        })
        .collect()
}

/// On-disk palette, e.g. `{"colors": [[1,0,1,1], ...], "smoothness": 0.5}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteFile {
    pub colors: Vec<Color>,
    #[serde(default)]
    pub smoothness: Option<f32>,
}

impl PaletteFile {
    pub fn into_config(self) -> Result<PseudoColorConfig, PseudoColorError> {
        let smoothness = self
            .smoothness
            .unwrap_or(PseudoColorConfig::default().smoothness());
        PseudoColorConfig::new(&self.colors, smoothness)
    }
}

impl From<&PseudoColorConfig> for PaletteFile {
    fn from(config: &PseudoColorConfig) -> Self {
        Self {
            colors: config.colors.to_vec(),
            smoothness: Some(config.smoothness),
        }
    }
}

/// Load and validate a JSON palette file.
pub fn load_palette<P: AsRef<Path>>(path: P) -> Result<PseudoColorConfig, PseudoColorError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| PseudoColorError::Palette(format!("{}: {}", path.display(), e)))?;
    let file: PaletteFile = serde_json::from_str(&content)
        .map_err(|e| PseudoColorError::Palette(format!("{}: {}", path.display(), e)))?;
    file.into_config()
}
