//! Per-pixel pseudo-color transfer function.
//!
//! Each scalar value selects one of four bands:
//!
//! | luma            | low    | high   | edges       |
//! |-----------------|--------|--------|-------------|
//! | `< 0.25`        | color0 | color1 | 0.0 - 0.25  |
//! | `0.25 .. 0.5`   | color1 | color2 | 0.25 - 0.5  |
//! | `0.5 .. 0.75`   | color2 | color3 | 0.5 - 0.75  |
//! | otherwise       | color3 | color4 | 0.75 - 1.0  |
//!
//! Inside a band two candidates are computed: an unclamped linear mix that
//! overshoots outside the band, and a smoothstep mix that saturates at the
//! band's colors. The output blends them by the config's smoothness. Nothing
//! is clamped afterwards.

use glam::Vec4;
use rayon::prelude::*;

use super::{Color, PseudoColorConfig, PseudoColorError};
use crate::field::{RgbaField, ScalarField};

/// Width of each of the four bands.
pub const BAND_WIDTH: f32 = 0.25;

/// Rescales a band offset to `[0, 1]`; `1 / BAND_WIDTH`.
const BAND_SCALE: f32 = 4.0;

/// Hermite interpolation between `edge0` and `edge1`, clamped to `[0, 1]`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Linear interpolation `a + (b - a) * t`, unclamped.
pub fn mix(a: Vec4, b: Vec4, t: f32) -> Vec4 {
    a + (b - a) * t
}

/// Two adjacent control colors and the luma interval between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub low: Vec4,
    pub high: Vec4,
    pub edge0: f32,
    pub edge1: f32,
}

impl Band {
    /// Pick the band for `luma`. Edge values belong to the higher band;
    /// anything not below 0.75 (including NaN) lands in the last one.
    pub fn select(luma: f32, config: &PseudoColorConfig) -> Self {
        let index = if luma < 0.25 {
            0
        } else if luma < 0.5 {
            1
        } else if luma < 0.75 {
            2
        } else {
            3
        };
        let colors = config.colors();
        let edge0 = index as f32 * BAND_WIDTH;
        Self {
            low: colors[index].to_vec4(),
            high: colors[index + 1].to_vec4(),
            edge0,
            edge1: edge0 + BAND_WIDTH,
        }
    }

    /// Unclamped linear candidate. Reaches `high` exactly at `edge1`.
    pub fn linear(&self, luma: f32) -> Vec4 {
        mix(self.low, self.high, (luma - self.edge0) * BAND_SCALE)
    }

    /// Smoothstep candidate, always between `low` and `high`.
    pub fn smooth(&self, luma: f32) -> Vec4 {
        self.low + (self.high - self.low) * smoothstep(self.edge0, self.edge1, luma)
    }

    /// Blend of the two candidates.
    pub fn color(&self, luma: f32, smoothness: f32) -> Vec4 {
        let linear = self.linear(luma);
        let smooth = self.smooth(luma);
        mix(linear, smooth, smoothness)
    }
}

/// Map a single scalar value to a color.
pub fn map_luma(luma: f32, config: &PseudoColorConfig) -> Color {
    let band = Band::select(luma, config);
    Color::from_vec4(band.color(luma, config.smoothness()))
}

/// How [`map_with`] distributes rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingMode {
    /// Single-threaded
    Sequential,
    /// Rayon's global pool
    #[default]
    Parallel,
    /// Dedicated pool with the given number of threads
    ParallelWith(usize),
}

/// Map a whole field with the default processing mode.
///
/// # Example
///
/// ```
/// use depthcam::field::ScalarField;
/// use depthcam::pseudo::{map, PseudoColorConfig};
///
/// let field = ScalarField::new(2, 1, vec![0.0, 1.0]).unwrap();
/// let rgba = map(&field, &PseudoColorConfig::default()).unwrap();
/// assert_eq!((rgba.width(), rgba.height()), (2, 1));
/// ```
pub fn map(field: &ScalarField, config: &PseudoColorConfig) -> Result<RgbaField, PseudoColorError> {
    map_with(field, config, ProcessingMode::default())
}

/// Map a whole field. Every mode produces identical output.
pub fn map_with(
    field: &ScalarField,
    config: &PseudoColorConfig,
    mode: ProcessingMode,
) -> Result<RgbaField, PseudoColorError> {
    let (width, height) = (field.width(), field.height());
    if width == 0 || height == 0 {
        return Err(PseudoColorError::InvalidDimensions { width, height });
    }

    log::debug!(
        "mapping {}x{} field, smoothness {}, {:?}",
        width,
        height,
        config.smoothness(),
        mode
    );

    let mut pixels = vec![Color::default(); width * height];
    let map_row = |(src, dst): (&[f32], &mut [Color])| {
        for (&luma, out) in src.iter().zip(dst.iter_mut()) {
            *out = map_luma(luma, config);
        }
    };

    match mode {
        ProcessingMode::Sequential => {
            field
                .values()
                .chunks(width)
                .zip(pixels.chunks_mut(width))
                .for_each(map_row);
        }
        ProcessingMode::Parallel => {
            field
                .values()
                .par_chunks(width)
                .zip(pixels.par_chunks_mut(width))
                .for_each(map_row);
        }
        ProcessingMode::ParallelWith(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| PseudoColorError::ThreadPool(e.to_string()))?;
            pool.install(|| {
                field
                    .values()
                    .par_chunks(width)
                    .zip(pixels.par_chunks_mut(width))
                    .for_each(map_row);
            });
        }
    }

    Ok(RgbaField::from_pixels(width, height, pixels))
}
