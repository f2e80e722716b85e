//! Scalar and color grids.
//!
//! This module provides:
//! - [`ScalarField`] - Single-channel grid of luminance or depth values
//! - [`RgbaField`] - Grid of mapped colors with the same dimensions
//! - [`load_grid`] - Parser for whitespace-separated text grids
//! - [`extract`] - Luminance, contrast and depth normalization steps

pub mod extract;
pub mod loader;

pub use extract::{apply_contrast, auto_normalize, luminance, luminance_field, normalize_depth};
pub use loader::{load_grid, parse_grid, LoadError};

use thiserror::Error;

use crate::pseudo::Color;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FieldError {
    #[error("Field data has {actual} values, expected {expected}")]
    DataLengthMismatch { expected: usize, actual: usize },
    #[error("Field dimensions {width}x{height} overflow")]
    TooLarge { width: usize, height: usize },
}

/// Single-channel grid of normalized values.
///
/// Values are stored row-major. They are conventionally in `[0, 1]` but nothing
/// here enforces that; out-of-range and non-finite values are carried as-is.
/// A field with zero width or height is representable so that callers get a
/// proper error from the mapper instead of from construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl ScalarField {
    /// Create a field from row-major data.
    ///
    /// # Example
    ///
    /// ```
    /// use depthcam::field::ScalarField;
    ///
    /// let field = ScalarField::new(3, 2, vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5]).unwrap();
    /// assert_eq!(field.width(), 3);
    /// assert_eq!(field.get(1, 1), Some(0.4));
    /// ```
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self, FieldError> {
        let expected = width
            .checked_mul(height)
            .ok_or(FieldError::TooLarge { width, height })?;
        if data.len() != expected {
            return Err(FieldError::DataLengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a field from a 2D grid indexed as `[row][column]`.
    ///
    /// Rows must all have the width of the first row.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self, FieldError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        let data: Vec<f32> = rows.into_iter().flatten().collect();
        Self::new(width, height, data)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Value at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    /// All values in row-major order.
    pub fn values(&self) -> &[f32] {
        &self.data
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        // chunks() panics on zero, and a zero-width field has no rows anyway
        self.data.chunks(self.width.max(1)).take(self.height)
    }

    /// Returns the minimum and maximum finite values in the field.
    ///
    /// Returns `(0.0, 0.0)` for an empty field or one without finite values.
    pub fn value_bounds(&self) -> (f32, f32) {
        let mut min = f32::MAX;
        let mut max = f32::MIN;

        for &v in self.data.iter().filter(|v| v.is_finite()) {
            min = min.min(v);
            max = max.max(v);
        }

        if min > max {
            (0.0, 0.0)
        } else {
            (min, max)
        }
    }

    pub(crate) fn map_values(&self, f: impl Fn(f32) -> f32) -> Self {
        Self {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }
}

/// Grid of RGBA colors produced by the mapper.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbaField {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl RgbaField {
    /// Wrap mapped pixels. `pixels.len()` must equal `width * height`.
    pub(crate) fn from_pixels(width: usize, height: usize, pixels: Vec<Color>) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Color at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Pixels as a flat `[r, g, b, a, r, g, b, a, ...]` slice.
    pub fn as_f32_slice(&self) -> &[f32] {
        bytemuck::cast_slice(&self.pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_field_new() {
        let field = ScalarField::new(3, 2, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();

        assert_eq!(field.width(), 3);
        assert_eq!(field.height(), 2);
        assert_eq!(field.get(2, 1), Some(5.0));
        assert_eq!(field.get(3, 0), None);
    }

    #[test]
    fn test_scalar_field_length_mismatch() {
        let result = ScalarField::new(2, 2, vec![0.0; 3]);
        assert_eq!(
            result,
            Err(FieldError::DataLengthMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_scalar_field_dimension_overflow() {
        let width = usize::MAX / 2 + 1;
        let result = ScalarField::new(width, 2, vec![]);
        assert_eq!(result, Err(FieldError::TooLarge { width, height: 2 }));
    }

    #[test]
    fn test_scalar_field_from_rows() {
        let field = ScalarField::from_rows(vec![vec![0.0, 1.0], vec![2.0, 3.0]]).unwrap();
        assert_eq!(field.values(), &[0.0, 1.0, 2.0, 3.0]);

        let rows: Vec<&[f32]> = field.rows().collect();
        assert_eq!(rows, vec![&[0.0f32, 1.0][..], &[2.0f32, 3.0][..]]);
    }

    #[test]
    fn test_scalar_field_ragged_rows() {
        let result = ScalarField::from_rows(vec![vec![0.0, 1.0], vec![2.0]]);
        assert!(matches!(result, Err(FieldError::DataLengthMismatch { .. })));
    }

    #[test]
    fn test_scalar_field_zero_width_is_representable() {
        let field = ScalarField::new(0, 4, vec![]).unwrap();
        assert_eq!(field.width(), 0);
        assert_eq!(field.height(), 4);
        assert_eq!(field.rows().count(), 0);
    }

    #[test]
    fn test_value_bounds() {
        let field = ScalarField::new(3, 2, vec![0.0, 5.0, 2.0, -3.0, 4.0, 10.0]).unwrap();
        assert_eq!(field.value_bounds(), (-3.0, 10.0));
    }

    #[test]
    fn test_value_bounds_skips_non_finite() {
        let field = ScalarField::new(3, 1, vec![f32::NAN, 0.5, f32::INFINITY]).unwrap();
        assert_eq!(field.value_bounds(), (0.5, 0.5));
    }

    #[test]
    fn test_value_bounds_empty() {
        let field = ScalarField::new(0, 0, vec![]).unwrap();
        assert_eq!(field.value_bounds(), (0.0, 0.0));
    }

    #[test]
    fn test_rgba_field_flat_view() {
        let pixels = vec![Color::new(0.1, 0.2, 0.3, 0.4), Color::new(0.5, 0.6, 0.7, 0.8)];
        let field = RgbaField::from_pixels(2, 1, pixels);

        assert_eq!(
            field.as_f32_slice(),
            &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8]
        );
        assert_eq!(field.get(1, 0), Some(Color::new(0.5, 0.6, 0.7, 0.8)));
    }
}
