//! Writing mapped fields to disk.
//!
//! The mapper never clamps, so quantizing to 8-bit is where out-of-range
//! channels get clipped.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::field::RgbaField;
use crate::pseudo::Color;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Field too large for an image: {width}x{height}")]
    TooLarge { width: usize, height: usize },
}

/// Clamp to `[0, 1]` and scale to a byte. NaN becomes 0.
fn channel_to_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Color {
    pub fn to_rgba8(self) -> [u8; 4] {
        self.to_array().map(channel_to_u8)
    }
}

impl RgbaField {
    /// Row-major RGBA8 bytes, `width * height * 4` long.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels().iter().flat_map(|c| c.to_rgba8()).collect()
    }
}

/// Write the field as an 8-bit PNG.
pub fn write_png<P: AsRef<Path>>(field: &RgbaField, path: P) -> Result<(), OutputError> {
    let too_large = || OutputError::TooLarge {
        width: field.width(),
        height: field.height(),
    };
    let width = u32::try_from(field.width()).map_err(|_| too_large())?;
    let height = u32::try_from(field.height()).map_err(|_| too_large())?;

    let img = image::RgbaImage::from_raw(width, height, field.to_rgba8()).ok_or_else(too_large)?;
    img.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Write the unclamped float channels, native-endian, row-major.
pub fn write_raw<P: AsRef<Path>>(field: &RgbaField, path: P) -> Result<(), OutputError> {
    fs::write(path, bytemuck::cast_slice::<f32, u8>(field.as_f32_slice()))?;
    Ok(())
}

/// Pick the writer from the file extension: `.png` or raw floats.
pub fn write_field<P: AsRef<Path>>(field: &RgbaField, path: P) -> Result<(), OutputError> {
    let path = path.as_ref();
    let is_png = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"));

    if is_png {
        write_png(field, path)?;
    } else {
        write_raw(field, path)?;
    }
    log::info!(
        "wrote {}x{} {} to {}",
        field.width(),
        field.height(),
        if is_png { "png" } else { "raw rgba32f" },
        path.display()
    );
    Ok(())
}
