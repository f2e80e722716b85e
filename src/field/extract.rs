//! Scalar extraction steps that run before color mapping.
//!
//! None of these clamp: values outside `[0, 1]` and non-finite values are
//! passed through so the mapper sees exactly what the source produced.

use super::{FieldError, ScalarField};

/// Rec.709 luma weights.
pub const REC709_WEIGHTS: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Relative luminance of a linear RGB triple.
pub fn luminance(rgb: [f32; 3]) -> f32 {
    rgb[0] * REC709_WEIGHTS[0] + rgb[1] * REC709_WEIGHTS[1] + rgb[2] * REC709_WEIGHTS[2]
}

/// Build a scalar field from row-major RGB pixels.
pub fn luminance_field(
    width: usize,
    height: usize,
    pixels: &[[f32; 3]],
) -> Result<ScalarField, FieldError> {
    ScalarField::new(width, height, pixels.iter().map(|&p| luminance(p)).collect())
}

/// Scale values around 0.5 by `contrast`.
///
/// `contrast = 1.0` is the identity, `0.0` flattens everything to 0.5.
pub fn apply_contrast(field: &ScalarField, contrast: f32) -> ScalarField {
    field.map_values(|v| (v - 0.5) * contrast + 0.5)
}

/// Rescale depth values so that `near` maps to 0.0 and `far` to 1.0.
///
/// A zero or subnormal range maps every finite value to 0.0.
pub fn normalize_depth(field: &ScalarField, near: f32, far: f32) -> ScalarField {
    let range = far - near;
    if !range.is_normal() {
        log::warn!("degenerate depth range [{}, {}], flattening field", near, far);
        return field.map_values(|v| if v.is_finite() { 0.0 } else { v });
    }
    let inv_range = 1.0 / range;
    field.map_values(|v| (v - near) * inv_range)
}

/// Normalize using the field's own finite value bounds.
pub fn auto_normalize(field: &ScalarField) -> ScalarField {
    let (near, far) = field.value_bounds();
    log::debug!("auto-normalizing depth range [{}, {}]", near, far);
    normalize_depth(field, near, far)
}
