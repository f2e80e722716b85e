//! False-color visualization of depth and luminance fields.
//!
//! The pipeline is:
//! 1. Get a [`ScalarField`] from a text grid, an image's luminance, or a
//!    normalized depth map ([`field`]).
//! 2. Map it through a five-color [`PseudoColorConfig`] ([`pseudo::map`]).
//! 3. Write the resulting [`RgbaField`] ([`output`]).

pub mod field;
pub mod output;
pub mod pseudo;

pub use field::{RgbaField, ScalarField};
pub use pseudo::{map, map_luma, Color, PseudoColorConfig, PseudoColorError};
