//! Pre-quantization passes over a [`PixelBuffer`](crate::PixelBuffer).
//!
//! 1. **Tone adjustment** ([`ToneAdjustment`]): brightness, contrast and
//!    saturation, each on a 0..=100 scale centred on 50.
//! 2. **Opacity flattening** ([`flatten_alpha`]): collapses fractional
//!    alpha so the quantizer only ever sees fully opaque or fully
//!    transparent pixels.
//!
//! Resizing happens between the two passes and lives with the image I/O
//! of the calling application.

mod opacity;
mod tone;

pub use opacity::{flatten_alpha, ALPHA_THRESHOLD};
pub use tone::ToneAdjustment;
