//! Binary alpha.

use crate::buffer::PixelBuffer;

/// Alpha values at or above this become 255, below it 0.
///
/// Equivalent to rounding `alpha / 255` to the nearest integer.
pub const ALPHA_THRESHOLD: u8 = 128;

/// Collapse every fractional alpha to 0 or 255, in place.
///
/// Returns how many pixels had their alpha changed. Idempotent.
///
/// # Example
///
/// ```
/// use place_dither::{flatten_alpha, PixelBuffer};
///
/// let mut buf = PixelBuffer::from_raw(3, 1, vec![
///     1, 1, 1, 127,
///     2, 2, 2, 128,
///     3, 3, 3, 255,
/// ]).unwrap();
/// assert_eq!(flatten_alpha(&mut buf), 2);
/// assert_eq!(buf.pixel(0, 0)[3], 0);
/// assert_eq!(buf.pixel(1, 0)[3], 255);
/// ```
pub fn flatten_alpha(buf: &mut PixelBuffer) -> usize {
    let mut changed = 0;
    for px in buf.pixels_mut() {
        let a = px[3];
        if a != 0 && a != 255 {
            px[3] = if a >= ALPHA_THRESHOLD { 255 } else { 0 };
            changed += 1;
        }
    }
    changed
}
