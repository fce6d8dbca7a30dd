//! Terrain masking.

use crate::buffer::PixelBuffer;
use crate::color::Rgb;
use crate::progress::{Cancelled, Phase, Progress, Throttle};

/// Zero all four channels of every pixel whose RGB equals `terrain`.
///
/// Matching ignores alpha. Returns the number of masked pixels. Reports
/// [`Phase::Terrain`] progress at the same rate as the quantizer and polls
/// for cancellation once per row.
///
/// # Example
///
/// ```
/// use place_dither::{mask_terrain, NoProgress, PixelBuffer, Rgb};
///
/// let mut buf = PixelBuffer::from_raw(2, 1, vec![
///     158, 189, 255, 255,
///     0, 0, 0, 255,
/// ]).unwrap();
/// let masked = mask_terrain(&mut buf, Rgb::new(158, 189, 255), &mut NoProgress).unwrap();
/// assert_eq!(masked, 1);
/// assert_eq!(buf.pixel(0, 0), [0, 0, 0, 0]);
/// assert_eq!(buf.pixel(1, 0), [0, 0, 0, 255]);
/// ```
pub fn mask_terrain<P: Progress + ?Sized>(
    buf: &mut PixelBuffer,
    terrain: Rgb,
    progress: &mut P,
) -> Result<usize, Cancelled> {
    let width = buf.width() as usize;
    let throttle = Throttle::new(buf.len());
    let target = terrain.to_bytes();
    let mut masked = 0;

    for y in 0..buf.height() {
        if progress.is_cancelled() {
            return Err(Cancelled);
        }
        for (x, px) in buf.row_mut(y).chunks_exact_mut(4).enumerate() {
            if px[..3] == target {
                px.fill(0);
                masked += 1;
            }
            if let Some(pct) = throttle.at(y as usize * width + x) {
                progress.report(Phase::Terrain, pct);
            }
        }
    }

    Ok(masked)
}
