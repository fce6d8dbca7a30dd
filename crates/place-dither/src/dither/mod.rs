//! Palette quantization with Floyd-Steinberg error diffusion.
//!
//! Pixels are visited in raster order (left to right, top to bottom). Each
//! one is replaced by its nearest palette color and the difference, scaled
//! by the dither intensity, is pushed onto the unvisited neighbours through
//! the [`FLOYD_STEINBERG`] kernel.
//!
//! Accumulated error is kept in two rows of floats ([`ErrorRows`]), not in
//! the byte buffer. When a pixel is visited its bytes plus accumulated error
//! are rounded and clamped to 0..=255; that value is what gets matched and
//! what the outgoing error is measured from. The written RGB is always an
//! exact palette entry. Alpha is never touched, and transparent pixels are
//! quantized like any other.
//!
//! # Example
//!
//! ```
//! use place_dither::{NoProgress, Palette, PixelBuffer, QuantizeOptions, Quantizer, Rgb};
//!
//! let palette = Palette::new(vec![Rgb::BLACK, Rgb::WHITE]);
//! let mut buf = PixelBuffer::filled(8, 8, [128, 128, 128, 255]);
//!
//! let mut quantizer = Quantizer::new(QuantizeOptions::new());
//! quantizer.quantize(&mut buf, &palette, &mut NoProgress).unwrap();
//!
//! let white = buf.pixels().filter(|px| px[0] == 255).count();
//! assert!(white > 16 && white < 48);
//! ```

mod kernel;
mod options;

pub use kernel::{Kernel, FLOYD_STEINBERG};
pub use options::QuantizeOptions;

use crate::buffer::PixelBuffer;
use crate::color::Rgb;
use crate::palette::{NearestColorMatcher, Palette};
use crate::progress::{Cancelled, Phase, Progress, Throttle};

/// Pending error for the scan line being quantized and the one below it.
///
/// Floyd-Steinberg only reaches one row down, so two rows are enough.
/// After a row is finished [`next_row`](Self::next_row) makes the lower row
/// current and clears the other for reuse.
#[derive(Debug)]
pub struct ErrorRows {
    current: Vec<[f32; 3]>,
    below: Vec<[f32; 3]>,
}

impl ErrorRows {
    pub fn new(width: usize) -> Self {
        Self {
            current: vec![[0.0; 3]; width],
            below: vec![[0.0; 3]; width],
        }
    }

    /// Error accumulated so far at column `x` of the current row.
    #[inline]
    pub fn at(&self, x: usize) -> [f32; 3] {
        self.current[x]
    }

    /// Add `error` at column `x`, on the current row (`dy == 0`) or the row
    /// below (`dy == 1`). Columns outside the image are dropped.
    #[inline]
    pub fn add(&mut self, x: usize, dy: usize, error: [f32; 3]) {
        let row = match dy {
            0 => &mut self.current,
            1 => &mut self.below,
            _ => return,
        };
        if let Some(slot) = row.get_mut(x) {
            for (acc, e) in slot.iter_mut().zip(error) {
                *acc += e;
            }
        }
    }

    pub fn next_row(&mut self) {
        std::mem::swap(&mut self.current, &mut self.below);
        self.below.fill([0.0; 3]);
    }
}

/// Error-diffusion quantizer.
///
/// Owns a [`NearestColorMatcher`], so repeated runs against the same
/// palette instance reuse its memo. An empty palette is replaced by
/// [`Palette::fallback`] (single black) for the run.
#[derive(Debug)]
pub struct Quantizer {
    options: QuantizeOptions,
    matcher: NearestColorMatcher,
}

impl Quantizer {
    pub fn new(options: QuantizeOptions) -> Self {
        Self {
            matcher: NearestColorMatcher::new(options.metric),
            options,
        }
    }

    #[inline]
    pub fn options(&self) -> &QuantizeOptions {
        &self.options
    }

    /// The matcher, e.g. to inspect its memo.
    #[inline]
    pub fn matcher(&self) -> &NearestColorMatcher {
        &self.matcher
    }

    /// Quantize `buf` in place against `palette`.
    ///
    /// Reports [`Phase::Dither`] progress every `max(1, pixels / 100)` pixels
    /// as `round(index * 100 / pixels)`; it does not emit a closing 100.
    /// Polls for cancellation at the start of every row.
    pub fn quantize<P: Progress + ?Sized>(
        &mut self,
        buf: &mut PixelBuffer,
        palette: &Palette,
        progress: &mut P,
    ) -> Result<(), Cancelled> {
        let fallback;
        let palette = if palette.is_empty() {
            fallback = Palette::fallback();
            &fallback
        } else {
            palette
        };

        let width = buf.width() as usize;
        let height = buf.height();
        let total = buf.len();
        let throttle = Throttle::new(total);
        let intensity = self.options.intensity;
        let kernel = &FLOYD_STEINBERG;
        let divisor = kernel.divisor as f32;
        debug_assert_eq!(kernel.max_dy, 1);
        let mut errors = ErrorRows::new(width);

        for y in 0..height {
            if progress.is_cancelled() {
                return Err(Cancelled);
            }
            let row = buf.row_mut(y);
            let last_row = y + 1 == height;

            for x in 0..width {
                let px = &mut row[x * 4..x * 4 + 3];
                let acc = errors.at(x);
                let old = Rgb::from_f32_clamped([
                    px[0] as f32 + acc[0],
                    px[1] as f32 + acc[1],
                    px[2] as f32 + acc[2],
                ]);
                let new = self.matcher.find(old, palette);
                px.copy_from_slice(&new.to_bytes());

                if intensity > 0.0 {
                    let o = old.to_f32();
                    let n = new.to_f32();
                    let error = [
                        (o[0] - n[0]) * intensity,
                        (o[1] - n[1]) * intensity,
                        (o[2] - n[2]) * intensity,
                    ];
                    for &(dx, dy, weight) in kernel.entries {
                        let nx = x as i32 + dx;
                        if nx < 0 || nx as usize >= width || (dy > 0 && last_row) {
                            continue;
                        }
                        let w = weight as f32 / divisor;
                        errors.add(
                            nx as usize,
                            dy as usize,
                            [error[0] * w, error[1] * w, error[2] * w],
                        );
                    }
                }

                if let Some(pct) = throttle.at(y as usize * width + x) {
                    progress.report(Phase::Dither, pct);
                }
            }

            errors.next_row();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::DistanceMetric;
    use crate::progress::NoProgress;

    fn bw() -> Palette {
        Palette::new(vec![Rgb::BLACK, Rgb::WHITE])
    }

    #[test]
    fn test_error_rows_carry_lower_row_forward() {
        let mut rows = ErrorRows::new(3);
        rows.add(1, 0, [7.0, 7.0, 7.0]);
        rows.add(1, 1, [5.0, 0.0, -5.0]);
        rows.add(2, 1, [1.0; 3]);
        assert_eq!(rows.at(1), [7.0; 3]);

        rows.next_row();
        assert_eq!(rows.at(0), [0.0; 3]);
        assert_eq!(rows.at(1), [5.0, 0.0, -5.0]);
        assert_eq!(rows.at(2), [1.0; 3]);

        // The row that became "below" starts empty.
        rows.next_row();
        assert_eq!(rows.at(1), [0.0; 3]);
    }

    #[test]
    fn test_error_rows_drop_out_of_range_targets() {
        let mut rows = ErrorRows::new(2);
        rows.add(2, 0, [1.0; 3]);
        rows.add(0, 2, [1.0; 3]);
        rows.next_row();
        rows.add(2, 1, [1.0; 3]);
        rows.next_row();
        assert_eq!(rows.at(0), [0.0; 3]);
        assert_eq!(rows.at(1), [0.0; 3]);
    }

    #[test]
    fn test_output_is_palette_only() {
        let palette = Palette::new(vec![
            Rgb::new(0, 0, 0),
            Rgb::new(237, 28, 36),
            Rgb::new(64, 147, 228),
            Rgb::new(255, 255, 255),
        ]);
        let data: Vec<u8> = (0..16 * 16)
            .flat_map(|i| [(i * 7 % 256) as u8, (i * 13 % 256) as u8, (i % 256) as u8, 255])
            .collect();
        for metric in DistanceMetric::ALL {
            let mut buf = PixelBuffer::from_raw(16, 16, data.clone()).unwrap();
            let mut q = Quantizer::new(QuantizeOptions::new().metric(metric));
            q.quantize(&mut buf, &palette, &mut NoProgress).unwrap();
            for px in buf.pixels() {
                assert!(palette.contains(Rgb::new(px[0], px[1], px[2])), "{metric}: {px:?}");
            }
        }
    }

    #[test]
    fn test_alpha_is_untouched_and_transparent_pixels_quantized() {
        let mut buf = PixelBuffer::from_raw(2, 1, vec![250, 250, 250, 0, 5, 5, 5, 255]).unwrap();
        let mut q = Quantizer::new(QuantizeOptions::new().intensity(0.0));
        q.quantize(&mut buf, &bw(), &mut NoProgress).unwrap();
        assert_eq!(buf.pixel(0, 0), [255, 255, 255, 0]);
        assert_eq!(buf.pixel(1, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_right_neighbour_receives_seven_sixteenths() {
        // 60 -> black leaves error 60. The neighbour's 50 becomes
        // 50 + 60 * 7/16 = 76, which is nearer 144 than black. With any of
        // the smaller weights (5/16, 3/16, 1/16) it would stay black.
        let palette = Palette::new(vec![Rgb::BLACK, Rgb::new(144, 144, 144)]);
        let mut buf = PixelBuffer::from_raw(2, 1, vec![60, 60, 60, 255, 50, 50, 50, 255]).unwrap();
        let mut q = Quantizer::new(QuantizeOptions::new());
        q.quantize(&mut buf, &palette, &mut NoProgress).unwrap();
        assert_eq!(buf.rgb(0, 0), Rgb::BLACK);
        assert_eq!(buf.rgb(1, 0), Rgb::new(144, 144, 144));

        let mut plain =
            PixelBuffer::from_raw(2, 1, vec![60, 60, 60, 255, 50, 50, 50, 255]).unwrap();
        let mut q = Quantizer::new(QuantizeOptions::new().intensity(0.0));
        q.quantize(&mut plain, &palette, &mut NoProgress).unwrap();
        assert_eq!(plain.rgb(1, 0), Rgb::BLACK);
    }

    #[test]
    fn test_intensity_zero_is_plain_nearest_color() {
        let palette = bw();
        let mut buf = PixelBuffer::filled(4, 4, [120, 120, 120, 255]);
        let mut q = Quantizer::new(QuantizeOptions::new().intensity(0.0));
        q.quantize(&mut buf, &palette, &mut NoProgress).unwrap();
        assert!(buf.pixels().all(|px| px[..3] == [0, 0, 0]));
    }

    #[test]
    fn test_empty_palette_falls_back_to_black() {
        let mut buf = PixelBuffer::filled(3, 2, [255, 255, 255, 255]);
        let mut q = Quantizer::new(QuantizeOptions::new());
        q.quantize(&mut buf, &Palette::new(Vec::new()), &mut NoProgress)
            .unwrap();
        assert!(buf.pixels().all(|px| px == [0, 0, 0, 255]));
    }

    #[test]
    fn test_progress_is_throttled_and_monotonic() {
        let mut seen = Vec::new();
        let mut buf = PixelBuffer::filled(50, 40, [90, 90, 90, 255]);
        let mut q = Quantizer::new(QuantizeOptions::new());
        q.quantize(&mut buf, &bw(), &mut |_: Phase, pct: u8| seen.push(pct))
            .unwrap();
        assert_eq!(seen.len(), 100);
        assert_eq!(seen[0], 0);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert!(*seen.last().unwrap() < 100);
    }

    #[test]
    fn test_cancelled_run_stops() {
        struct CancelAfter(usize);
        impl Progress for CancelAfter {
            fn report(&mut self, _: Phase, _: u8) {
                self.0 = self.0.saturating_sub(1);
            }
            fn is_cancelled(&self) -> bool {
                self.0 == 0
            }
        }
        let mut buf = PixelBuffer::filled(10, 10, [200, 200, 200, 255]);
        let mut q = Quantizer::new(QuantizeOptions::new());
        let result = q.quantize(&mut buf, &bw(), &mut CancelAfter(5));
        assert_eq!(result, Err(Cancelled));
        // The last row was never reached.
        assert_eq!(buf.pixel(9, 9), [200, 200, 200, 255]);
    }
}
