//! Brightness, contrast and saturation adjustment.

use crate::buffer::PixelBuffer;
use crate::progress::{Cancelled, Phase, Progress, Throttle};

/// Neutral value for every tone control.
const NEUTRAL: f32 = 50.0;

/// Tone controls on a 0..=100 scale where 50 means "no change".
///
/// Per pixel, with `avg` the mean of the source R, G and B:
///
/// ```text
/// c        = (contrast - 50) * 2
/// f        = 259 * (c + 255) / (255 * (259 - c))
/// offset   = (brightness - 50) * 255 / 100
/// s        = saturation / 50
/// adjusted = f * (channel - 128) + 128 + offset
/// out      = clamp((adjusted - avg) * s + avg, 0, 255)
/// ```
///
/// Alpha is left untouched.
///
/// # Example
///
/// ```
/// use place_dither::{NoProgress, PixelBuffer, ToneAdjustment};
///
/// let mut buf = PixelBuffer::filled(1, 1, [200, 100, 50, 255]);
/// ToneAdjustment::new()
///     .saturation(0.0)
///     .apply(&mut buf, &mut NoProgress)
///     .unwrap();
/// assert_eq!(buf.pixel(0, 0), [117, 117, 117, 255]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneAdjustment {
    brightness: f32,
    contrast: f32,
    saturation: f32,
}

impl Default for ToneAdjustment {
    fn default() -> Self {
        Self {
            brightness: NEUTRAL,
            contrast: NEUTRAL,
            saturation: NEUTRAL,
        }
    }
}

/// Out-of-range values are clamped; NaN and infinities read as neutral.
fn control(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        NEUTRAL
    }
}

impl ToneAdjustment {
    /// All controls at 50 (identity).
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set brightness. 0 subtracts 127.5 from every channel, 100 adds it.
    #[inline]
    pub fn brightness(mut self, value: f32) -> Self {
        self.brightness = control(value);
        self
    }

    /// Set contrast. 0 flattens everything to mid grey.
    #[inline]
    pub fn contrast(mut self, value: f32) -> Self {
        self.contrast = control(value);
        self
    }

    /// Set saturation. 0 is greyscale, 100 doubles the deviation from grey.
    #[inline]
    pub fn saturation(mut self, value: f32) -> Self {
        self.saturation = control(value);
        self
    }

    /// True when every control is at 50.
    pub fn is_identity(&self) -> bool {
        self.brightness == NEUTRAL && self.contrast == NEUTRAL && self.saturation == NEUTRAL
    }

    /// The contrast factor `f`; exactly 1.0 at contrast 50.
    pub fn contrast_factor(&self) -> f32 {
        let c = (self.contrast - NEUTRAL) * 2.0;
        (259.0 * (c + 255.0)) / (255.0 * (259.0 - c))
    }

    /// Adjust every pixel of `buf` in place.
    ///
    /// Polls `progress` for cancellation once per row. On cancellation the
    /// rows already processed stay adjusted; the buffer should be dropped.
    pub fn apply<P: Progress + ?Sized>(
        &self,
        buf: &mut PixelBuffer,
        progress: &mut P,
    ) -> Result<(), Cancelled> {
        let factor = self.contrast_factor();
        let offset = (self.brightness - NEUTRAL) * 255.0 / 100.0;
        let sat = self.saturation / NEUTRAL;

        let height = buf.height();
        let throttle = Throttle::new(height as usize);
        progress.report(Phase::Adjust, 0);

        for y in 0..height {
            if progress.is_cancelled() {
                return Err(Cancelled);
            }
            for px in buf.row_mut(y).chunks_exact_mut(4) {
                let avg = (px[0] as f32 + px[1] as f32 + px[2] as f32) / 3.0;
                for c in &mut px[..3] {
                    let adjusted = factor * (*c as f32 - 128.0) + 128.0 + offset;
                    let out = (adjusted - avg) * sat + avg;
                    *c = out.round().clamp(0.0, 255.0) as u8;
                }
            }
            if let Some(pct) = throttle.at(y as usize) {
                if y > 0 {
                    progress.report(Phase::Adjust, pct);
                }
            }
        }

        progress.report(Phase::Adjust, 100);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;

    fn adjust(tone: ToneAdjustment, rgba: [u8; 4]) -> [u8; 4] {
        let mut buf = PixelBuffer::filled(1, 1, rgba);
        tone.apply(&mut buf, &mut NoProgress).unwrap();
        buf.pixel(0, 0)
    }

    #[test]
    fn test_neutral_settings_are_identity() {
        let tone = ToneAdjustment::new();
        assert!(tone.is_identity());
        assert_eq!(tone.contrast_factor(), 1.0);
        for rgba in [[0, 0, 0, 255], [12, 200, 99, 7], [255, 255, 255, 0], [1, 2, 3, 128]] {
            assert_eq!(adjust(tone, rgba), rgba);
        }
    }

    #[test]
    fn test_brightness_shifts_channels() {
        let brighter = ToneAdjustment::new().brightness(100.0);
        assert_eq!(adjust(brighter, [200, 10, 128, 255])[0], 255);

        // 70 adds 51, 30 subtracts 51
        let up = ToneAdjustment::new().brightness(70.0);
        assert_eq!(adjust(up, [200, 10, 128, 255]), [251, 61, 179, 255]);
        let down = ToneAdjustment::new().brightness(30.0);
        assert_eq!(adjust(down, [200, 10, 128, 255]), [149, 0, 77, 255]);
    }

    #[test]
    fn test_zero_contrast_collapses_to_mid_grey() {
        let flat = ToneAdjustment::new().contrast(0.0);
        // c = -100: f = 259 * 155 / (255 * 359), about 0.4385
        assert!((flat.contrast_factor() - 0.438_52).abs() < 1e-4);
        let out = adjust(flat, [255, 255, 255, 255]);
        assert_eq!(out, [184, 184, 184, 255]);
    }

    #[test]
    fn test_zero_saturation_is_greyscale() {
        let grey = ToneAdjustment::new().saturation(0.0);
        let [r, g, b, a] = adjust(grey, [30, 60, 90, 200]);
        assert_eq!((r, g, b, a), (60, 60, 60, 200));
    }

    #[test]
    fn test_saturation_boost_doubles_deviation() {
        let vivid = ToneAdjustment::new().saturation(100.0);
        assert_eq!(adjust(vivid, [100, 120, 140, 255]), [80, 120, 160, 255]);
    }

    #[test]
    fn test_out_of_range_controls_are_clamped() {
        let tone = ToneAdjustment::new()
            .brightness(f32::NAN)
            .contrast(250.0)
            .saturation(-3.0);
        assert_eq!(tone.brightness, 50.0);
        assert_eq!(tone.contrast, 100.0);
        assert_eq!(tone.saturation, 0.0);
    }

    #[test]
    fn test_cancellation_stops_before_first_row() {
        struct Cancel;
        impl Progress for Cancel {
            fn report(&mut self, _: Phase, _: u8) {}
            fn is_cancelled(&self) -> bool {
                true
            }
        }
        let mut buf = PixelBuffer::filled(2, 2, [10, 10, 10, 255]);
        let result = ToneAdjustment::new().brightness(100.0).apply(&mut buf, &mut Cancel);
        assert_eq!(result, Err(Cancelled));
        assert_eq!(buf.pixel(0, 0), [10, 10, 10, 255]);
    }

    #[test]
    fn test_progress_is_monotonic_and_ends_at_100() {
        let mut seen = Vec::new();
        let mut buf = PixelBuffer::new(4, 250);
        ToneAdjustment::new()
            .apply(&mut buf, &mut |phase: Phase, pct: u8| {
                assert_eq!(phase, Phase::Adjust);
                seen.push(pct)
            })
            .unwrap();
        assert_eq!(seen.first(), Some(&0));
        assert_eq!(seen.last(), Some(&100));
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    }
}
