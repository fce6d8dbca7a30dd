//! PaletteQuantizer builder -- quantize and terrain-mask in one pass.

use crate::buffer::PixelBuffer;
use crate::color::Rgb;
use crate::dither::{QuantizeOptions, Quantizer};
use crate::output::mask_terrain;
use crate::palette::{DistanceMetric, Palette};
use crate::progress::{Phase, Progress};

use super::QuantizeError;

/// Share of the progress range given to dithering when terrain masking runs.
const DITHER_SHARE: f32 = 0.95;
/// Where the terrain pass starts on the combined progress scale.
const TERRAIN_START: u8 = 95;

/// Outcome of one [`PaletteQuantizer::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuantizeReport {
    /// Pixels turned transparent by terrain masking.
    pub terrain_pixels: usize,
}

/// Quantizes a buffer to a palette, optionally masking a terrain color.
///
/// - Constructor takes the palette the user picked
/// - Configuration methods consume and return `self`
/// - [`run()`](Self::run) takes `&mut self` because the matcher memo is
///   kept across runs for as long as the palette stays the same
///
/// The palette used for matching is the user palette with the terrain color
/// appended (unless already present), or the single-black fallback if that
/// ends up empty.
///
/// Progress forms one continuous 0..=100 sequence: without terrain the
/// dither phase reports its own percentages; with terrain the dither phase
/// is scaled to 0..=95 and the terrain pass to 95..=100. A final 100 is
/// always reported.
///
/// # Example
///
/// ```
/// use place_dither::{NoProgress, Palette, PaletteQuantizer, PixelBuffer, Rgb};
///
/// let sky = Rgb::new(158, 189, 255);
/// let mut quantizer = PaletteQuantizer::new(Palette::new(vec![Rgb::BLACK, Rgb::WHITE]))
///     .intensity(0.0)
///     .terrain(Some(sky));
///
/// let mut buf = PixelBuffer::filled(4, 4, [150, 190, 250, 255]);
/// let report = quantizer.run(&mut buf, &mut NoProgress).unwrap();
///
/// assert_eq!(report.terrain_pixels, 16);
/// assert!(buf.pixels().all(|px| px == [0, 0, 0, 0]));
/// ```
#[derive(Debug)]
pub struct PaletteQuantizer {
    palette: Palette,
    terrain: Option<Rgb>,
    matching: Palette,
    quantizer: Quantizer,
}

impl PaletteQuantizer {
    /// Create a quantizer with full intensity, RGB metric and no terrain.
    pub fn new(palette: Palette) -> Self {
        let matching = palette.clone().or_fallback();
        Self {
            palette,
            terrain: None,
            matching,
            quantizer: Quantizer::new(QuantizeOptions::new()),
        }
    }

    /// Set dither intensity (0.0..=1.0).
    #[inline]
    pub fn intensity(mut self, intensity: f32) -> Self {
        let options = self.quantizer.options().intensity(intensity);
        self.quantizer = Quantizer::new(options);
        self
    }

    /// Set the distance metric.
    #[inline]
    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        let options = self.quantizer.options().metric(metric);
        self.quantizer = Quantizer::new(options);
        self
    }

    /// Set or clear the terrain color.
    pub fn terrain(mut self, terrain: Option<Rgb>) -> Self {
        self.terrain = terrain;
        self.matching = self.palette.with_terrain(terrain).or_fallback();
        self
    }

    /// The palette as given.
    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The palette pixels are actually matched against.
    #[inline]
    pub fn matching_palette(&self) -> &Palette {
        &self.matching
    }

    #[inline]
    pub fn options(&self) -> &QuantizeOptions {
        self.quantizer.options()
    }

    /// Quantize `buf` in place, then mask the terrain color if one is set.
    ///
    /// # Errors
    ///
    /// [`QuantizeError::Cancelled`] if `progress` asked to stop. The buffer
    /// is then partially processed and should be discarded.
    pub fn run<P: Progress + ?Sized>(
        &mut self,
        buf: &mut PixelBuffer,
        progress: &mut P,
    ) -> Result<QuantizeReport, QuantizeError> {
        let mut scaled = ScaledProgress {
            inner: progress,
            with_terrain: self.terrain.is_some(),
        };

        self.quantizer.quantize(buf, &self.matching, &mut scaled)?;

        let mut report = QuantizeReport::default();
        if let Some(terrain) = self.terrain {
            report.terrain_pixels = mask_terrain(buf, terrain, &mut scaled)?;
        }

        scaled.inner.report(Phase::Dither, 100);
        Ok(report)
    }
}

/// Maps per-pass percentages onto one continuous range.
struct ScaledProgress<'a, P: ?Sized> {
    inner: &'a mut P,
    with_terrain: bool,
}

impl<P: Progress + ?Sized> Progress for ScaledProgress<'_, P> {
    fn report(&mut self, phase: Phase, percent: u8) {
        let scaled = match (phase, self.with_terrain) {
            (Phase::Dither, true) => (percent as f32 * DITHER_SHARE).round() as u8,
            (Phase::Terrain, _) => {
                TERRAIN_START + (percent as f32 * (1.0 - DITHER_SHARE)).round() as u8
            }
            _ => percent,
        };
        self.inner.report(phase, scaled);
    }

    fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled()
    }
}
