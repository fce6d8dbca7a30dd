//! Opaque-pixel color statistics.

use std::collections::HashMap;

use crate::buffer::PixelBuffer;
use crate::color::Rgb;
use crate::palette::Palette;

/// Per-color pixel counts of a quantized buffer.
///
/// Only fully opaque pixels (alpha 255) are counted. Run it after
/// [`flatten_alpha`](crate::flatten_alpha), otherwise partially transparent
/// pixels are silently left out.
///
/// # Example
///
/// ```
/// use place_dither::{ColorCensus, Palette, PixelBuffer, Rgb};
///
/// let buf = PixelBuffer::from_raw(3, 1, vec![
///     0, 0, 0, 255,
///     0, 0, 0, 255,
///     255, 255, 255, 0,
/// ]).unwrap();
/// let palette = Palette::new(vec![Rgb::BLACK, Rgb::WHITE]);
/// let census = ColorCensus::count(&buf, &palette);
///
/// assert_eq!(census.total(), 2);
/// assert_eq!(census.per_palette(), &[(Rgb::BLACK, 2), (Rgb::WHITE, 0)]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorCensus {
    by_color: HashMap<Rgb, usize>,
    per_palette: Vec<(Rgb, usize)>,
    total: usize,
}

impl ColorCensus {
    /// Tally `buf` and report the counts for each entry of `palette`.
    pub fn count(buf: &PixelBuffer, palette: &Palette) -> Self {
        let mut by_color: HashMap<Rgb, usize> = HashMap::new();
        let mut total = 0;
        for px in buf.pixels().filter(|px| px[3] == 255) {
            *by_color.entry(Rgb::new(px[0], px[1], px[2])).or_default() += 1;
            total += 1;
        }
        let per_palette = palette
            .colors()
            .iter()
            .map(|&c| (c, by_color.get(&c).copied().unwrap_or(0)))
            .collect();
        Self {
            by_color,
            per_palette,
            total,
        }
    }

    /// Number of opaque pixels.
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Count for each palette entry, in palette order.
    ///
    /// Duplicate entries each report the full count of their color.
    #[inline]
    pub fn per_palette(&self) -> &[(Rgb, usize)] {
        &self.per_palette
    }

    /// Opaque pixels of exactly `color`, whether or not it is in the palette.
    pub fn count_of(&self, color: Rgb) -> usize {
        self.by_color.get(&color).copied().unwrap_or(0)
    }

    /// Every color seen, with its count. Order is unspecified.
    pub fn colors(&self) -> impl Iterator<Item = (Rgb, usize)> + '_ {
        self.by_color.iter().map(|(&c, &n)| (c, n))
    }
}
