//! Nearest-color matching with a per-palette memo.

use std::collections::HashMap;

use super::metric::{ciede2000, rgb_distance_squared, DistanceMetric};
use super::palette::Palette;
use crate::color::{Lab, Oklab, Rgb};

/// Palette entries converted once into the metric's working space.
#[derive(Debug)]
enum Prepared {
    Rgb(Vec<Rgb>),
    Lab(Vec<Lab>),
    Oklab(Vec<Oklab>),
}

impl Prepared {
    fn new(metric: DistanceMetric, colors: &[Rgb]) -> Self {
        match metric {
            DistanceMetric::Rgb => Prepared::Rgb(colors.to_vec()),
            DistanceMetric::Ciede2000 => {
                Prepared::Lab(colors.iter().map(|&c| Lab::from(c)).collect())
            }
            DistanceMetric::Oklab => {
                Prepared::Oklab(colors.iter().map(|&c| Oklab::from(c)).collect())
            }
        }
    }

    /// Index of the first entry at minimum distance (strict `<` keeps ties left).
    fn nearest(&self, color: Rgb) -> usize {
        match self {
            Prepared::Rgb(entries) => {
                first_min(entries.iter().map(|&e| rgb_distance_squared(color, e)))
            }
            Prepared::Lab(entries) => {
                let lab = Lab::from(color);
                first_min(entries.iter().map(|&e| ciede2000(lab, e)))
            }
            Prepared::Oklab(entries) => {
                let oklab = Oklab::from(color);
                first_min(entries.iter().map(|&e| oklab.distance_squared(e)))
            }
        }
    }
}

fn first_min<D: PartialOrd>(distances: impl Iterator<Item = D>) -> usize {
    let mut best_idx = 0;
    let mut best: Option<D> = None;
    for (i, d) in distances.enumerate() {
        let closer = match &best {
            Some(b) => d < *b,
            None => true,
        };
        if closer {
            best = Some(d);
            best_idx = i;
        }
    }
    best_idx
}

/// Finds the nearest palette entry for a color, memoizing per palette.
///
/// The memo maps exact input triples to palette indices and belongs to one
/// palette identity at a time: passing a palette whose [`Palette::id`]
/// differs from the previous call clears it and re-prepares the entries.
/// Matching is deterministic; ties go to the earliest palette entry.
///
/// # Example
///
/// ```
/// use place_dither::{DistanceMetric, NearestColorMatcher, Palette, Rgb};
///
/// let palette = Palette::new(vec![Rgb::BLACK, Rgb::WHITE]);
/// let mut matcher = NearestColorMatcher::new(DistanceMetric::Rgb);
/// assert_eq!(matcher.find(Rgb::new(200, 190, 210), &palette), Rgb::WHITE);
/// ```
#[derive(Debug)]
pub struct NearestColorMatcher {
    metric: DistanceMetric,
    palette_id: Option<u64>,
    prepared: Prepared,
    colors: Vec<Rgb>,
    cache: HashMap<Rgb, usize>,
}

impl NearestColorMatcher {
    /// Create a matcher for the given metric with an empty memo.
    pub fn new(metric: DistanceMetric) -> Self {
        Self {
            metric,
            palette_id: None,
            prepared: Prepared::Rgb(Vec::new()),
            colors: Vec::new(),
            cache: HashMap::new(),
        }
    }

    /// The metric this matcher compares with.
    #[inline]
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Number of memoized colors for the current palette.
    #[inline]
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    fn sync_palette(&mut self, palette: &Palette) {
        if self.palette_id == Some(palette.id()) {
            return;
        }
        let colors = if palette.is_empty() {
            vec![Rgb::BLACK]
        } else {
            palette.colors().to_vec()
        };
        self.cache.clear();
        self.prepared = Prepared::new(self.metric, &colors);
        self.colors = colors;
        self.palette_id = Some(palette.id());
    }

    /// Index of the nearest entry in `palette`.
    ///
    /// An empty palette (a caller contract violation) is matched as the
    /// single-black fallback and always yields index 0.
    pub fn find_index(&mut self, color: Rgb, palette: &Palette) -> usize {
        self.sync_palette(palette);
        if let Some(&idx) = self.cache.get(&color) {
            return idx;
        }
        let idx = self.prepared.nearest(color);
        self.cache.insert(color, idx);
        idx
    }

    /// The nearest palette color.
    pub fn find(&mut self, color: Rgb, palette: &Palette) -> Rgb {
        let idx = self.find_index(color, palette);
        self.colors[idx]
    }
}
