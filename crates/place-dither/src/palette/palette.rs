//! Immutable palette with identity.

use std::sync::atomic::{AtomicU64, Ordering};

use super::error::PaletteError;
use crate::color::Rgb;

/// Source of palette identities. Zero is never handed out.
static NEXT_PALETTE_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_PALETTE_ID.fetch_add(1, Ordering::Relaxed)
}

/// An ordered list of allowed output colors.
///
/// Order matters only for ties: when two entries are equally near a color
/// the earlier one wins. Duplicates are permitted and simply never win.
///
/// A palette cannot be modified after construction. Every constructor hands
/// out a fresh [`id`](Self::id), so "the palette changed" and "the id
/// changed" are the same event. Clones share the id of their source, which
/// is sound because their contents are identical and immutable.
///
/// # Example
///
/// ```
/// use place_dither::{Palette, Rgb};
///
/// let palette = Palette::new(vec![Rgb::BLACK, Rgb::WHITE]);
/// assert_eq!(palette.len(), 2);
///
/// let edited = Palette::new(vec![Rgb::BLACK, Rgb::WHITE]);
/// assert_ne!(palette.id(), edited.id());
/// ```
#[derive(Debug, Clone)]
pub struct Palette {
    id: u64,
    colors: Vec<Rgb>,
}

impl Palette {
    /// Create a palette from an ordered color list. The list may be empty.
    pub fn new(colors: impl Into<Vec<Rgb>>) -> Self {
        Self {
            id: next_id(),
            colors: colors.into(),
        }
    }

    /// The single-black palette substituted for an empty one.
    pub fn fallback() -> Self {
        Self::new(vec![Rgb::BLACK])
    }

    /// Parse a palette from hex strings (`#RRGGBB`, `#RGB`, `#` optional).
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::ParseColor`] naming the first entry that
    /// fails to parse.
    ///
    /// # Example
    ///
    /// ```
    /// use place_dither::{Palette, Rgb};
    ///
    /// let palette = Palette::from_hex(&["#000", "#FFFFFF"]).unwrap();
    /// assert_eq!(palette.colors(), &[Rgb::BLACK, Rgb::WHITE]);
    /// ```
    pub fn from_hex(colors: &[&str]) -> Result<Self, PaletteError> {
        let parsed = colors
            .iter()
            .enumerate()
            .map(|(index, s)| {
                s.parse::<Rgb>()
                    .map_err(|source| PaletteError::ParseColor { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(parsed))
    }

    /// Identity of this palette instance (its "version").
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The colors in palette order.
    #[inline]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Returns the number of colors in the palette.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Returns true if the palette has no colors.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Get the color at the given index.
    ///
    /// # Panics
    /// Panics if `idx >= self.len()`.
    #[inline]
    pub fn get(&self, idx: usize) -> Rgb {
        self.colors[idx]
    }

    /// Whether `color` is an entry of this palette.
    pub fn contains(&self, color: Rgb) -> bool {
        self.colors.contains(&color)
    }

    /// This palette if non-empty, otherwise the single-black fallback.
    pub fn or_fallback(self) -> Self {
        if self.is_empty() {
            Self::fallback()
        } else {
            self
        }
    }

    /// The palette used for matching when a terrain color is configured.
    ///
    /// The terrain color must be reachable by the quantizer, so it is
    /// appended unless already present. Without a terrain color this is a
    /// plain clone (same id).
    pub fn with_terrain(&self, terrain: Option<Rgb>) -> Self {
        match terrain {
            Some(t) if !self.contains(t) => {
                let mut colors = self.colors.clone();
                colors.push(t);
                Self::new(colors)
            }
            _ => self.clone(),
        }
    }
}

impl From<Vec<Rgb>> for Palette {
    fn from(colors: Vec<Rgb>) -> Self {
        Self::new(colors)
    }
}
