//! Oklab perceptual color space
//!
//! Oklab is a perceptual color space designed for uniform color perception.
//! It is used for the Euclidean Oklab distance metric.
//!
//! # References
//!
//! Björn Ottosson, "A perceptual color space for image processing"
//! <https://bottosson.github.io/posts/oklab/>

use super::rgb::Rgb;

/// A color in Oklab perceptual color space.
///
/// # Components
///
/// - `l`: Lightness (0.0 = black, 1.0 = white for in-gamut colors)
/// - `a`: Green-red axis (negative = green, positive = red)
/// - `b`: Blue-yellow axis (negative = blue, positive = yellow)
///
/// # Linearization
///
/// [`From<Rgb>`] feeds the 8-bit channels, scaled to 0.0..=1.0, straight
/// into the LMS matrix without removing the sRGB gamma. Palette matches
/// therefore agree bit-for-bit with the browser tool this crate reproduces.
/// Use [`Oklab::from_linear`] for the canonical transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklab {
    /// Lightness: 0.0 (black) to 1.0 (white) for in-gamut colors
    pub l: f32,
    /// Green-red axis: typically -0.5 to 0.5
    pub a: f32,
    /// Blue-yellow axis: typically -0.5 to 0.5
    pub b: f32,
}

impl Oklab {
    /// Create a new Oklab color.
    #[inline]
    pub fn new(l: f32, a: f32, b: f32) -> Self {
        Self { l, a, b }
    }

    /// Squared Euclidean distance in Oklab space.
    ///
    /// Use squared distance to avoid sqrt when comparing distances.
    ///
    /// # Example
    ///
    /// ```
    /// use place_dither::Oklab;
    ///
    /// let white = Oklab::new(1.0, 0.0, 0.0);
    /// let black = Oklab::new(0.0, 0.0, 0.0);
    /// let gray = Oklab::new(0.5, 0.0, 0.0);
    ///
    /// let d_to_black = gray.distance_squared(black);
    /// let d_to_white = gray.distance_squared(white);
    /// assert!((d_to_black - d_to_white).abs() < 1e-6);
    /// ```
    #[inline]
    pub fn distance_squared(self, other: Oklab) -> f32 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        dl * dl + da * da + db * db
    }

    /// Convert linear-light RGB (each channel 0.0..=1.0) to Oklab.
    ///
    /// Uses the updated 2021-01-25 matrices from Björn Ottosson.
    pub fn from_linear(r: f32, g: f32, b: f32) -> Self {
        // Step 1: Linear sRGB to LMS (M1 matrix)
        let l = 0.4122214708 * r + 0.5363325363 * g + 0.0514459929 * b;
        let m = 0.2119034982 * r + 0.6806995451 * g + 0.1073969566 * b;
        let s = 0.0883024619 * r + 0.2817188376 * g + 0.6299787005 * b;

        // Step 2: Cube root (nonlinearity)
        let l_ = l.cbrt();
        let m_ = m.cbrt();
        let s_ = s.cbrt();

        // Step 3: LMS to Lab (M2 matrix)
        Oklab {
            l: 0.2104542553 * l_ + 0.7936177850 * m_ - 0.0040720468 * s_,
            a: 1.9779984951 * l_ - 2.4285922050 * m_ + 0.4505937099 * s_,
            b: 0.0259040371 * l_ + 0.7827717662 * m_ - 0.8086757660 * s_,
        }
    }
}

impl From<Rgb> for Oklab {
    /// Convert an 8-bit color to Oklab, treating channels as already linear.
    ///
    /// # Example
    ///
    /// ```
    /// use place_dither::{Oklab, Rgb};
    ///
    /// let gray = Oklab::from(Rgb::new(128, 128, 128));
    /// assert!(gray.a.abs() < 0.001);
    /// assert!(gray.b.abs() < 0.001);
    /// ```
    fn from(rgb: Rgb) -> Self {
        Self::from_linear(
            rgb.r as f32 / 255.0,
            rgb.g as f32 / 255.0,
            rgb.b as f32 / 255.0,
        )
    }
}
