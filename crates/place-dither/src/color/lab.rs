//! CIE L\*a\*b\* color space (D65)
//!
//! Lab feeds the CIEDE2000 metric. The conversion runs sRGB → linear (via
//! the build-time LUT) → XYZ → Lab.

use super::lut::srgb_to_linear;
use super::rgb::Rgb;

/// D65 reference white, scaled so that Y = 100.
const WHITE_X: f64 = 95.047;
const WHITE_Y: f64 = 100.0;
const WHITE_Z: f64 = 108.883;

/// (6/29)^3: below this the cube root is replaced by a linear segment.
const EPSILON: f64 = 0.008856;
/// Slope of the linear segment, (29/6)^2 / 3.
const KAPPA: f64 = 7.787;

/// A color in CIE L\*a\*b\* space.
///
/// - `l`: lightness, 0.0 (black) to 100.0 (white)
/// - `a`: green (-) to red (+)
/// - `b`: blue (-) to yellow (+)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    /// Lightness (0.0..=100.0)
    pub l: f64,
    /// Green-red axis
    pub a: f64,
    /// Blue-yellow axis
    pub b: f64,
}

impl Lab {
    /// Create a new Lab color.
    #[inline]
    pub fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Chroma: distance from the neutral axis.
    #[inline]
    pub fn chroma(self) -> f64 {
        (self.a * self.a + self.b * self.b).sqrt()
    }
}

#[inline]
fn lab_transfer(t: f64) -> f64 {
    if t > EPSILON {
        t.cbrt()
    } else {
        KAPPA * t + 16.0 / 116.0
    }
}

impl From<Rgb> for Lab {
    /// Convert an 8-bit sRGB color to Lab.
    ///
    /// # Example
    ///
    /// ```
    /// use place_dither::{Lab, Rgb};
    ///
    /// let white = Lab::from(Rgb::WHITE);
    /// assert!((white.l - 100.0).abs() < 0.01);
    /// assert!(white.a.abs() < 0.01);
    /// ```
    fn from(rgb: Rgb) -> Self {
        let r = srgb_to_linear(rgb.r) * 100.0;
        let g = srgb_to_linear(rgb.g) * 100.0;
        let b = srgb_to_linear(rgb.b) * 100.0;

        let x = r * 0.4124 + g * 0.3576 + b * 0.1805;
        let y = r * 0.2126 + g * 0.7152 + b * 0.0722;
        let z = r * 0.0193 + g * 0.1192 + b * 0.9505;

        let fx = lab_transfer(x / WHITE_X);
        let fy = lab_transfer(y / WHITE_Y);
        let fz = lab_transfer(z / WHITE_Z);

        Lab {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }
}
