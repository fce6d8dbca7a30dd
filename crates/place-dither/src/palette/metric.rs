//! Color distance metrics.
//!
//! All three metrics are only ever compared against each other within one
//! metric, so each may return any monotonic surrogate of its true distance:
//! the RGB and Oklab metrics skip the square root.

use std::fmt;
use std::str::FromStr;

use crate::color::{Lab, Oklab, Rgb};

/// Distance metric used to pick the nearest palette color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DistanceMetric {
    /// Squared Euclidean distance over the raw 8-bit channels.
    ///
    /// Cheapest, and what the placement tool uses unless told otherwise.
    #[default]
    Rgb,

    /// CIEDE2000 color difference over CIE Lab.
    ///
    /// Most perceptually accurate and by far the most expensive.
    Ciede2000,

    /// Squared Euclidean distance in Oklab space.
    Oklab,
}

impl DistanceMetric {
    /// All metrics, in selector order.
    pub const ALL: [DistanceMetric; 3] = [
        DistanceMetric::Rgb,
        DistanceMetric::Ciede2000,
        DistanceMetric::Oklab,
    ];

    /// Selector name as used in configuration and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            DistanceMetric::Rgb => "rgb",
            DistanceMetric::Ciede2000 => "ciede2000",
            DistanceMetric::Oklab => "oklab",
        }
    }

    /// Distance between two colors under this metric.
    ///
    /// Converts both colors on every call; the matcher precomputes palette
    /// conversions instead of going through here.
    ///
    /// # Example
    ///
    /// ```
    /// use place_dither::{DistanceMetric, Rgb};
    ///
    /// let d = DistanceMetric::Rgb.distance(Rgb::new(10, 0, 0), Rgb::new(13, 4, 0));
    /// assert_eq!(d, 25.0);
    /// ```
    pub fn distance(self, a: Rgb, b: Rgb) -> f64 {
        match self {
            DistanceMetric::Rgb => rgb_distance_squared(a, b) as f64,
            DistanceMetric::Ciede2000 => ciede2000(Lab::from(a), Lab::from(b)),
            DistanceMetric::Oklab => Oklab::from(a).distance_squared(Oklab::from(b)) as f64,
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a metric name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMetricError(pub String);

impl fmt::Display for ParseMetricError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown distance metric '{}' (expected rgb, ciede2000 or oklab)",
            self.0
        )
    }
}

impl std::error::Error for ParseMetricError {}

impl FromStr for DistanceMetric {
    type Err = ParseMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rgb" => Ok(DistanceMetric::Rgb),
            "ciede2000" => Ok(DistanceMetric::Ciede2000),
            "oklab" => Ok(DistanceMetric::Oklab),
            _ => Err(ParseMetricError(s.to_string())),
        }
    }
}

/// Sum of squared channel differences.
#[inline]
pub(crate) fn rgb_distance_squared(a: Rgb, b: Rgb) -> u32 {
    let dr = a.r as i32 - b.r as i32;
    let dg = a.g as i32 - b.g as i32;
    let db = a.b as i32 - b.b as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// Hue angle in degrees, normalised to [0, 360).
#[inline]
fn hue_degrees(b: f64, a: f64) -> f64 {
    if a == 0.0 && b == 0.0 {
        return 0.0;
    }
    let h = b.atan2(a).to_degrees();
    if h < 0.0 {
        h + 360.0
    } else {
        h
    }
}

/// CIEDE2000 color difference (ΔE00) between two Lab colors.
///
/// Follows Sharma, Wu and Dalal, "The CIEDE2000 Color-Difference Formula"
/// (2005), with unit weighting factors kL = kC = kH = 1.
///
/// # Example
///
/// ```
/// use place_dither::{ciede2000, Lab};
///
/// let d = ciede2000(Lab::new(50.0, 0.0, 0.0), Lab::new(50.0, -1.0, 2.0));
/// assert!((d - 2.3669).abs() < 1e-3);
/// ```
pub fn ciede2000(lab1: Lab, lab2: Lab) -> f64 {
    const POW25_7: f64 = 6_103_515_625.0; // 25^7

    let c1 = lab1.chroma();
    let c2 = lab2.chroma();
    let c_bar = (c1 + c2) / 2.0;
    let c_bar7 = c_bar.powi(7);
    let g = 0.5 * (1.0 - (c_bar7 / (c_bar7 + POW25_7)).sqrt());

    let a1p = (1.0 + g) * lab1.a;
    let a2p = (1.0 + g) * lab2.a;
    let c1p = (a1p * a1p + lab1.b * lab1.b).sqrt();
    let c2p = (a2p * a2p + lab2.b * lab2.b).sqrt();
    let h1p = hue_degrees(lab1.b, a1p);
    let h2p = hue_degrees(lab2.b, a2p);

    let dl = lab2.l - lab1.l;
    let dc = c2p - c1p;

    let chroma_product = c1p * c2p;
    let dh = if chroma_product == 0.0 {
        0.0
    } else {
        let d = h2p - h1p;
        if d > 180.0 {
            d - 360.0
        } else if d < -180.0 {
            d + 360.0
        } else {
            d
        }
    };
    let dh_big = 2.0 * chroma_product.sqrt() * (dh / 2.0).to_radians().sin();

    let l_bar = (lab1.l + lab2.l) / 2.0;
    let c_bar_p = (c1p + c2p) / 2.0;
    let h_bar = if chroma_product == 0.0 {
        h1p + h2p
    } else if (h1p - h2p).abs() <= 180.0 {
        (h1p + h2p) / 2.0
    } else if h1p + h2p < 360.0 {
        (h1p + h2p + 360.0) / 2.0
    } else {
        (h1p + h2p - 360.0) / 2.0
    };

    let t = 1.0 - 0.17 * (h_bar - 30.0).to_radians().cos()
        + 0.24 * (2.0 * h_bar).to_radians().cos()
        + 0.32 * (3.0 * h_bar + 6.0).to_radians().cos()
        - 0.20 * (4.0 * h_bar - 63.0).to_radians().cos();

    let d_theta = 30.0 * (-((h_bar - 275.0) / 25.0).powi(2)).exp();
    let c_bar_p7 = c_bar_p.powi(7);
    let rc = 2.0 * (c_bar_p7 / (c_bar_p7 + POW25_7)).sqrt();
    let l_dev = (l_bar - 50.0).powi(2);
    let sl = 1.0 + 0.015 * l_dev / (20.0 + l_dev).sqrt();
    let sc = 1.0 + 0.045 * c_bar_p;
    let sh = 1.0 + 0.015 * c_bar_p * t;
    let rt = -(2.0 * d_theta).to_radians().sin() * rc;

    let l_term = dl / sl;
    let c_term = dc / sc;
    let h_term = dh_big / sh;

    (l_term * l_term + c_term * c_term + h_term * h_term + rt * c_term * h_term)
        .max(0.0)
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_de(lab1: (f64, f64, f64), lab2: (f64, f64, f64), expected: f64) {
        let a = Lab::new(lab1.0, lab1.1, lab1.2);
        let b = Lab::new(lab2.0, lab2.1, lab2.2);
        let forward = ciede2000(a, b);
        let backward = ciede2000(b, a);
        assert!(
            (forward - expected).abs() < 1e-3,
            "ΔE00 {lab1:?} -> {lab2:?}: got {forward}, expected {expected}"
        );
        assert!((forward - backward).abs() < 1e-9, "ΔE00 must be symmetric");
    }

    /// Selected pairs from the Sharma et al. test data set.
    #[test]
    fn test_ciede2000_reference_pairs() {
        assert_de((50.0, 2.6772, -79.7751), (50.0, 0.0, -82.7485), 2.0425);
        assert_de((50.0, 0.0, 0.0), (50.0, -1.0, 2.0), 2.3669);
        assert_de((50.0, 2.5, 0.0), (73.0, 25.0, -18.0), 27.1492);
        assert_de((50.0, 2.5, 0.0), (61.0, -5.0, 29.0), 22.8977);
        assert_de((50.0, 2.5, 0.0), (56.0, -27.0, -3.0), 31.9030);
        assert_de((50.0, 2.5, 0.0), (58.0, 24.0, 15.0), 19.4535);
    }

    #[test]
    fn test_ciede2000_identity_is_zero() {
        let lab = Lab::from(Rgb::new(64, 147, 228));
        assert_eq!(ciede2000(lab, lab), 0.0);
    }

    #[test]
    fn test_rgb_distance_is_squared_euclidean() {
        assert_eq!(rgb_distance_squared(Rgb::BLACK, Rgb::WHITE), 3 * 255 * 255);
        assert_eq!(rgb_distance_squared(Rgb::new(1, 2, 3), Rgb::new(1, 2, 3)), 0);
    }

    #[test]
    fn test_every_metric_is_zero_on_identity() {
        let c = Rgb::new(237, 28, 36);
        for metric in DistanceMetric::ALL {
            assert_eq!(metric.distance(c, c), 0.0, "{metric}");
        }
    }

    #[test]
    fn test_metric_parse_and_display() {
        for metric in DistanceMetric::ALL {
            assert_eq!(metric.name().parse::<DistanceMetric>(), Ok(metric));
        }
        assert_eq!(" OKLab ".parse::<DistanceMetric>(), Ok(DistanceMetric::Oklab));
        assert!("cie76".parse::<DistanceMetric>().is_err());
        assert_eq!(DistanceMetric::default(), DistanceMetric::Rgb);
    }
}
