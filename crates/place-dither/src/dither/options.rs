//! Quantizer configuration.

use crate::palette::DistanceMetric;

/// Configuration for [`Quantizer`](super::Quantizer).
///
/// # Defaults
///
/// - Intensity: 1.0 (full Floyd-Steinberg diffusion)
/// - Metric: [`DistanceMetric::Rgb`]
///
/// # Example
///
/// ```
/// use place_dither::{DistanceMetric, QuantizeOptions};
///
/// let options = QuantizeOptions::new()
///     .intensity(0.5)
///     .metric(DistanceMetric::Oklab);
/// assert_eq!(options.intensity, 0.5);
///
/// // Non-finite intensity disables diffusion.
/// assert_eq!(QuantizeOptions::new().intensity(f32::NAN).intensity, 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantizeOptions {
    /// Fraction of the quantization error propagated to neighbours, 0.0..=1.0.
    ///
    /// 0.0 is plain nearest-color mapping.
    pub intensity: f32,

    /// Metric used to pick the nearest palette color.
    pub metric: DistanceMetric,
}

impl Default for QuantizeOptions {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            metric: DistanceMetric::Rgb,
        }
    }
}

impl QuantizeOptions {
    /// Create options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set dither intensity, clamped to 0.0..=1.0. NaN and infinities
    /// become 0.0.
    #[inline]
    pub fn intensity(mut self, intensity: f32) -> Self {
        self.intensity = if intensity.is_finite() {
            intensity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    /// Set the distance metric.
    #[inline]
    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }
}
