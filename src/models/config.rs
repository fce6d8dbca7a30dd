use place_dither::{DistanceMetric, Palette, Rgb};
use serde::Deserialize;
use std::path::Path;

use super::presets::{find_preset, DEFAULT_PRESET};
use crate::error::ConfigError;

/// Application configuration loaded from a YAML file.
///
/// Every field is optional in the file; command-line flags override
/// whatever ends up here.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Brightness control, 0..=100 (50 leaves the image unchanged)
    #[serde(default = "default_tone")]
    pub brightness: f32,

    /// Contrast control, 0..=100
    #[serde(default = "default_tone")]
    pub contrast: f32,

    /// Saturation control, 0..=100
    #[serde(default = "default_tone")]
    pub saturation: f32,

    /// Dither strength, 0..=100 (0 is nearest color only)
    #[serde(default = "default_dither")]
    pub dither: f32,

    /// Distance metric name: rgb, ciede2000 or oklab
    #[serde(default = "default_metric")]
    pub metric: String,

    /// Built-in palette preset name
    #[serde(default = "default_palette")]
    pub palette: String,

    /// Explicit hex colors, replacing the preset when set
    #[serde(default)]
    pub colors: Option<Vec<String>>,

    /// Color that becomes transparent after quantization
    #[serde(default)]
    pub terrain: Option<String>,

    /// Resize with nearest-neighbour instead of bilinear filtering
    #[serde(default)]
    pub pixel_mode: bool,

    /// Placement rate used for the time estimate in the census report;
    /// no estimate is shown when unset
    #[serde(default)]
    pub seconds_per_pixel: Option<f64>,
}

fn default_tone() -> f32 {
    50.0
}

fn default_dither() -> f32 {
    100.0
}

fn default_metric() -> String {
    DistanceMetric::default().name().to_string()
}

fn default_palette() -> String {
    DEFAULT_PRESET.to_string()
}

impl AppConfig {
    /// Load configuration, falling back to defaults on any failure.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::debug!("No config file configured, using defaults");
            return Self::default();
        };
        match Self::from_file(path) {
            Ok(config) => {
                tracing::info!(
                    path = %path.display(),
                    palette = %config.palette,
                    metric = %config.metric,
                    "Loaded configuration"
                );
                config
            }
            Err(ConfigError::Io(e)) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
            Err(e) => {
                tracing::warn!(
                    %e,
                    path = %path.display(),
                    "Failed to parse config, using defaults"
                );
                Self::default()
            }
        }
    }

    /// Strictly read and parse a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty map.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn resolve_metric(&self) -> Result<DistanceMetric, ConfigError> {
        Ok(self.metric.parse::<DistanceMetric>()?)
    }

    /// The palette to quantize against: explicit colors win over the preset.
    pub fn resolve_palette(&self) -> Result<Palette, ConfigError> {
        if let Some(colors) = &self.colors {
            let refs: Vec<&str> = colors.iter().map(String::as_str).collect();
            return Ok(Palette::from_hex(&refs)?);
        }
        find_preset(&self.palette)
            .map(|p| p.palette())
            .ok_or_else(|| ConfigError::UnknownPreset(self.palette.clone()))
    }

    pub fn resolve_seconds_per_pixel(&self) -> Result<Option<f64>, ConfigError> {
        match self.seconds_per_pixel {
            Some(rate) if !rate.is_finite() || rate < 0.0 => Err(ConfigError::InvalidValue {
                field: "seconds_per_pixel",
                value: rate.to_string(),
            }),
            rate => Ok(rate),
        }
    }

    pub fn resolve_terrain(&self) -> Result<Option<Rgb>, ConfigError> {
        self.terrain
            .as_deref()
            .map(|hex| {
                hex.parse::<Rgb>().map_err(|source| ConfigError::Color {
                    field: "terrain",
                    source,
                })
            })
            .transpose()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            brightness: default_tone(),
            contrast: default_tone(),
            saturation: default_tone(),
            dither: default_dither(),
            metric: default_metric(),
            palette: default_palette(),
            colors: None,
            terrain: None,
            pixel_mode: false,
            seconds_per_pixel: None,
        }
    }
}
