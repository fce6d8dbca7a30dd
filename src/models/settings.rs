use place_dither::{DistanceMetric, Palette, Rgb, ToneAdjustment};

use super::config::AppConfig;
use crate::error::{ConfigError, PipelineError};

/// Everything one pipeline run needs, resolved from configuration and CLI.
#[derive(Debug, Clone)]
pub struct ProcessingSettings {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    /// Dither strength, 0..=100
    pub dither: f32,
    pub metric: DistanceMetric,
    pub palette: Palette,
    pub terrain: Option<Rgb>,
    /// Output size in pixels
    pub width: u32,
    pub height: u32,
    pub pixel_mode: bool,
}

impl ProcessingSettings {
    /// Identity tone controls, full dithering, RGB metric, no terrain.
    pub fn new(palette: Palette, width: u32, height: u32) -> Self {
        Self {
            brightness: 50.0,
            contrast: 50.0,
            saturation: 50.0,
            dither: 100.0,
            metric: DistanceMetric::default(),
            palette,
            terrain: None,
            width,
            height,
            pixel_mode: false,
        }
    }

    pub fn from_config(config: &AppConfig, width: u32, height: u32) -> Result<Self, ConfigError> {
        Ok(Self {
            brightness: config.brightness,
            contrast: config.contrast,
            saturation: config.saturation,
            dither: config.dither,
            metric: config.resolve_metric()?,
            palette: config.resolve_palette()?,
            terrain: config.resolve_terrain()?,
            width,
            height,
            pixel_mode: config.pixel_mode,
        })
    }

    /// Reject out-of-range controls and empty output sizes.
    pub fn validate(&self) -> Result<(), PipelineError> {
        let controls = [
            ("brightness", self.brightness),
            ("contrast", self.contrast),
            ("saturation", self.saturation),
            ("dither", self.dither),
        ];
        for (field, value) in controls {
            if !(0.0..=100.0).contains(&value) {
                return Err(PipelineError::InvalidSettings {
                    field,
                    value: value.to_string(),
                });
            }
        }
        for (field, value) in [("width", self.width), ("height", self.height)] {
            if value == 0 {
                return Err(PipelineError::InvalidSettings {
                    field,
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn tone(&self) -> ToneAdjustment {
        ToneAdjustment::new()
            .brightness(self.brightness)
            .contrast(self.contrast)
            .saturation(self.saturation)
    }

    /// Dither intensity in 0..=1.
    pub fn intensity(&self) -> f32 {
        self.dither / 100.0
    }
}
