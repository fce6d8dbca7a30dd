use place_dither::Rgb;
use serde::Serialize;

use super::presets::color_name;
use crate::services::PipelineOutput;

/// Per-color pixel counts of a finished run, as printed by the CLI.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CensusReport {
    pub width: u32,
    pub height: u32,
    /// Opaque pixels, the ones that need placing
    pub total: usize,
    pub terrain_pixels: usize,
    /// Estimated placement time for `total` pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement_seconds: Option<f64>,
    pub colors: Vec<ColorCount>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ColorCount {
    pub hex: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'static str>,
    pub count: usize,
}

impl CensusReport {
    /// Build from pipeline output; the terrain color and unused palette
    /// colors are left out, the rest is sorted by descending count.
    pub fn from_output(output: &PipelineOutput, terrain: Option<Rgb>) -> Self {
        let mut colors: Vec<ColorCount> = Vec::new();
        for &(rgb, count) in output.census.per_palette() {
            if count == 0 || Some(rgb) == terrain {
                continue;
            }
            let hex = rgb.to_string();
            // Duplicate palette entries report the same pixels.
            if colors.iter().any(|c| c.hex == hex) {
                continue;
            }
            colors.push(ColorCount {
                hex,
                name: color_name(rgb),
                count,
            });
        }
        colors.sort_by(|a, b| b.count.cmp(&a.count));
        Self {
            width: output.quantized.width(),
            height: output.quantized.height(),
            total: output.census.total(),
            terrain_pixels: output.terrain_pixels,
            placement_seconds: None,
            colors,
        }
    }

    /// Attach a placement time estimate at `seconds_per_pixel`.
    pub fn with_seconds_per_pixel(mut self, seconds_per_pixel: Option<f64>) -> Self {
        self.placement_seconds = seconds_per_pixel.map(|rate| rate * self.total as f64);
        self
    }

    pub fn to_text(&self) -> String {
        let mut out = format!(
            "{}x{}: {} pixels to place, {} terrain",
            self.width, self.height, self.total, self.terrain_pixels
        );
        if let Some(seconds) = self.placement_seconds {
            out.push_str(&format!(", about {}", format_duration(seconds)));
        }
        out.push('\n');
        for c in &self.colors {
            out.push_str(&format!(
                "  {}  {:<14} {:>8}\n",
                c.hex,
                c.name.unwrap_or("-"),
                c.count
            ));
        }
        out
    }
}

/// Whole seconds as `1d 2h 3m 4s`, leaving out zero units.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.round() as u64
    } else {
        0
    };
    let units = [
        (total / 86_400, "d"),
        (total % 86_400 / 3_600, "h"),
        (total % 3_600 / 60, "m"),
        (total % 60, "s"),
    ];
    let parts: Vec<String> = units
        .iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| format!("{value}{unit}"))
        .collect();
    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}
