use place_dither::{BufferError, PaletteError, ParseColorError, ParseMetricError, QuantizeError};
use thiserror::Error;

use crate::services::TaskKind;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid setting {field}: {value}")]
    InvalidSettings { field: &'static str, value: String },

    #[error("Task error: {0}")]
    Task(#[from] TaskError),
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("{kind} task panicked: {message}")]
    Panicked { kind: TaskKind, message: String },

    #[error("{kind} task failed: {source}")]
    Failed {
        kind: TaskKind,
        #[source]
        source: QuantizeError,
    },

    #[error("{kind} task was aborted")]
    Aborted { kind: TaskKind },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Invalid pixel buffer: {0}")]
    Buffer(#[from] BufferError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown palette preset: {0}")]
    UnknownPreset(String),

    #[error("Invalid metric: {0}")]
    Metric(#[from] ParseMetricError),

    #[error("Invalid palette: {0}")]
    Palette(#[from] PaletteError),

    #[error("Invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("Invalid {field} color: {source}")]
    Color {
        field: &'static str,
        #[source]
        source: ParseColorError,
    },

    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_error_invalid_settings() {
        let error = PipelineError::InvalidSettings {
            field: "brightness",
            value: "140".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid setting brightness: 140");
    }

    #[test]
    fn test_task_error_panicked() {
        let error = TaskError::Panicked {
            kind: TaskKind::Dither,
            message: "boom".to_string(),
        };
        assert_eq!(error.to_string(), "dither task panicked: boom");
    }

    #[test]
    fn test_task_error_failed() {
        let error = TaskError::Failed {
            kind: TaskKind::Adjust,
            source: QuantizeError::Buffer(BufferError::SizeMismatch {
                expected: 16,
                actual: 12,
            }),
        };
        assert!(error.to_string().starts_with("adjust task failed: "));
    }

    #[test]
    fn test_task_error_aborted() {
        let error = TaskError::Aborted {
            kind: TaskKind::Adjust,
        };
        assert_eq!(error.to_string(), "adjust task was aborted");
    }

    #[test]
    fn test_pipeline_error_from_task_error() {
        let error: PipelineError = TaskError::Aborted {
            kind: TaskKind::Dither,
        }
        .into();
        match error {
            PipelineError::Task(_) => {}
            _ => panic!("Expected Task variant"),
        }
    }

    #[test]
    fn test_render_error_png_encode() {
        let error = RenderError::PngEncode("Encoding failed".to_string());
        assert_eq!(error.to_string(), "PNG encode error: Encoding failed");
    }

    #[test]
    fn test_config_error_unknown_preset() {
        let error = ConfigError::UnknownPreset("nes".to_string());
        assert_eq!(error.to_string(), "Unknown palette preset: nes");
    }

    #[test]
    fn test_config_error_invalid_value() {
        let error = ConfigError::InvalidValue {
            field: "seconds_per_pixel",
            value: "NaN".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid seconds_per_pixel: NaN");
    }

    #[test]
    fn test_config_error_color() {
        let error = ConfigError::Color {
            field: "terrain",
            source: ParseColorError::InvalidLength,
        };
        assert_eq!(
            error.to_string(),
            "Invalid terrain color: invalid hex color length (expected 3 or 6 characters)"
        );
    }
}
