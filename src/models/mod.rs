pub mod config;
pub mod presets;
pub mod report;
pub mod settings;

pub use config::AppConfig;
pub use presets::{color_name, find_preset, Preset, DEFAULT_PRESET, PRESETS};
pub use report::{CensusReport, ColorCount};
pub use settings::ProcessingSettings;
