// Settings module
// Engine configuration file and named music presets

pub mod config;
pub mod presets;

// Re-export main types
pub use config::{ConfigError, EngineConfig, HumanizeConfig, WatchdogConfig, MAX_BPM, MIN_BPM};
pub use presets::{get_preset, list_preset_names, MusicPreset, PRESETS};
