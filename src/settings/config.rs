// Engine Configuration
// JSON settings file for the host: tempo, levels, genre, mutes, humanize, and watchdog timing

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::presets::get_preset;
use crate::arranger::{DEFAULT_ENERGY, DEFAULT_TENSION};
use crate::patterns::{Genre, Instrument};

/// Tempo bounds accepted by the engine
pub const MIN_BPM: f64 = 40.0;
pub const MAX_BPM: f64 = 240.0;

/// Upper bound for any per-instrument timing jitter (seconds)
pub const MAX_JITTER: f64 = 0.05;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Failed to get config directory")]
    NoConfigDir,

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),
}

/// Per-instrument timing jitter bounds in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HumanizeConfig {
    pub enabled: bool,
    pub kick: f64,
    pub snare: f64,
    pub hihat: f64,
    pub acid: f64,
    pub stab: f64,
    pub sub: f64,
}

impl HumanizeConfig {
    /// Jitter bound for an instrument; zero when humanize is off
    pub fn amount(&self, instrument: Instrument) -> f64 {
        if !self.enabled {
            return 0.0;
        }
        match instrument {
            Instrument::Kick => self.kick,
            Instrument::Snare => self.snare,
            Instrument::Hihat => self.hihat,
            Instrument::Acid => self.acid,
            Instrument::Stab => self.stab,
            Instrument::Sub => self.sub,
        }
    }

    fn clamped(&self) -> Self {
        let bound = |v: f64, fallback: f64| if v.is_finite() { v.clamp(0.0, MAX_JITTER) } else { fallback };
        let d = HumanizeConfig::default();
        HumanizeConfig {
            enabled: self.enabled,
            kick: bound(self.kick, d.kick),
            snare: bound(self.snare, d.snare),
            hihat: bound(self.hihat, d.hihat),
            acid: bound(self.acid, d.acid),
            stab: bound(self.stab, d.stab),
            sub: bound(self.sub, d.sub),
        }
    }
}

impl Default for HumanizeConfig {
    fn default() -> Self {
        HumanizeConfig {
            enabled: true,
            kick: Instrument::Kick.default_jitter(),
            snare: Instrument::Snare.default_jitter(),
            hihat: Instrument::Hihat.default_jitter(),
            acid: Instrument::Acid.default_jitter(),
            stab: Instrument::Stab.default_jitter(),
            sub: Instrument::Sub.default_jitter(),
        }
    }
}

/// Stall detection timing, all in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchdogConfig {
    pub poll_interval_secs: f64,
    /// Time without a step callback before playback counts as stalled
    pub stall_threshold_secs: f64,
    /// Minimum time between two recoveries
    pub cooldown_secs: f64,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        WatchdogConfig {
            poll_interval_secs: 1.0,
            stall_threshold_secs: 3.0,
            cooldown_secs: 5.0,
        }
    }
}

impl WatchdogConfig {
    fn clamped(&self) -> Self {
        let d = WatchdogConfig::default();
        let positive = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };
        WatchdogConfig {
            poll_interval_secs: positive(self.poll_interval_secs, d.poll_interval_secs),
            stall_threshold_secs: positive(self.stall_threshold_secs, d.stall_threshold_secs),
            cooldown_secs: positive(self.cooldown_secs, d.cooldown_secs),
        }
    }
}

/// Startup configuration for an engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tempo; the genre default when absent
    pub bpm: Option<f64>,
    pub energy: f64,
    pub tension: f64,
    pub genre: Genre,

    /// Named preset that overrides energy and tension
    pub preset: Option<String>,

    /// Fixed seed for reproducible arrangements; entropy when absent
    pub seed: Option<u64>,

    pub mutes: BTreeMap<Instrument, bool>,
    pub humanize: HumanizeConfig,
    pub watchdog: WatchdogConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            bpm: None,
            energy: DEFAULT_ENERGY,
            tension: DEFAULT_TENSION,
            genre: Genre::default(),
            preset: None,
            seed: None,
            mutes: BTreeMap::new(),
            humanize: HumanizeConfig::default(),
            watchdog: WatchdogConfig::default(),
        }
    }
}

impl EngineConfig {
    /// `<config dir>/acidflow/config.json`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("acidflow").join("config.json"))
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load a config file, falling back to defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::info!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Write as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.preset {
            Some(name) if get_preset(name).is_none() => Err(ConfigError::UnknownPreset(name.clone())),
            _ => Ok(()),
        }
    }

    /// Tempo to start at: the configured value or the genre default, clamped
    pub fn effective_bpm(&self) -> f64 {
        match self.bpm {
            Some(bpm) if bpm.is_finite() => bpm.clamp(MIN_BPM, MAX_BPM),
            _ => self.genre.config().bpm_default,
        }
    }

    /// Copy with every value pulled into range and the preset resolved
    pub fn clamped(&self) -> Self {
        let level = |v: f64, fallback: f64| if v.is_finite() { v.clamp(0.0, 100.0) } else { fallback };

        let mut config = self.clone();
        config.bpm = self.bpm.map(|_| self.effective_bpm());
        config.energy = level(self.energy, DEFAULT_ENERGY);
        config.tension = level(self.tension, DEFAULT_TENSION);
        config.humanize = self.humanize.clamped();
        config.watchdog = self.watchdog.clamped();

        if let Some(preset) = self.preset.as_deref().and_then(get_preset) {
            config.energy = preset.energy;
            config.tension = preset.tension;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.energy, 50.0);
        assert_eq!(config.tension, 30.0);
        assert_eq!(config.genre, Genre::Techno);
        assert_eq!(config.effective_bpm(), 132.0);
        assert_eq!(config.watchdog.stall_threshold_secs, 3.0);
        assert_eq!(config.humanize.amount(Instrument::Hihat), 0.008);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "genre": "dnb", "mutes": { "hat": true } }"#).unwrap();
        assert_eq!(config.genre, Genre::DrumAndBass);
        assert_eq!(config.effective_bpm(), 174.0);
        assert_eq!(config.mutes.get(&Instrument::Hihat), Some(&true));
        assert_eq!(config.energy, DEFAULT_ENERGY);
    }

    #[test]
    fn test_clamped() {
        let config = EngineConfig {
            bpm: Some(400.0),
            energy: 150.0,
            tension: f64::NAN,
            ..EngineConfig::default()
        };
        let clamped = config.clamped();
        assert_eq!(clamped.bpm, Some(MAX_BPM));
        assert_eq!(clamped.energy, 100.0);
        assert_eq!(clamped.tension, DEFAULT_TENSION);
    }

    #[test]
    fn test_preset_overrides_levels() {
        let config = EngineConfig {
            preset: Some("dark".to_string()),
            energy: 10.0,
            ..EngineConfig::default()
        };
        let clamped = config.clamped();
        assert_eq!(clamped.energy, 40.0);
        assert_eq!(clamped.tension, 80.0);
    }

    #[test]
    fn test_humanize_disabled() {
        let humanize = HumanizeConfig { enabled: false, ..HumanizeConfig::default() };
        for instrument in Instrument::ALL {
            assert_eq!(humanize.amount(instrument), 0.0);
        }
    }

    #[test]
    fn test_watchdog_rejects_non_positive() {
        let config = EngineConfig {
            watchdog: WatchdogConfig { poll_interval_secs: 0.0, stall_threshold_secs: -1.0, cooldown_secs: 8.0 },
            ..EngineConfig::default()
        };
        let watchdog = config.clamped().watchdog;
        assert_eq!(watchdog.poll_interval_secs, 1.0);
        assert_eq!(watchdog.stall_threshold_secs, 3.0);
        assert_eq!(watchdog.cooldown_secs, 8.0);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let mut config = EngineConfig::default();
        config.genre = Genre::Trance;
        config.seed = Some(42);
        config.mutes.insert(Instrument::Acid, true);
        config.save(&path).unwrap();

        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_or_default_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let config = EngineConfig::load_or_default(&temp_dir.path().join("none.json")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_load_rejects_unknown_preset() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{ "preset": "polka" }"#).unwrap();

        assert!(matches!(EngineConfig::load(&path), Err(ConfigError::UnknownPreset(_))));
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(EngineConfig::load(&path), Err(ConfigError::Parse(_))));
    }
}
