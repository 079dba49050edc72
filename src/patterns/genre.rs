// Genres - Style presets selecting tempo range, pattern pools, and sound palette
// Techno is the reference style; the others swap grooves but keep the arrangement

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown genre: {0}")]
pub struct UnknownGenre(pub String);

/// Musical style of the generated arrangement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    /// Techno/Acid - the 909 + 303 home style
    #[default]
    Techno,

    /// Drum & Bass - breakbeat kicks, rolling snares
    #[serde(rename = "dnb")]
    DrumAndBass,

    /// Tropical house - dembow bounce, sparse hats
    Tropical,

    /// Dubstep - half-time feel, heavy three
    Dubstep,

    /// Trance - driving four-on-floor, steady eighths
    Trance,
}

/// Tempo limits and display name for a genre
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenreConfig {
    pub name: &'static str,
    pub bpm_min: f64,
    pub bpm_max: f64,
    pub bpm_default: f64,
}

/// Stab synth voice the backend should load for a genre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabPatch {
    /// Soft three-partial saw stab
    SawStab,
    /// Detuned saws
    Reese,
    /// Metallic steel-drum pluck
    SteelPluck,
}

/// Kick drum tuning: body pitch and pitch-sweep depth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KickTuning {
    pub frequency_hz: f64,
    pub octaves: f64,
}

impl Genre {
    pub const ALL: [Genre; 5] = [
        Genre::Techno,
        Genre::DrumAndBass,
        Genre::Tropical,
        Genre::Dubstep,
        Genre::Trance,
    ];

    pub fn config(&self) -> GenreConfig {
        match self {
            Genre::Techno => GenreConfig {
                name: "Techno/Acid",
                bpm_min: 120.0,
                bpm_max: 150.0,
                bpm_default: 132.0,
            },
            Genre::DrumAndBass => GenreConfig {
                name: "Drum & Bass",
                bpm_min: 160.0,
                bpm_max: 180.0,
                bpm_default: 174.0,
            },
            Genre::Tropical => GenreConfig {
                name: "Tropical/Kygo",
                bpm_min: 100.0,
                bpm_max: 115.0,
                bpm_default: 110.0,
            },
            Genre::Dubstep => GenreConfig {
                name: "Dubstep",
                bpm_min: 138.0,
                bpm_max: 145.0,
                bpm_default: 140.0,
            },
            Genre::Trance => GenreConfig {
                name: "Trance",
                bpm_min: 135.0,
                bpm_max: 145.0,
                bpm_default: 138.0,
            },
        }
    }

    pub fn stab_patch(&self) -> StabPatch {
        match self {
            Genre::DrumAndBass | Genre::Dubstep => StabPatch::Reese,
            Genre::Tropical => StabPatch::SteelPluck,
            Genre::Techno | Genre::Trance => StabPatch::SawStab,
        }
    }

    pub fn kick_tuning(&self) -> KickTuning {
        let (frequency_hz, octaves) = match self {
            Genre::Tropical => (50.0, 6.0),
            Genre::DrumAndBass => (65.0, 3.0),
            Genre::Dubstep => (45.0, 7.0),
            Genre::Techno | Genre::Trance => (60.0, 4.0),
        };
        KickTuning {
            frequency_hz,
            octaves,
        }
    }

    /// Identifier used in config files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Techno => "techno",
            Genre::DrumAndBass => "dnb",
            Genre::Tropical => "tropical",
            Genre::Dubstep => "dubstep",
            Genre::Trance => "trance",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = UnknownGenre;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "techno" | "acid" => Ok(Genre::Techno),
            "dnb" | "drum_and_bass" => Ok(Genre::DrumAndBass),
            "tropical" => Ok(Genre::Tropical),
            "dubstep" => Ok(Genre::Dubstep),
            "trance" => Ok(Genre::Trance),
            _ => Err(UnknownGenre(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_inside_range() {
        for genre in Genre::ALL {
            let cfg = genre.config();
            assert!(cfg.bpm_min <= cfg.bpm_default && cfg.bpm_default <= cfg.bpm_max);
        }
    }

    #[test]
    fn test_genre_from_string() {
        assert_eq!("DnB".parse::<Genre>(), Ok(Genre::DrumAndBass));
        assert_eq!("techno".parse::<Genre>(), Ok(Genre::Techno));
        assert!("polka".parse::<Genre>().is_err());
        for genre in Genre::ALL {
            assert_eq!(genre.as_str().parse::<Genre>(), Ok(genre));
        }
    }

    #[test]
    fn test_sound_palette() {
        assert_eq!(Genre::Tropical.stab_patch(), StabPatch::SteelPluck);
        assert_eq!(Genre::Dubstep.stab_patch(), StabPatch::Reese);
        assert_eq!(Genre::Techno.kick_tuning().frequency_hz, 60.0);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Genre::DrumAndBass).unwrap(), "\"dnb\"");
        let g: Genre = serde_json::from_str("\"trance\"").unwrap();
        assert_eq!(g, Genre::Trance);
    }
}
