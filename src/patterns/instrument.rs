// Instruments - The six voices of the arrangement
// Track names match what the settings UI stores for mute toggles

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A sequenced voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instrument {
    Kick,
    Snare,
    #[serde(rename = "hat", alias = "hihat")]
    Hihat,
    Acid,
    Stab,
    Sub,
}

impl Instrument {
    pub const ALL: [Instrument; 6] = [
        Instrument::Kick,
        Instrument::Snare,
        Instrument::Hihat,
        Instrument::Acid,
        Instrument::Stab,
        Instrument::Sub,
    ];

    /// Track name used by mute toggles
    pub fn track_name(&self) -> &'static str {
        match self {
            Instrument::Kick => "kick",
            Instrument::Snare => "snare",
            Instrument::Hihat => "hat",
            Instrument::Acid => "acid",
            Instrument::Stab => "stab",
            Instrument::Sub => "sub",
        }
    }

    /// Timing jitter bound in seconds. Kicks stay tightest, hats loosest.
    pub fn default_jitter(&self) -> f64 {
        match self {
            Instrument::Kick => 0.003,
            Instrument::Snare => 0.005,
            Instrument::Hihat => 0.008,
            Instrument::Acid => 0.004,
            Instrument::Stab => 0.006,
            Instrument::Sub => 0.003,
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.track_name())
    }
}

impl FromStr for Instrument {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kick" => Ok(Instrument::Kick),
            "snare" => Ok(Instrument::Snare),
            "hat" | "hihat" => Ok(Instrument::Hihat),
            "acid" => Ok(Instrument::Acid),
            "stab" => Ok(Instrument::Stab),
            "sub" => Ok(Instrument::Sub),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_names_round_trip() {
        for inst in Instrument::ALL {
            assert_eq!(inst.track_name().parse::<Instrument>(), Ok(inst));
        }
        assert_eq!("HiHat".parse::<Instrument>(), Ok(Instrument::Hihat));
        assert!("cowbell".parse::<Instrument>().is_err());
    }

    #[test]
    fn test_kick_is_tightest() {
        let kick = Instrument::Kick.default_jitter();
        assert!(Instrument::ALL.iter().all(|i| i.default_jitter() >= kick));
        assert!(Instrument::ALL
            .iter()
            .all(|i| i.default_jitter() <= Instrument::Hihat.default_jitter()));
    }

    #[test]
    fn test_serde_uses_track_names() {
        assert_eq!(serde_json::to_string(&Instrument::Hihat).unwrap(), "\"hat\"");
        let parsed: Instrument = serde_json::from_str("\"hihat\"").unwrap();
        assert_eq!(parsed, Instrument::Hihat);
    }
}
