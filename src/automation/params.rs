// Synth Parameters - Targets and ramp shapes the synthesis backend must honour

use serde::{Deserialize, Serialize};

/// Automatable synthesis parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthParam {
    /// First stage of the cascaded acid low-pass (Hz)
    AcidFilterCutoff,
    /// Second stage of the cascaded acid low-pass (Hz)
    AcidFilter2Cutoff,
    AcidFilterQ,
    AcidFilter2Q,
    /// Acid overdrive amount [0, 1]
    AcidDistortion,
    /// Master tonal-balance high-pass (Hz)
    MasterHighpassCutoff,
    /// Sidechain compressor ratio
    SidechainRatio,
    /// Noise riser level (dB)
    RiserVolume,
    /// Stab low-pass (Hz)
    StabFilterCutoff,
    /// Kick body pitch (Hz)
    KickPitch,
    /// Kick pitch-sweep depth (octaves)
    KickOctaves,
}

/// How a parameter reaches its target
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "seconds", rename_all = "snake_case")]
pub enum Ramp {
    Instant,
    Linear(f64),
    Exponential(f64),
}

impl Ramp {
    pub fn duration(&self) -> f64 {
        match self {
            Ramp::Instant => 0.0,
            Ramp::Linear(secs) | Ramp::Exponential(secs) => *secs,
        }
    }
}

/// A scheduled parameter move
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamChange {
    pub param: SynthParam,
    pub value: f64,
    /// When the move starts (transport context seconds)
    pub time: f64,
    pub ramp: Ramp,
}

impl ParamChange {
    pub fn set(param: SynthParam, value: f64, time: f64) -> Self {
        ParamChange { param, value, time, ramp: Ramp::Instant }
    }

    pub fn linear(param: SynthParam, value: f64, time: f64, seconds: f64) -> Self {
        ParamChange { param, value, time, ramp: Ramp::Linear(seconds) }
    }

    pub fn exponential(param: SynthParam, value: f64, time: f64, seconds: f64) -> Self {
        ParamChange { param, value, time, ramp: Ramp::Exponential(seconds) }
    }

    /// Time at which the target value is reached
    pub fn end_time(&self) -> f64 {
        self.time + self.ramp.duration()
    }
}

/// Noise riser gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiserCommand {
    /// Start the noise and open its slow attack envelope
    Start,
    /// Release the envelope and stop the noise once the release has run
    Release,
}
