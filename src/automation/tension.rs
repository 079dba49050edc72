// Tension Automation - Continuous mapping from tension to synth parameters
// Re-applied every bar and whenever the tension control moves

use serde::Serialize;

use super::params::{ParamChange, RiserCommand, SynthParam};
use crate::arranger::Section;

/// Tension above which the riser runs
pub const RISER_THRESHOLD: f64 = 60.0;

/// Tension above which the master high-pass starts trimming low end
pub const HIGHPASS_THRESHOLD: f64 = 80.0;

/// Riser release time in seconds
pub const RISER_RELEASE: f64 = 0.5;

/// Glide time for the continuous filter moves
const TENSION_GLIDE: f64 = 0.5;

/// Resting sidechain ratio between kick pumps
pub const SIDECHAIN_REST_RATIO: f64 = 8.0;

/// Parameter targets for one tension value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TensionTargets {
    pub acid_cutoff_hz: f64,
    pub acid2_cutoff_hz: f64,
    pub acid_q: f64,
    pub acid2_q: f64,
    pub distortion: f64,
    pub highpass_hz: f64,
    pub sidechain_ratio: f64,
}

impl TensionTargets {
    /// Pure mapping; `tension` is clamped to [0, 100]
    pub fn for_tension(tension: f64) -> Self {
        let t = tension.clamp(0.0, 100.0);
        let cutoff = 300.0 + t * 15.0 + t * 25.0;
        let highpass_hz = if t > HIGHPASS_THRESHOLD {
            100.0 + (t - HIGHPASS_THRESHOLD) * 10.0
        } else {
            20.0
        };

        TensionTargets {
            acid_cutoff_hz: cutoff,
            acid2_cutoff_hz: cutoff * 0.9,
            acid_q: 4.0 + (t / 100.0) * 12.0,
            acid2_q: 2.0 + (t / 100.0) * 4.0,
            distortion: 0.3 + (t / 100.0) * 0.4,
            highpass_hz,
            sidechain_ratio: SIDECHAIN_REST_RATIO + (t / 100.0) * 12.0,
        }
    }
}

/// Output of one automation pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AutomationFrame {
    pub changes: Vec<ParamChange>,
    pub riser: Option<RiserCommand>,
}

/// Tension automation with the riser's on/off state
#[derive(Debug, Clone, Default)]
pub struct TensionAutomation {
    riser_active: bool,
}

impl TensionAutomation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn riser_active(&self) -> bool {
        self.riser_active
    }

    /// Forget the riser state (the backend voice is silenced on stop)
    pub fn reset(&mut self) {
        self.riser_active = false;
    }

    /// Map tension to parameter moves starting at `now`.
    /// The riser only starts or releases on a threshold crossing.
    pub fn apply(&mut self, tension: f64, now: f64) -> AutomationFrame {
        let t = tension.clamp(0.0, 100.0);
        let targets = TensionTargets::for_tension(t);

        let mut changes = vec![
            ParamChange::linear(SynthParam::AcidFilterCutoff, targets.acid_cutoff_hz, now, TENSION_GLIDE),
            ParamChange::linear(SynthParam::AcidFilter2Cutoff, targets.acid2_cutoff_hz, now, TENSION_GLIDE),
            ParamChange::set(SynthParam::AcidFilterQ, targets.acid_q, now),
            ParamChange::set(SynthParam::AcidFilter2Q, targets.acid2_q, now),
            ParamChange::set(SynthParam::AcidDistortion, targets.distortion, now),
            ParamChange::exponential(SynthParam::MasterHighpassCutoff, targets.highpass_hz, now, TENSION_GLIDE),
            ParamChange::set(SynthParam::SidechainRatio, targets.sidechain_ratio, now),
        ];

        let riser = if t > RISER_THRESHOLD && !self.riser_active {
            self.riser_active = true;
            Some(RiserCommand::Start)
        } else if t <= RISER_THRESHOLD && self.riser_active {
            self.riser_active = false;
            Some(RiserCommand::Release)
        } else {
            None
        };

        if self.riser_active {
            changes.push(ParamChange::set(SynthParam::RiserVolume, -40.0 + (t - RISER_THRESHOLD) * 0.5, now));
        }

        AutomationFrame { changes, riser }
    }
}

/// Kick pump: slam the sidechain ratio and let it recover over 100 ms
pub fn kick_pump(time: f64) -> [ParamChange; 2] {
    [
        ParamChange::set(SynthParam::SidechainRatio, 20.0, time),
        ParamChange::linear(SynthParam::SidechainRatio, SIDECHAIN_REST_RATIO, time, 0.1),
    ]
}

/// Stab filter for the section: open in DROP, easing open in BUILD
pub fn stab_filter(section: Section, time: f64) -> ParamChange {
    match section {
        Section::Drop => ParamChange::set(SynthParam::StabFilterCutoff, 3500.0, time),
        Section::Build => ParamChange::exponential(SynthParam::StabFilterCutoff, 2500.0, time, 0.2),
        _ => ParamChange::set(SynthParam::StabFilterCutoff, 2000.0, time),
    }
}
