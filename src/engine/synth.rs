// Synthesis Backend Abstraction
// Audio rendering lives behind this seam; the engine only issues triggers and parameter moves

use serde::Serialize;

use crate::automation::{ParamChange, RiserCommand};
use crate::harmony::Note;
use crate::patterns::{Instrument, KickTuning, StabPatch};

/// One note-on with its release already scheduled
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trigger {
    /// Pitch for melodic voices; drums ignore it
    pub note: Option<Note>,
    /// Gate length in seconds
    pub duration: f64,
    /// Context time, humanization included
    pub time: f64,
    /// [0, 1]
    pub velocity: f64,
    /// Accented acid step: louder, wider filter envelope, wetter drive
    pub accent: bool,
}

impl Trigger {
    pub fn drum(time: f64, duration: f64) -> Self {
        Trigger { note: None, duration, time, velocity: 1.0, accent: false }
    }

    pub fn note(note: Note, time: f64, duration: f64) -> Self {
        Trigger { note: Some(note), duration, time, velocity: 1.0, accent: false }
    }

    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity.clamp(0.0, 1.0);
        self
    }

    pub fn with_accent(mut self, accent: bool) -> Self {
        self.accent = accent;
        self
    }
}

/// Everything the engine asks of an audio backend.
/// Calls arrive from inside scheduler callbacks and must not block.
pub trait SynthBackend {
    fn trigger(&mut self, instrument: Instrument, trigger: Trigger);

    fn set_param(&mut self, change: ParamChange);

    fn riser(&mut self, command: RiserCommand, time: f64);

    fn set_stab_patch(&mut self, patch: StabPatch);

    fn set_kick_tuning(&mut self, tuning: KickTuning);

    /// Cut every sounding voice; called when playback stops
    fn silence(&mut self) {}
}

/// Backend that renders nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

impl SynthBackend for NullBackend {
    fn trigger(&mut self, instrument: Instrument, trigger: Trigger) {
        log::trace!("{} @ {:.3}s {:?}", instrument, trigger.time, trigger.note);
    }

    fn set_param(&mut self, _change: ParamChange) {}

    fn riser(&mut self, command: RiserCommand, time: f64) {
        log::trace!("riser {:?} @ {:.3}s", command, time);
    }

    fn set_stab_patch(&mut self, _patch: StabPatch) {}

    fn set_kick_tuning(&mut self, _tuning: KickTuning) {}
}

/// A call the engine made on a `RecordingBackend`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SynthCall {
    Trigger(Instrument, Trigger),
    Param(ParamChange),
    Riser(RiserCommand, f64),
    StabPatch(StabPatch),
    KickTuning(KickTuning),
    Silence,
}

/// Backend that keeps every call, for inspection
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    pub calls: Vec<SynthCall>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triggers(&self, instrument: Instrument) -> Vec<Trigger> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SynthCall::Trigger(i, t) if *i == instrument => Some(*t),
                _ => None,
            })
            .collect()
    }

    pub fn params(&self) -> Vec<ParamChange> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SynthCall::Param(change) => Some(*change),
                _ => None,
            })
            .collect()
    }

    pub fn riser_commands(&self) -> Vec<RiserCommand> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SynthCall::Riser(command, _) => Some(*command),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl SynthBackend for RecordingBackend {
    fn trigger(&mut self, instrument: Instrument, trigger: Trigger) {
        self.calls.push(SynthCall::Trigger(instrument, trigger));
    }

    fn set_param(&mut self, change: ParamChange) {
        self.calls.push(SynthCall::Param(change));
    }

    fn riser(&mut self, command: RiserCommand, time: f64) {
        self.calls.push(SynthCall::Riser(command, time));
    }

    fn set_stab_patch(&mut self, patch: StabPatch) {
        self.calls.push(SynthCall::StabPatch(patch));
    }

    fn set_kick_tuning(&mut self, tuning: KickTuning) {
        self.calls.push(SynthCall::KickTuning(tuning));
    }

    fn silence(&mut self) {
        self.calls.push(SynthCall::Silence);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::SynthParam;
    use crate::harmony::PitchClass;

    #[test]
    fn test_trigger_builders() {
        let t = Trigger::note(PitchClass::C.at(2), 1.0, 0.125).with_velocity(1.5).with_accent(true);
        assert_eq!(t.velocity, 1.0);
        assert!(t.accent);
        assert_eq!(Trigger::drum(0.0, 0.25).note, None);
    }

    #[test]
    fn test_recording_backend_filters() {
        let mut backend = RecordingBackend::new();
        backend.trigger(Instrument::Kick, Trigger::drum(0.0, 0.25));
        backend.trigger(Instrument::Snare, Trigger::drum(0.5, 0.25));
        backend.set_param(ParamChange::set(SynthParam::SidechainRatio, 20.0, 0.0));
        backend.riser(RiserCommand::Start, 0.0);

        assert_eq!(backend.triggers(Instrument::Kick).len(), 1);
        assert_eq!(backend.params().len(), 1);
        assert_eq!(backend.riser_commands(), vec![RiserCommand::Start]);

        backend.clear();
        assert!(backend.calls.is_empty());
    }
}
