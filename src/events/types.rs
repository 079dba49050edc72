// Music Event Types
// Closed set of broadcast events; consumers pattern-match instead of comparing names

use serde::{Deserialize, Serialize};

use crate::arranger::Section;
use crate::harmony::{ChordInfo, Note};
use crate::patterns::Instrument;

/// A broadcast event from the engine.
///
/// Trigger times are in transport context seconds and already include
/// humanization. Consumers must not jitter them again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MusicEvent {
    Kick { time: f64 },
    Snare { time: f64 },
    Hihat { time: f64 },
    Acid { time: f64, note: Note },
    Stab { time: f64 },
    Sub { time: f64, note: Note },

    /// Fired once per bar before any of its steps
    Bar { bar: u64 },
    /// Fired once per section change, before that bar's BAR event
    Section { section: Section },

    TempoChange { bpm: f64 },
    EnergyChange { level: f64 },
    TensionChange { level: f64 },
    TrackMute { track: String },
    TrackUnmute { track: String },
}

impl MusicEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            MusicEvent::Kick { .. } => EventKind::Kick,
            MusicEvent::Snare { .. } => EventKind::Snare,
            MusicEvent::Hihat { .. } => EventKind::Hihat,
            MusicEvent::Acid { .. } => EventKind::Acid,
            MusicEvent::Stab { .. } => EventKind::Stab,
            MusicEvent::Sub { .. } => EventKind::Sub,
            MusicEvent::Bar { .. } => EventKind::Bar,
            MusicEvent::Section { .. } => EventKind::Section,
            MusicEvent::TempoChange { .. } => EventKind::TempoChange,
            MusicEvent::EnergyChange { .. } => EventKind::EnergyChange,
            MusicEvent::TensionChange { .. } => EventKind::TensionChange,
            MusicEvent::TrackMute { .. } => EventKind::TrackMute,
            MusicEvent::TrackUnmute { .. } => EventKind::TrackUnmute,
        }
    }

    /// The trigger event for an instrument hit.
    /// Pitched voices without a note fall back to the root.
    pub fn trigger(instrument: Instrument, time: f64, note: Option<Note>) -> Self {
        let pitched = note.unwrap_or(ChordInfo::FALLBACK.bass);
        match instrument {
            Instrument::Kick => MusicEvent::Kick { time },
            Instrument::Snare => MusicEvent::Snare { time },
            Instrument::Hihat => MusicEvent::Hihat { time },
            Instrument::Stab => MusicEvent::Stab { time },
            Instrument::Acid => MusicEvent::Acid { time, note: pitched },
            Instrument::Sub => MusicEvent::Sub { time, note: pitched },
        }
    }

    /// Trigger time for instrument events
    pub fn time(&self) -> Option<f64> {
        match self {
            MusicEvent::Kick { time }
            | MusicEvent::Snare { time }
            | MusicEvent::Hihat { time }
            | MusicEvent::Stab { time }
            | MusicEvent::Acid { time, .. }
            | MusicEvent::Sub { time, .. } => Some(*time),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().to_string()
    }
}

/// Event name without payload, for filtered subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Kick,
    Snare,
    Hihat,
    Acid,
    Stab,
    Sub,
    Bar,
    Section,
    TempoChange,
    EnergyChange,
    TensionChange,
    TrackMute,
    TrackUnmute,
}

impl EventKind {
    pub const ALL: [EventKind; 13] = [
        EventKind::Kick,
        EventKind::Snare,
        EventKind::Hihat,
        EventKind::Acid,
        EventKind::Stab,
        EventKind::Sub,
        EventKind::Bar,
        EventKind::Section,
        EventKind::TempoChange,
        EventKind::EnergyChange,
        EventKind::TensionChange,
        EventKind::TrackMute,
        EventKind::TrackUnmute,
    ];

    /// Parse a wire name such as "TEMPO_CHANGE"
    pub fn from_string(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.to_string() == s)
    }

    /// Wire name
    pub fn to_string(&self) -> &'static str {
        match self {
            EventKind::Kick => "KICK",
            EventKind::Snare => "SNARE",
            EventKind::Hihat => "HIHAT",
            EventKind::Acid => "ACID",
            EventKind::Stab => "STAB",
            EventKind::Sub => "SUB",
            EventKind::Bar => "BAR",
            EventKind::Section => "SECTION",
            EventKind::TempoChange => "TEMPO_CHANGE",
            EventKind::EnergyChange => "ENERGY_CHANGE",
            EventKind::TensionChange => "TENSION_CHANGE",
            EventKind::TrackMute => "TRACK_MUTE",
            EventKind::TrackUnmute => "TRACK_UNMUTE",
        }
    }

    /// True for the six instrument trigger events
    pub fn is_trigger(&self) -> bool {
        matches!(
            self,
            EventKind::Kick
                | EventKind::Snare
                | EventKind::Hihat
                | EventKind::Acid
                | EventKind::Stab
                | EventKind::Sub
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harmony::PitchClass;

    #[test]
    fn test_wire_format() {
        let event = MusicEvent::Acid { time: 1.5, note: PitchClass::Eb.at(3) };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "ACID");
        assert_eq!(json["note"], "Eb3");
        assert_eq!(json["time"], 1.5);

        let json = serde_json::to_value(MusicEvent::TempoChange { bpm: 140.0 }).unwrap();
        assert_eq!(json["event"], "TEMPO_CHANGE");

        let json = serde_json::to_value(MusicEvent::Section { section: Section::Drop }).unwrap();
        assert_eq!(json["section"], "DROP");
    }

    #[test]
    fn test_kind_names_match_wire_tags() {
        let events = [
            MusicEvent::Hihat { time: 0.0 },
            MusicEvent::Bar { bar: 3 },
            MusicEvent::TrackUnmute { track: "hat".to_string() },
        ];
        for event in events {
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["event"], event.name());
        }
    }

    #[test]
    fn test_kind_from_string() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_string(kind.to_string()), Some(kind));
        }
        assert_eq!(EventKind::from_string("CLAP"), None);
    }

    #[test]
    fn test_trigger_constructor() {
        let note = PitchClass::C.at(1);
        assert_eq!(
            MusicEvent::trigger(Instrument::Sub, 2.0, Some(note)),
            MusicEvent::Sub { time: 2.0, note }
        );
        assert_eq!(MusicEvent::trigger(Instrument::Kick, 2.0, None).kind(), EventKind::Kick);
        assert_eq!(MusicEvent::trigger(Instrument::Stab, 0.5, None).time(), Some(0.5));
        assert_eq!(MusicEvent::Bar { bar: 1 }.time(), None);
    }
}
