// Engine Status - Serializable snapshot for displays and the host

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use crate::arranger::Section;
use crate::patterns::{Genre, Instrument};

/// Playback lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

/// The section coming up and how far away it is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NextSection {
    pub section: Section,
    pub bars_until: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineStatus {
    pub state: PlaybackState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<Uuid>,
    /// Bar currently sounding (the next bar to play when nothing has sounded yet)
    pub bar: u64,
    pub section: Section,
    pub chord: String,
    pub next_section: NextSection,
    pub energy: f64,
    pub tension: f64,
    pub bpm: f64,
    pub genre: Genre,
    pub mutes: BTreeMap<Instrument, bool>,
    pub watchdog_recoveries: u64,
}

impl EngineStatus {
    /// "MAIN | bar 17 | Cm | BREAK in 15 bars" style summary line
    pub fn summary(&self) -> String {
        let next = if self.next_section.bars_until == 1 {
            format!("{} next bar", self.next_section.section)
        } else {
            format!("{} in {} bars", self.next_section.section, self.next_section.bars_until)
        };
        format!("{} | bar {} | {} | {}", self.section, self.bar, self.chord, next)
    }
}
