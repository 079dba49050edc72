// Arrangement State - Bar counter, progression choice, and chord cadence
// Mutated once per bar by the scheduler and by the setter surface in between

use std::collections::BTreeMap;

use rand::Rng;
use serde::Serialize;

use super::section::{get_section, Section};
use crate::harmony::{ChordInfo, ProgressionKind};
use crate::patterns::Instrument;

/// Default energy level for a fresh engine
pub const DEFAULT_ENERGY: f64 = 50.0;

/// Default tension level for a fresh engine
pub const DEFAULT_TENSION: f64 = 30.0;

/// Choose the progression for a section.
///
/// BREAK and DROP are fixed. Elsewhere the first half of every 16-bar block
/// uses the main progression and the back half picks a variation uniformly.
pub fn select_progression<R: Rng + ?Sized>(section: Section, bar: u64, rng: &mut R) -> ProgressionKind {
    match section {
        Section::Break => ProgressionKind::Breakdown,
        Section::Drop => ProgressionKind::Variation2,
        _ if bar % 16 < 8 => ProgressionKind::Main,
        _ => {
            if rng.gen_bool(0.5) {
                ProgressionKind::Variation1
            } else {
                ProgressionKind::Variation2
            }
        }
    }
}

/// What the arranger resolved for the bar about to play
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarContext {
    pub bar: u64,
    pub section: Section,

    /// Set exactly once per section change: (previous, new).
    /// The previous section is None straight after a reset.
    pub section_change: Option<(Option<Section>, Section)>,

    pub progression: ProgressionKind,
    pub chord_index: usize,
    pub chord: ChordInfo,
}

/// Mutable arrangement state for one playback session
#[derive(Debug, Clone, Serialize)]
pub struct ArrangementState {
    pub current_bar: u64,
    pub current_chord_index: usize,
    pub current_progression: Option<ProgressionKind>,
    pub last_section: Option<Section>,
    energy_level: f64,
    tension_level: f64,
    mute_states: BTreeMap<Instrument, bool>,
}

impl ArrangementState {
    pub fn new() -> Self {
        ArrangementState {
            current_bar: 0,
            current_chord_index: 0,
            current_progression: None,
            last_section: None,
            energy_level: DEFAULT_ENERGY,
            tension_level: DEFAULT_TENSION,
            mute_states: Instrument::ALL.iter().map(|i| (*i, false)).collect(),
        }
    }

    /// Reset the playback position. Energy, tension, and mutes are user
    /// preferences and survive.
    pub fn reset(&mut self) {
        self.current_bar = 0;
        self.current_chord_index = 0;
        self.current_progression = None;
        self.last_section = None;
    }

    pub fn energy(&self) -> f64 {
        self.energy_level
    }

    pub fn tension(&self) -> f64 {
        self.tension_level
    }

    /// Clamp to [0, 100]. Non-finite input is ignored. Returns the stored level.
    pub fn set_energy(&mut self, level: f64) -> f64 {
        if level.is_finite() {
            self.energy_level = level.clamp(0.0, 100.0);
        }
        self.energy_level
    }

    /// Clamp to [0, 100]. Non-finite input is ignored. Returns the stored level.
    pub fn set_tension(&mut self, level: f64) -> f64 {
        if level.is_finite() {
            self.tension_level = level.clamp(0.0, 100.0);
        }
        self.tension_level
    }

    pub fn is_muted(&self, instrument: Instrument) -> bool {
        self.mute_states.get(&instrument).copied().unwrap_or(false)
    }

    pub fn set_muted(&mut self, instrument: Instrument, muted: bool) {
        self.mute_states.insert(instrument, muted);
    }

    /// Flip a track's mute state and return the new state
    pub fn toggle_mute(&mut self, instrument: Instrument) -> bool {
        let muted = !self.is_muted(instrument);
        self.set_muted(instrument, muted);
        muted
    }

    pub fn mute_states(&self) -> &BTreeMap<Instrument, bool> {
        &self.mute_states
    }

    /// The chord the current index points at, or the bare root before the
    /// first bar has resolved a progression
    pub fn current_chord(&self) -> ChordInfo {
        match self.current_progression {
            Some(progression) => progression.chord_at(self.current_chord_index),
            None => ChordInfo::FALLBACK,
        }
    }

    /// Resolve section, progression, and chord for the current bar.
    /// Does not advance the bar.
    pub fn enter_bar<R: Rng + ?Sized>(&mut self, rng: &mut R) -> BarContext {
        let bar = self.current_bar;
        let section = get_section(bar);

        let section_change = if self.last_section != Some(section) {
            let previous = self.last_section;
            self.last_section = Some(section);
            Some((previous, section))
        } else {
            None
        };

        let progression = match self.current_progression {
            Some(current) if bar % 8 != 0 && section_change.is_none() => current,
            _ => {
                let selected = select_progression(section, bar, rng);
                log::debug!("Bar {}: {} progression {:?}", bar, section, selected);
                self.current_progression = Some(selected);
                selected
            }
        };

        if section == Section::Break {
            self.current_chord_index = 0;
        }

        let chord_index = self.current_chord_index % progression.len().max(1);
        BarContext {
            bar,
            section,
            section_change,
            progression,
            chord_index,
            chord: progression.chord_at(chord_index),
        }
    }

    /// Apply the chord cadence for the bar just played and move to the next bar.
    ///
    /// DROP and MAIN move every bar, BREAK holds the first chord, everything
    /// else moves on bars divisible by four.
    pub fn advance(&mut self) {
        let bar = self.current_bar;
        let len = self.current_progression.map(|p| p.len()).unwrap_or(4).max(1);

        match get_section(bar) {
            Section::Drop | Section::Main => {
                self.current_chord_index = (self.current_chord_index + 1) % len;
            }
            Section::Break => {
                self.current_chord_index = 0;
            }
            _ => {
                if bar % 4 == 0 {
                    self.current_chord_index = (self.current_chord_index + 1) % len;
                }
            }
        }

        self.current_bar += 1;
    }
}

impl Default for ArrangementState {
    fn default() -> Self {
        Self::new()
    }
}
