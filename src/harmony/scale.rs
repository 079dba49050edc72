// Scale Tables - The seven-note scale every melodic line is drawn from
// Lookups are by pitch class so octave never affects membership

use serde::Serialize;

use super::note::{Note, PitchClass};

/// Number of degrees in a heptatonic scale
pub const SCALE_LENGTH: usize = 7;

/// A seven-note scale, degrees in ascending order from the tonic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scale {
    pub name: &'static str,
    pub degrees: [PitchClass; SCALE_LENGTH],
}

/// C natural minor - the home key of the arrangement
pub const C_MINOR: Scale = Scale {
    name: "C minor",
    degrees: [
        PitchClass::C,
        PitchClass::D,
        PitchClass::Eb,
        PitchClass::F,
        PitchClass::G,
        PitchClass::Ab,
        PitchClass::Bb,
    ],
};

impl Scale {
    /// Scale index of a pitch class, if it belongs to the scale
    pub fn index_of(&self, pitch: PitchClass) -> Option<usize> {
        self.degrees.iter().position(|&p| p == pitch)
    }

    pub fn contains(&self, pitch: PitchClass) -> bool {
        self.index_of(pitch).is_some()
    }

    /// Degree at any index, wrapping in both directions
    pub fn degree(&self, index: i32) -> PitchClass {
        let len = SCALE_LENGTH as i32;
        self.degrees[index.rem_euclid(len) as usize]
    }

    /// Move `steps` scale degrees from `note`, keeping its octave.
    /// Returns None when the note is outside the scale.
    pub fn step_from(&self, note: Note, steps: i32) -> Option<Note> {
        let index = self.index_of(note.pitch)? as i32;
        Some(Note::new(self.degree(index + steps), note.octave))
    }
}
