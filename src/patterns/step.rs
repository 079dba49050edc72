// Step Patterns - Fixed 16-step bars of triggers and notes
// Every pattern in the engine is exactly one bar long

use serde::{Deserialize, Serialize};

use crate::harmony::Note;

/// Steps in one bar (sixteenth notes in 4/4)
pub const STEPS_PER_BAR: usize = 16;

/// Which of the 16 steps trigger an instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StepPattern(pub [bool; STEPS_PER_BAR]);

impl StepPattern {
    /// Build from 0/1 literals, which is how the bank is written
    pub const fn from_bits(bits: [u8; STEPS_PER_BAR]) -> Self {
        let mut steps = [false; STEPS_PER_BAR];
        let mut i = 0;
        while i < STEPS_PER_BAR {
            steps[i] = bits[i] != 0;
            i += 1;
        }
        StepPattern(steps)
    }

    pub const fn silent() -> Self {
        StepPattern([false; STEPS_PER_BAR])
    }

    pub const fn full() -> Self {
        StepPattern([true; STEPS_PER_BAR])
    }

    /// Single hit on one step
    pub const fn single(step: usize) -> Self {
        let mut steps = [false; STEPS_PER_BAR];
        steps[step % STEPS_PER_BAR] = true;
        StepPattern(steps)
    }

    pub fn is_active(&self, step: usize) -> bool {
        self.0[step % STEPS_PER_BAR]
    }

    pub fn set(&mut self, step: usize, active: bool) {
        self.0[step % STEPS_PER_BAR] = active;
    }

    /// Indices of active steps
    pub fn active_steps(&self) -> Vec<usize> {
        (0..STEPS_PER_BAR).filter(|&i| self.0[i]).collect()
    }

    pub fn hit_count(&self) -> usize {
        self.0.iter().filter(|&&s| s).count()
    }

    pub fn is_silent(&self) -> bool {
        self.hit_count() == 0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for StepPattern {
    fn default() -> Self {
        StepPattern::silent()
    }
}

/// A bar of pitched steps; `None` is a rest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSequence(pub [Option<Note>; STEPS_PER_BAR]);

impl NoteSequence {
    pub const fn rest() -> Self {
        NoteSequence([None; STEPS_PER_BAR])
    }

    /// Place `note` on every active step of `rhythm`
    pub fn from_rhythm(rhythm: &StepPattern, note: Note) -> Self {
        let mut steps = [None; STEPS_PER_BAR];
        for (slot, active) in steps.iter_mut().zip(rhythm.0.iter()) {
            if *active {
                *slot = Some(note);
            }
        }
        NoteSequence(steps)
    }

    pub fn note_at(&self, step: usize) -> Option<Note> {
        self.0[step % STEPS_PER_BAR]
    }

    /// Last sounding note, used to seed the next bar's line
    pub fn last_note(&self) -> Option<Note> {
        self.0.iter().rev().find_map(|n| *n)
    }

    pub fn notes(&self) -> impl Iterator<Item = (usize, Note)> + '_ {
        self.0.iter().enumerate().filter_map(|(i, n)| n.map(|n| (i, n)))
    }

    /// Rhythm of this sequence with pitch removed
    pub fn rhythm(&self) -> StepPattern {
        let mut steps = [false; STEPS_PER_BAR];
        for (i, n) in self.0.iter().enumerate() {
            steps[i] = n.is_some();
        }
        StepPattern(steps)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for NoteSequence {
    fn default() -> Self {
        NoteSequence::rest()
    }
}
