// Harmony - Notes, the home scale, and chord progression tables

pub mod note;
pub mod progression;
pub mod scale;

pub use note::{Note, NoteParseError, PitchClass};
pub use progression::{ChordInfo, ProgressionKind};
pub use scale::{Scale, C_MINOR, SCALE_LENGTH};
