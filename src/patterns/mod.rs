// Patterns - Step grids, the named pattern bank, instruments, and genres

pub mod bank;
pub mod genre;
pub mod instrument;
pub mod step;

pub use genre::{Genre, GenreConfig, KickTuning, StabPatch, UnknownGenre};
pub use instrument::Instrument;
pub use step::{NoteSequence, StepPattern, STEPS_PER_BAR};
