// Generators - Per-bar pattern and melody generation
// All randomness comes in through the caller's Rng so output can be pinned by seed

pub mod bass;
pub mod drums;
pub mod melody;

pub use bass::{doubles_octave, sub_sequence};
pub use drums::{density_hihat, hihat_density, stab_pattern, BarPatterns, PatternGenerator};
pub use melody::{acid_rhythm, is_accent, regenerates_on, MelodicGenerator};
