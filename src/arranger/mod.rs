// Arranger - Bar-indexed arrangement state machine
// Resolves section, progression, and chord for every bar of the 64-bar cycle

pub mod section;
pub mod state;

// Re-export main types
pub use section::{
    get_section, is_approaching_transition, upcoming_section, Section, SectionSpan,
    SECTION_CYCLE_BARS, SECTION_TABLE,
};
pub use state::{select_progression, ArrangementState, BarContext, DEFAULT_ENERGY, DEFAULT_TENSION};
