// Parameter Automation - Tension-driven synth moves and section-entry ramps

pub mod params;
pub mod sections;
pub mod tension;

pub use params::{ParamChange, Ramp, RiserCommand, SynthParam};
pub use sections::section_entry_ramps;
pub use tension::{
    kick_pump, stab_filter, AutomationFrame, TensionAutomation, TensionTargets, HIGHPASS_THRESHOLD,
    RISER_THRESHOLD,
};
