// Engine module
// Transport seam, synthesis seam, and the scheduler that ties the arrangement to them

pub mod humanize;
pub mod scheduler;
pub mod status;
pub mod synth;
pub mod timeline;
pub mod transport;
pub mod watchdog;

// Re-export main types
pub use scheduler::{Engine, STAB_STRUM};
pub use status::{EngineStatus, NextSection, PlaybackState};
pub use synth::{NullBackend, RecordingBackend, SynthBackend, SynthCall, Trigger};
pub use timeline::Timeline;
pub use transport::{bar_seconds, note_length, step_seconds, ScheduleId, Tick, Transport, TransportState};
pub use watchdog::{Watchdog, WatchdogStatus};
