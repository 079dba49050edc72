// Acidflow - Procedural acid techno arrangement engine
// Module declarations

pub mod arranger;
pub mod automation;
pub mod engine;
pub mod events;
pub mod generator;
pub mod harmony;
pub mod patterns;
pub mod settings;

// Re-export main types
pub use arranger::{ArrangementState, Section};
pub use engine::{Engine, EngineStatus, NullBackend, PlaybackState, SynthBackend, Timeline, Transport};
pub use events::{EventBus, EventKind, MusicEvent};
pub use patterns::{Genre, Instrument};
pub use settings::EngineConfig;
