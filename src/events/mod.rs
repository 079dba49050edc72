// Music events module
// Typed broadcast events, the synchronous bus, and the JSONL event trace

pub mod bus;
pub mod trace;
pub mod types;

// Re-export main types
pub use bus::{EventBus, EventHandler, SubscriptionId};
pub use trace::{read_trace_file, TraceEntry, TraceError, TraceWriter};
pub use types::{EventKind, MusicEvent};
