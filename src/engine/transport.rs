// Transport Abstraction
// The clock and repeating-callback capability the scheduler runs against

use serde::Serialize;

/// Handle for a repeating schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ScheduleId(pub u64);

/// Transport run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportState {
    Stopped,
    Started,
    Paused,
}

/// One due firing of a repeating schedule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub id: ScheduleId,
    /// Absolute sixteenth-note position since the transport started
    pub step: u64,
    /// Context time the step falls on (seconds)
    pub time: f64,
}

/// Musical clock with repeating callbacks measured in sixteenth-note steps.
///
/// Callbacks are pulled rather than pushed: the owner calls `drain_due` and
/// dispatches the ticks itself. Implementations return ticks ordered by step,
/// with longer periods first when two schedules land on the same step.
pub trait Transport {
    /// Context clock in seconds. Keeps running while stopped or paused.
    fn now(&self) -> f64;

    fn state(&self) -> TransportState;

    /// Start from the paused position, or from step 0 when stopped
    fn start(&mut self);

    /// Halt and rewind to step 0. Schedules are kept.
    fn stop(&mut self);

    /// Halt and keep the position
    fn pause(&mut self);

    fn bpm(&self) -> f64;

    fn set_bpm(&mut self, bpm: f64);

    /// Current position in (fractional) steps
    fn position(&self) -> f64;

    /// Fire every `period_steps` starting at `start_step`
    fn schedule_repeat(&mut self, period_steps: u64, start_step: u64) -> ScheduleId;

    /// Remove a schedule. Unknown ids are ignored.
    fn clear(&mut self, id: ScheduleId);

    /// Number of live schedules
    fn scheduled_count(&self) -> usize;

    /// Every firing that has come due since the last drain
    fn drain_due(&mut self) -> Vec<Tick>;
}

/// Seconds per step at a tempo (four steps per beat)
pub fn step_seconds(bpm: f64) -> f64 {
    15.0 / bpm
}

/// Seconds per bar of 4/4 at a tempo
pub fn bar_seconds(bpm: f64) -> f64 {
    240.0 / bpm
}

/// Length of a 1/`division` note in seconds, e.g. 8 for an eighth note
pub fn note_length(bpm: f64, division: u32) -> f64 {
    bar_seconds(bpm) / f64::from(division.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_lengths_at_120() {
        assert_eq!(step_seconds(120.0), 0.125);
        assert_eq!(bar_seconds(120.0), 2.0);
        assert_eq!(note_length(120.0, 4), 0.5);
        assert_eq!(note_length(120.0, 16), step_seconds(120.0));
        assert_eq!(note_length(120.0, 0), 2.0);
    }
}
