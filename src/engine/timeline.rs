// Timeline - Manually advanced transport
// Drives the engine from a host clock, and stands in for the audio clock in tests

use std::cmp::Reverse;

use super::transport::{step_seconds, ScheduleId, Tick, Transport, TransportState};

/// Float slack when comparing step positions
const STEP_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
struct Schedule {
    id: ScheduleId,
    period: u64,
    next_step: u64,
    /// A stalled schedule stays registered but never fires
    stalled: bool,
}

/// Transport whose context clock only moves when told to
#[derive(Debug, Clone)]
pub struct Timeline {
    now: f64,
    bpm: f64,
    state: TransportState,

    /// Position (steps) at `anchor_time`; position grows linearly from here
    anchor_step: f64,
    anchor_time: f64,

    /// Fire steps this far ahead of `now` (seconds)
    lookahead: f64,

    schedules: Vec<Schedule>,
    next_id: u64,
}

impl Timeline {
    pub fn new(bpm: f64) -> Self {
        Timeline {
            now: 0.0,
            bpm,
            state: TransportState::Stopped,
            anchor_step: 0.0,
            anchor_time: 0.0,
            lookahead: 0.0,
            schedules: Vec::new(),
            next_id: 0,
        }
    }

    /// Timeline that hands out steps up to `seconds` before they fall due,
    /// leaving the synth backend room to place them precisely
    pub fn with_lookahead(bpm: f64, seconds: f64) -> Self {
        Timeline {
            lookahead: seconds.max(0.0),
            ..Timeline::new(bpm)
        }
    }

    /// Move the clock forward. Earlier times are ignored.
    pub fn advance_to(&mut self, seconds: f64) {
        if seconds > self.now {
            self.now = seconds;
        }
    }

    pub fn advance_by(&mut self, seconds: f64) {
        self.advance_to(self.now + seconds);
    }

    /// Silently drop every callback currently registered without removing it.
    /// Mirrors audio schedulers that stop firing after some transport
    /// operations; only clearing and rescheduling brings callbacks back.
    pub fn stall_callbacks(&mut self) {
        for schedule in self.schedules.iter_mut() {
            schedule.stalled = true;
        }
    }

    fn position_at(&self, time: f64) -> f64 {
        match self.state {
            TransportState::Started => {
                self.anchor_step + (time - self.anchor_time) / step_seconds(self.bpm)
            }
            TransportState::Paused | TransportState::Stopped => self.anchor_step,
        }
    }

    fn time_of_step(&self, step: u64) -> f64 {
        self.anchor_time + (step as f64 - self.anchor_step) * step_seconds(self.bpm)
    }

    fn reanchor(&mut self) {
        self.anchor_step = self.position_at(self.now);
        self.anchor_time = self.now;
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Timeline::new(120.0)
    }
}

impl Transport for Timeline {
    fn now(&self) -> f64 {
        self.now
    }

    fn state(&self) -> TransportState {
        self.state
    }

    fn start(&mut self) {
        if self.state == TransportState::Started {
            return;
        }
        if self.state == TransportState::Stopped {
            self.anchor_step = 0.0;
        }
        self.anchor_time = self.now;
        self.state = TransportState::Started;
    }

    fn stop(&mut self) {
        self.state = TransportState::Stopped;
        self.anchor_step = 0.0;
        self.anchor_time = self.now;
    }

    fn pause(&mut self) {
        if self.state == TransportState::Started {
            self.reanchor();
            self.state = TransportState::Paused;
        }
    }

    fn bpm(&self) -> f64 {
        self.bpm
    }

    fn set_bpm(&mut self, bpm: f64) {
        if !bpm.is_finite() || bpm <= 0.0 {
            return;
        }
        self.reanchor();
        self.bpm = bpm;
    }

    fn position(&self) -> f64 {
        self.position_at(self.now)
    }

    fn schedule_repeat(&mut self, period_steps: u64, start_step: u64) -> ScheduleId {
        let id = ScheduleId(self.next_id);
        self.next_id += 1;
        self.schedules.push(Schedule {
            id,
            period: period_steps.max(1),
            next_step: start_step,
            stalled: false,
        });
        id
    }

    fn clear(&mut self, id: ScheduleId) {
        self.schedules.retain(|s| s.id != id);
    }

    fn scheduled_count(&self) -> usize {
        self.schedules.len()
    }

    fn drain_due(&mut self) -> Vec<Tick> {
        if self.state != TransportState::Started {
            return Vec::new();
        }

        let horizon = self.position_at(self.now + self.lookahead) + STEP_EPSILON;
        let mut due = Vec::new();

        for i in 0..self.schedules.len() {
            let (id, period, stalled) = {
                let s = &self.schedules[i];
                (s.id, s.period, s.stalled)
            };
            while (self.schedules[i].next_step as f64) <= horizon {
                let step = self.schedules[i].next_step;
                if !stalled {
                    due.push((period, Tick { id, step, time: self.time_of_step(step) }));
                }
                self.schedules[i].next_step += period;
            }
        }

        due.sort_by_key(|(period, tick)| (tick.step, Reverse(*period), tick.id.0));
        due.into_iter().map(|(_, tick)| tick).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_fires_while_stopped() {
        let mut timeline = Timeline::new(120.0);
        timeline.schedule_repeat(1, 0);
        timeline.advance_to(5.0);
        assert!(timeline.drain_due().is_empty());
    }

    #[test]
    fn test_steps_fall_on_grid() {
        let mut timeline = Timeline::new(120.0);
        let id = timeline.schedule_repeat(1, 0);
        timeline.start();

        let first = timeline.drain_due();
        assert_eq!(first, vec![Tick { id, step: 0, time: 0.0 }]);

        timeline.advance_to(0.5);
        let ticks = timeline.drain_due();
        let steps: Vec<u64> = ticks.iter().map(|t| t.step).collect();
        assert_eq!(steps, vec![1, 2, 3, 4]);
        assert!((ticks[3].time - 0.5).abs() < 1e-9);

        // Draining again yields nothing new
        assert!(timeline.drain_due().is_empty());
    }

    #[test]
    fn test_longer_period_first_on_same_step() {
        let mut timeline = Timeline::new(120.0);
        let step = timeline.schedule_repeat(1, 0);
        let bar = timeline.schedule_repeat(16, 0);
        timeline.start();
        timeline.advance_to(2.0);

        let ticks = timeline.drain_due();
        assert_eq!(ticks.len(), 17 + 2);
        assert_eq!(ticks[0].id, bar);
        assert_eq!(ticks[1].id, step);
        let bar_16 = ticks.iter().position(|t| t.id == bar && t.step == 16).unwrap();
        assert_eq!(ticks[bar_16 + 1], Tick { id: step, step: 16, time: 2.0 });
    }

    #[test]
    fn test_pause_holds_position() {
        let mut timeline = Timeline::new(120.0);
        timeline.start();
        timeline.advance_to(1.0);
        timeline.pause();
        assert_eq!(timeline.position(), 8.0);

        timeline.advance_to(10.0);
        assert_eq!(timeline.position(), 8.0);

        timeline.start();
        timeline.advance_to(10.5);
        assert!((timeline.position() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_stop_rewinds() {
        let mut timeline = Timeline::new(120.0);
        timeline.start();
        timeline.advance_to(3.0);
        timeline.stop();
        assert_eq!(timeline.position(), 0.0);
        timeline.start();
        assert_eq!(timeline.position(), 0.0);
    }

    #[test]
    fn test_tempo_change_keeps_position() {
        let mut timeline = Timeline::new(120.0);
        timeline.start();
        timeline.advance_to(1.0);
        timeline.set_bpm(240.0);
        assert_eq!(timeline.position(), 8.0);

        timeline.advance_to(1.5);
        assert!((timeline.position() - 16.0).abs() < 1e-9);

        timeline.set_bpm(f64::NAN);
        assert_eq!(timeline.bpm(), 240.0);
    }

    #[test]
    fn test_lookahead_fires_early() {
        let mut timeline = Timeline::with_lookahead(120.0, 0.1);
        timeline.schedule_repeat(1, 0);
        timeline.start();
        timeline.advance_to(0.05);

        let ticks = timeline.drain_due();
        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[1].time, 0.125);
    }

    #[test]
    fn test_stalled_callbacks_stay_silent_until_rescheduled() {
        let mut timeline = Timeline::new(120.0);
        let stale = timeline.schedule_repeat(1, 0);
        timeline.start();
        timeline.drain_due();

        timeline.stall_callbacks();
        timeline.advance_to(1.0);
        assert!(timeline.drain_due().is_empty());
        assert_eq!(timeline.scheduled_count(), 1);

        timeline.clear(stale);
        let fresh = timeline.schedule_repeat(1, 9);
        timeline.advance_to(1.25);
        let ticks = timeline.drain_due();
        assert_eq!(ticks.iter().map(|t| t.step).collect::<Vec<_>>(), vec![9, 10]);
        assert!(ticks.iter().all(|t| t.id == fresh));
    }
}
