// Stall Watchdog
// Detects when step callbacks stop arriving and rate-limits the recovery

use serde::Serialize;

use crate::settings::WatchdogConfig;

/// Slack for comparing poll times
const POLL_EPSILON: f64 = 1e-6;

/// Watchdog snapshot for the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WatchdogStatus {
    pub seconds_since_last_callback: f64,
    pub recoveries: u64,
}

/// Tracks callback liveness on the transport context clock
#[derive(Debug, Clone)]
pub struct Watchdog {
    config: WatchdogConfig,
    last_callback: f64,
    last_recovery: Option<f64>,
    last_poll: Option<f64>,
    recoveries: u64,
}

impl Watchdog {
    pub fn new(config: WatchdogConfig) -> Self {
        Watchdog {
            config,
            last_callback: 0.0,
            last_recovery: None,
            last_poll: None,
            recoveries: 0,
        }
    }

    pub fn config(&self) -> &WatchdogConfig {
        &self.config
    }

    /// Fresh session: the clock starts counting from `now`
    pub fn reset(&mut self, now: f64) {
        self.last_callback = now;
        self.last_recovery = None;
        self.last_poll = None;
    }

    pub fn note_callback(&mut self, now: f64) {
        self.last_callback = now;
    }

    pub fn record_recovery(&mut self, now: f64) {
        self.last_recovery = Some(now);
        self.last_callback = now;
        self.recoveries += 1;
    }

    pub fn seconds_since_last_callback(&self, now: f64) -> f64 {
        (now - self.last_callback).max(0.0)
    }

    pub fn status(&self, now: f64) -> WatchdogStatus {
        WatchdogStatus {
            seconds_since_last_callback: self.seconds_since_last_callback(now),
            recoveries: self.recoveries,
        }
    }

    /// True at most once per poll interval; records the poll
    pub fn poll_due(&mut self, now: f64) -> bool {
        match self.last_poll {
            Some(last) if now - last < self.config.poll_interval_secs - POLL_EPSILON => false,
            _ => {
                self.last_poll = Some(now);
                true
            }
        }
    }

    /// Stalled past the threshold with the cooldown since the last recovery elapsed
    pub fn should_recover(&self, now: f64) -> bool {
        if self.seconds_since_last_callback(now) < self.config.stall_threshold_secs {
            return false;
        }
        match self.last_recovery {
            Some(last) => now - last >= self.config.cooldown_secs,
            None => true,
        }
    }
}
