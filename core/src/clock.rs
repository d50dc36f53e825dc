//! Auto-play timer: accumulates host-supplied elapsed time against the
//! round interval.
//!
//! The host drives it with elapsed wall time; the timer never sleeps.
//! One fire = one scheduled round boundary.

use std::time::Duration;

pub const DEFAULT_ROUND_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq)]
pub struct AutoPlayTimer {
    pub interval: Duration,
    accumulated:  Duration,
    running:      bool,
}

impl Default for AutoPlayTimer {
    fn default() -> Self {
        Self::new(DEFAULT_ROUND_INTERVAL)
    }
}

impl AutoPlayTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            accumulated: Duration::ZERO,
            running: false,
        }
    }

    pub fn start(&mut self, interval: Duration) {
        self.interval = interval;
        self.accumulated = Duration::ZERO;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.accumulated = Duration::ZERO;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Feed `elapsed` time. Returns how many intervals completed.
    /// A zero interval fires once per call.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.running {
            return 0;
        }
        if self.interval.is_zero() {
            return 1;
        }
        self.accumulated = self.accumulated.saturating_add(elapsed);
        let interval = self.interval.as_nanos();
        let whole = self.accumulated.as_nanos() / interval;
        let remainder = self.accumulated.as_nanos() % interval;
        // remainder < interval, which itself fits a Duration.
        self.accumulated = Duration::from_nanos(remainder as u64);
        u32::try_from(whole).unwrap_or(u32::MAX)
    }
}
