use chrono::Utc;
use replay_core::Timestamp;
use replay_ports::{Clock, WaitableClock};
use std::thread;
use std::time::Duration;

/// Real system clock for live operation
///
/// This simply follows wall-clock time. Use it where a playback driver
/// should pace delivery in real time instead of player time.
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}

impl WaitableClock for SystemClock {
    fn sleep_until(&self, until: Timestamp, timeout: Duration) -> bool {
        // Negative remaining time means the target has already passed
        let remaining = (until - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        if remaining <= timeout {
            thread::sleep(remaining);
            true
        } else {
            thread::sleep(timeout);
            false
        }
    }
}
