use replay_core::Timestamp;
use std::time::Duration;

use crate::error::ClockResult;

/// Port for reading player time
///
/// This allows playback drivers to use different time sources:
/// - A controllable playback clock when replaying a recording
/// - An externally driven clock when another process owns time
/// - The wall clock for live operation
pub trait Clock: Send + Sync {
    /// Get the current time according to this clock
    fn now(&self) -> Timestamp;

    /// Get the clock's name/identifier for debugging
    fn name(&self) -> &str {
        "Clock"
    }
}

/// A clock that callers can block on
pub trait WaitableClock: Clock {
    /// Block the calling thread until `until` is reached according to this clock.
    ///
    /// Returns true if the time was reached. Returns false if `timeout` (real
    /// time) elapsed first, or if the timeline changed discontinuously while
    /// waiting; callers re-check `now()` against `until` to tell these apart.
    fn sleep_until(&self, until: Timestamp, timeout: Duration) -> bool;
}

/// Local control over how player time advances
pub trait TimeControl: Send + Sync {
    fn set_paused(&self, paused: bool) -> ClockResult<()>;

    fn get_paused(&self) -> bool;

    /// Change the ratio of player time to real time. Must be finite and > 0.
    fn set_rate(&self, rate: f64) -> ClockResult<()>;

    fn get_rate(&self) -> f64;

    /// Set how often player time should be published; <= 0 disables publishing
    fn set_clock_publish_frequency(&self, frequency: f64) -> ClockResult<()>;

    fn get_clock_publish_frequency(&self) -> f64;

    /// Discontinuously move player time to `time`
    fn jump(&self, time: Timestamp) -> ClockResult<()>;
}
