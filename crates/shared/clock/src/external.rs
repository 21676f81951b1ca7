use log::{debug, trace};
use replay_core::Timestamp;
use std::sync::Arc;

use crate::playback::ClockInner;

/// Entry point for an external time source driving an `ExternalFollower` clock
///
/// Obtained from [`PlaybackClock::external_feed`](crate::PlaybackClock::external_feed).
/// Each pushed sample becomes the clock's `now()` and wakes blocked waiters.
/// A sample earlier than the previous one is a discontinuity: waiters return
/// false as they would after a local jump.
#[derive(Clone)]
pub struct ExternalTimeFeed {
    inner: Arc<ClockInner>,
}

impl ExternalTimeFeed {
    pub(crate) fn new(inner: Arc<ClockInner>) -> Self {
        Self { inner }
    }

    /// Record the latest external time
    pub fn push(&self, sample: Timestamp) {
        let moved_back = self.inner.state.lock().push_external(sample);
        if moved_back {
            debug!("External time moved backwards to {}", sample);
        } else {
            trace!("External time sample {}", sample);
        }
        self.inner.wake.notify_all();
    }

    /// The most recent sample, or the starting time if none has arrived
    pub fn latest(&self) -> Timestamp {
        self.inner.state.lock().reference().player
    }
}

#[cfg(test)]
mod tests {
    use crate::PlaybackClock;
    use chrono::Duration as ChronoDuration;
    use replay_core::timestamp_from_secs_f64;
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn test_latest_defaults_to_starting_time() {
        let start = timestamp_from_secs_f64(42.0);
        let clock = PlaybackClock::external_follower(start);
        let feed = clock.external_feed().unwrap();

        assert_eq!(feed.latest(), start);
        assert_eq!(clock.now(), start);

        thread::sleep(Duration::from_millis(5));
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn test_push_satisfies_waiter() {
        let start = timestamp_from_secs_f64(42.0);
        let clock = PlaybackClock::external_follower(start);
        let feed = clock.external_feed().unwrap();
        let target = start + ChronoDuration::seconds(1);

        let waiter = {
            let clock = clock.clone();
            thread::spawn(move || clock.sleep_until(target, Duration::from_secs(5)))
        };

        thread::sleep(Duration::from_millis(20));
        feed.push(start + ChronoDuration::milliseconds(500));
        thread::sleep(Duration::from_millis(20));
        let begin = Instant::now();
        feed.push(target);

        assert!(waiter.join().unwrap());
        assert!(begin.elapsed() < Duration::from_secs(1));
        assert_eq!(clock.now(), target);
    }

    #[test]
    fn test_backward_push_interrupts_waiter() {
        let start = timestamp_from_secs_f64(42.0);
        let clock = PlaybackClock::external_follower(start);
        let feed = clock.external_feed().unwrap();

        let waiter = {
            let clock = clock.clone();
            let target = start + ChronoDuration::seconds(10);
            thread::spawn(move || clock.sleep_until(target, Duration::from_secs(5)))
        };

        thread::sleep(Duration::from_millis(20));
        let begin = Instant::now();
        feed.push(start - ChronoDuration::seconds(1));

        assert!(!waiter.join().unwrap());
        assert!(begin.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_waiter_times_out_without_samples() {
        let clock = PlaybackClock::external_follower(timestamp_from_secs_f64(42.0));
        let target = timestamp_from_secs_f64(43.0);
        assert!(!clock.sleep_until(target, Duration::from_millis(10)));
    }
}
