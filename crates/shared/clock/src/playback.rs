use log::{debug, info, warn};
use parking_lot::{Condvar, Mutex};
use replay_core::{ClockMode, JumpEvent, JumpThreshold, Timestamp, timestamp_from_nanos};
use replay_ports::{Clock, ClockError, ClockResult, TimeControl, WaitableClock};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::PlaybackClockConfig;
use crate::external::ExternalTimeFeed;
use crate::jump::{JumpHandlerId, JumpNotifier};
use crate::state::ClockState;

/// Playback clock - player time for replaying a recorded session
///
/// Player time advances from a starting value at a controllable rate relative
/// to real (monotonic) time, can be paused, and can be jumped. Many threads may
/// read `now()` and block in `sleep_until()` while controllers change the
/// timeline; every change wakes the blocked waiters so they re-evaluate.
///
/// ```text
///              controllers                     readers
///   set_paused / set_rate / jump        now() / sleep_until()
///                 │                              │
///                 ▼                              ▼
///   ┌──────────────────────────────────────────────────┐
///   │  Mutex<ClockState>  (reference, rate, paused)    │
///   │  Condvar            (wakes sleep_until)          │
///   │  JumpNotifier       (handlers run on jump)       │
///   └──────────────────────────────────────────────────┘
///                 ▲
///                 │ push (ExternalFollower mode only)
///          ExternalTimeFeed
/// ```
///
/// Cloning is cheap and every clone shares the same timeline.
#[derive(Clone)]
pub struct PlaybackClock {
    pub(crate) inner: Arc<ClockInner>,
}

pub(crate) struct ClockInner {
    mode: ClockMode,
    starting_time: Timestamp,
    pub(crate) state: Mutex<ClockState>,
    /// Signalled on every timeline change
    pub(crate) wake: Condvar,
    jump_handlers: JumpNotifier,
    /// Serializes jumps so handlers observe them in the order they were applied
    jump_serial: Mutex<()>,
}

impl PlaybackClock {
    /// Create a clock at `starting_time`
    ///
    /// `starting_time` should be the timestamp of the first recorded item; a
    /// `Controlled` clock starts paused there at rate 1.0.
    pub fn new(mode: ClockMode, starting_time: Timestamp) -> Self {
        info!("Creating {} playback clock at {}", mode, starting_time);

        Self {
            inner: Arc::new(ClockInner {
                mode,
                starting_time,
                state: Mutex::new(ClockState::new(mode, starting_time, Instant::now())),
                wake: Condvar::new(),
                jump_handlers: JumpNotifier::new(),
                jump_serial: Mutex::new(()),
            }),
        }
    }

    /// Create a controlled clock (starts paused)
    pub fn controlled(starting_time: Timestamp) -> Self {
        Self::new(ClockMode::Controlled, starting_time)
    }

    /// Create a clock that follows an external time feed
    pub fn external_follower(starting_time: Timestamp) -> Self {
        Self::new(ClockMode::ExternalFollower, starting_time)
    }

    /// Create a clock from configuration, applying rate and publish frequency
    pub fn from_config(config: &PlaybackClockConfig) -> ClockResult<Self> {
        validate_rate(config.rate)?;
        if !config.mode.is_controlled() && config.rate != 1.0 {
            return Err(ClockError::unsupported("set_rate", config.mode));
        }

        let clock = Self::new(config.mode, timestamp_from_nanos(config.starting_time_ns));
        if config.mode.is_controlled() {
            clock.set_rate(config.rate)?;
        }
        clock.set_clock_publish_frequency(config.publish_frequency)?;
        Ok(clock)
    }

    pub fn mode(&self) -> ClockMode {
        self.inner.mode
    }

    pub fn starting_time(&self) -> Timestamp {
        self.inner.starting_time
    }

    /// Current player time. Never blocks behind a waiter.
    pub fn now(&self) -> Timestamp {
        // Sample real time under the lock so concurrent readers stay ordered
        let state = self.inner.state.lock();
        state.player_time(Instant::now())
    }

    /// Block until player time reaches `until`
    ///
    /// Returns true once `now() >= until`. Returns false if `timeout` (real
    /// time) elapses first, or immediately after a jump (or, when following an
    /// external feed, a sample that moved time backwards), whatever the new
    /// time is. While paused this only returns on resume, jump or timeout.
    pub fn sleep_until(&self, until: Timestamp, timeout: Duration) -> bool {
        // An unrepresentable deadline means wait without bound
        let deadline = Instant::now().checked_add(timeout);

        let mut state = self.inner.state.lock();
        let epoch = state.epoch();
        loop {
            if state.epoch() != epoch {
                return false;
            }

            let real_now = Instant::now();
            if state.player_time(real_now) >= until {
                return true;
            }
            if deadline.is_some_and(|deadline| real_now >= deadline) {
                return false;
            }

            let wake_at = match (state.wake_time(until), deadline) {
                (Some(reached), Some(deadline)) => Some(reached.min(deadline)),
                (reached, None) => reached,
                (None, deadline) => deadline,
            };
            match wake_at {
                Some(at) => {
                    let _ = self.inner.wake.wait_until(&mut state, at);
                }
                None => self.inner.wake.wait(&mut state),
            }
        }
    }

    pub fn set_paused(&self, paused: bool) -> ClockResult<()> {
        self.ensure_controlled("set_paused")?;

        let changed = self.inner.state.lock().set_paused(paused, Instant::now());
        if changed {
            debug!("Playback clock {}", if paused { "paused" } else { "resumed" });
            self.inner.wake.notify_all();
        }
        Ok(())
    }

    pub fn pause(&self) -> ClockResult<()> {
        self.set_paused(true)
    }

    pub fn resume(&self) -> ClockResult<()> {
        self.set_paused(false)
    }

    /// Flip the pause state and return the new one
    pub fn toggle_pause(&self) -> ClockResult<bool> {
        self.ensure_controlled("toggle_pause")?;

        let paused = {
            let mut state = self.inner.state.lock();
            let paused = !state.paused();
            state.set_paused(paused, Instant::now());
            paused
        };
        debug!("Playback clock {}", if paused { "paused" } else { "resumed" });
        self.inner.wake.notify_all();
        Ok(paused)
    }

    pub fn get_paused(&self) -> bool {
        self.inner.state.lock().paused()
    }

    /// Change the playback rate; time already elapsed is preserved
    ///
    /// `rate` must be finite and > 0; use `set_paused` to stop time.
    pub fn set_rate(&self, rate: f64) -> ClockResult<()> {
        self.ensure_controlled("set_rate")?;
        if let Err(e) = validate_rate(rate) {
            warn!("Rejected playback rate: {}", e);
            return Err(e);
        }

        let changed = self.inner.state.lock().set_rate(rate, Instant::now());
        if changed {
            debug!("Playback rate set to {}", rate);
            self.inner.wake.notify_all();
        }
        Ok(())
    }

    pub fn get_rate(&self) -> f64 {
        self.inner.state.lock().rate()
    }

    /// Set how often player time should be published; <= 0 disables publishing
    pub fn set_clock_publish_frequency(&self, frequency: f64) -> ClockResult<()> {
        if !frequency.is_finite() {
            let e = ClockError::InvalidArgument(format!(
                "publish frequency must be finite, got {}",
                frequency
            ));
            warn!("Rejected publish frequency: {}", e);
            return Err(e);
        }

        self.inner.state.lock().set_publish_frequency(frequency);
        debug!("Clock publish frequency set to {} Hz", frequency);
        Ok(())
    }

    pub fn get_clock_publish_frequency(&self) -> f64 {
        self.inner.state.lock().publish_frequency()
    }

    /// Discontinuously move player time to `time`
    ///
    /// Rate and pause are kept. Jump handlers run synchronously on this thread,
    /// in registration order, before blocked waiters are woken; every waiter
    /// then returns false. Handlers must not call `jump` themselves.
    pub fn jump(&self, time: Timestamp) -> ClockResult<()> {
        self.ensure_controlled("jump")?;

        let _serial = self.inner.jump_serial.lock();
        let event: JumpEvent = self.inner.state.lock().jump(time, Instant::now());
        debug!(
            "Playback clock jumped {:?} from {} to {}",
            event.direction, event.previous, event.current
        );

        // Waiters are woken even if a handler panics
        let _wake = WakeOnDrop(&self.inner.wake);
        let notified = self.inner.jump_handlers.notify(&event);
        if notified > 0 {
            debug!("Notified {} jump handlers", notified);
        }
        Ok(())
    }

    /// Wake every blocked waiter so it re-checks its condition
    pub fn wakeup(&self) {
        self.inner.wake.notify_all();
    }

    /// Register a handler called on every jump
    pub fn add_jump_handler<F>(&self, callback: F) -> JumpHandlerId
    where
        F: Fn(&JumpEvent) + Send + Sync + 'static,
    {
        self.add_jump_handler_with_threshold(JumpThreshold::any(), callback)
    }

    /// Register a handler called only on jumps admitted by `threshold`
    pub fn add_jump_handler_with_threshold<F>(
        &self,
        threshold: JumpThreshold,
        callback: F,
    ) -> JumpHandlerId
    where
        F: Fn(&JumpEvent) + Send + Sync + 'static,
    {
        self.inner.jump_handlers.register(threshold, callback)
    }

    /// Returns false if `id` was not registered
    pub fn remove_jump_handler(&self, id: JumpHandlerId) -> bool {
        self.inner.jump_handlers.unregister(id)
    }

    /// Handle for pushing external time samples (`ExternalFollower` only)
    pub fn external_feed(&self) -> ClockResult<ExternalTimeFeed> {
        if self.inner.mode.is_controlled() {
            warn!("External time feed requested for a controlled clock");
            return Err(ClockError::unsupported("external_feed", self.inner.mode));
        }
        Ok(ExternalTimeFeed::new(self.inner.clone()))
    }

    fn ensure_controlled(&self, operation: &'static str) -> ClockResult<()> {
        if self.inner.mode.is_controlled() {
            Ok(())
        } else {
            warn!(
                "Rejected {} on a clock in {} mode",
                operation, self.inner.mode
            );
            Err(ClockError::unsupported(operation, self.inner.mode))
        }
    }
}

/// Notifies every waiter when dropped
struct WakeOnDrop<'a>(&'a Condvar);

impl Drop for WakeOnDrop<'_> {
    fn drop(&mut self) {
        self.0.notify_all();
    }
}

fn validate_rate(rate: f64) -> ClockResult<()> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(ClockError::InvalidArgument(format!(
            "rate must be finite and greater than 0, got {}",
            rate
        )))
    }
}

impl Clock for PlaybackClock {
    fn now(&self) -> Timestamp {
        PlaybackClock::now(self)
    }

    fn name(&self) -> &str {
        "PlaybackClock"
    }
}

impl WaitableClock for PlaybackClock {
    fn sleep_until(&self, until: Timestamp, timeout: Duration) -> bool {
        PlaybackClock::sleep_until(self, until, timeout)
    }
}

impl TimeControl for PlaybackClock {
    fn set_paused(&self, paused: bool) -> ClockResult<()> {
        PlaybackClock::set_paused(self, paused)
    }

    fn get_paused(&self) -> bool {
        PlaybackClock::get_paused(self)
    }

    fn set_rate(&self, rate: f64) -> ClockResult<()> {
        PlaybackClock::set_rate(self, rate)
    }

    fn get_rate(&self) -> f64 {
        PlaybackClock::get_rate(self)
    }

    fn set_clock_publish_frequency(&self, frequency: f64) -> ClockResult<()> {
        PlaybackClock::set_clock_publish_frequency(self, frequency)
    }

    fn get_clock_publish_frequency(&self) -> f64 {
        PlaybackClock::get_clock_publish_frequency(self)
    }

    fn jump(&self, time: Timestamp) -> ClockResult<()> {
        PlaybackClock::jump(self, time)
    }
}
