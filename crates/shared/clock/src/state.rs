use replay_core::{ClockMode, JumpEvent, Timestamp};
use std::time::Instant;

use crate::mapper::{self, TimeReference};

/// Authoritative clock state, always accessed under the clock's lock
///
/// In `ExternalFollower` mode `reference.player` holds the latest external
/// sample and the rest of the reference is unused.
#[derive(Debug, Clone)]
pub struct ClockState {
    mode: ClockMode,
    reference: TimeReference,
    publish_frequency: f64,
    /// Bumped on every discontinuity; waiters compare it to detect one
    epoch: u64,
}

impl ClockState {
    /// Fresh state anchored at `starting_time`. Controlled clocks start paused.
    pub fn new(mode: ClockMode, starting_time: Timestamp, real_now: Instant) -> Self {
        let reference = TimeReference {
            paused: mode.is_controlled(),
            ..TimeReference::new(real_now, starting_time)
        };

        Self {
            mode,
            reference,
            publish_frequency: 0.0,
            epoch: 0,
        }
    }

    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    pub fn reference(&self) -> &TimeReference {
        &self.reference
    }

    pub fn paused(&self) -> bool {
        self.reference.paused
    }

    pub fn rate(&self) -> f64 {
        self.reference.rate
    }

    pub fn publish_frequency(&self) -> f64 {
        self.publish_frequency
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn player_time(&self, real_now: Instant) -> Timestamp {
        match self.mode {
            ClockMode::Controlled => mapper::player_time(&self.reference, real_now),
            ClockMode::ExternalFollower => self.reference.player,
        }
    }

    /// Real instant at which `target` will be reached if nothing changes
    pub fn wake_time(&self, target: Timestamp) -> Option<Instant> {
        match self.mode {
            ClockMode::Controlled => mapper::real_time_for(&self.reference, target),
            ClockMode::ExternalFollower => None,
        }
    }

    /// Returns false if the clock was already in the requested state
    pub fn set_paused(&mut self, paused: bool, real_now: Instant) -> bool {
        if self.reference.paused == paused {
            return false;
        }

        self.reference = TimeReference {
            paused,
            ..self.reference.reanchored(real_now)
        };
        true
    }

    /// Returns false if the rate was unchanged. Caller validates `rate`.
    pub fn set_rate(&mut self, rate: f64, real_now: Instant) -> bool {
        if self.reference.rate == rate {
            return false;
        }

        self.reference = TimeReference {
            rate,
            ..self.reference.reanchored(real_now)
        };
        true
    }

    pub fn set_publish_frequency(&mut self, frequency: f64) {
        self.publish_frequency = frequency;
    }

    /// Move player time to `time`, keeping rate and pause
    pub fn jump(&mut self, time: Timestamp, real_now: Instant) -> JumpEvent {
        let previous = self.player_time(real_now);
        self.reference = TimeReference {
            real: real_now,
            player: time,
            ..self.reference
        };
        self.epoch += 1;
        JumpEvent::new(previous, time)
    }

    /// Record an external sample. Returns true if time moved backwards.
    pub fn push_external(&mut self, sample: Timestamp) -> bool {
        let backward = sample < self.reference.player;
        self.reference.player = sample;
        if backward {
            self.epoch += 1;
        }
        backward
    }
}
