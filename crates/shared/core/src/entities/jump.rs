use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::values::Timestamp;

/// Direction of a discontinuous change of player time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JumpDirection {
    /// Time moved ahead (or was re-set to the same value)
    Forward,
    /// Time moved back; consumers holding accumulated state should reset it
    Backward,
}

/// Description of a jump, handed to every registered jump handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpEvent {
    /// Player time immediately before the jump
    pub previous: Timestamp,
    /// Player time the clock was jumped to
    pub current: Timestamp,
    /// `current - previous`
    pub delta: Duration,
    pub direction: JumpDirection,
}

impl JumpEvent {
    pub fn new(previous: Timestamp, current: Timestamp) -> Self {
        let delta = current - previous;
        let direction = if delta < Duration::zero() {
            JumpDirection::Backward
        } else {
            JumpDirection::Forward
        };

        Self {
            previous,
            current,
            delta,
            direction,
        }
    }

    pub fn is_backward(&self) -> bool {
        self.direction == JumpDirection::Backward
    }
}

/// Per-handler filter deciding which jumps a handler hears about
///
/// `None` on a side means every jump in that direction is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JumpThreshold {
    /// Smallest forward delta that is reported
    pub min_forward: Option<Duration>,
    /// Smallest backward distance (absolute value) that is reported
    pub min_backward: Option<Duration>,
}

impl JumpThreshold {
    /// Report every jump
    pub fn any() -> Self {
        Self::default()
    }

    /// Report only backward jumps (seeks), however small
    pub fn backward_only() -> Self {
        Self {
            min_forward: Some(Duration::MAX),
            min_backward: None,
        }
    }

    pub fn with_min_forward(mut self, min: Duration) -> Self {
        self.min_forward = Some(min);
        self
    }

    pub fn with_min_backward(mut self, min: Duration) -> Self {
        self.min_backward = Some(min);
        self
    }

    /// Returns true if a handler with this threshold should see `event`
    pub fn admits(&self, event: &JumpEvent) -> bool {
        match event.direction {
            JumpDirection::Forward => self.min_forward.is_none_or(|min| event.delta >= min),
            JumpDirection::Backward => self
                .min_backward
                .is_none_or(|min| event.delta.abs() >= min),
        }
    }
}
