use serde::{Deserialize, Serialize};
use std::fmt;

/// Who drives player time. Fixed for the lifetime of a clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockMode {
    /// Pause, rate and jump are driven locally; the clock starts paused
    #[default]
    Controlled,
    /// Player time is whatever the external time feed last reported
    ExternalFollower,
}

impl ClockMode {
    /// Returns true if local time control is allowed
    pub fn is_controlled(&self) -> bool {
        matches!(self, ClockMode::Controlled)
    }
}

impl fmt::Display for ClockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockMode::Controlled => write!(f, "controlled"),
            ClockMode::ExternalFollower => write!(f, "external-follower"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_serde_names() {
        let json = serde_json::to_string(&ClockMode::ExternalFollower).unwrap();
        assert_eq!(json, "\"external_follower\"");

        let mode: ClockMode = serde_json::from_str("\"controlled\"").unwrap();
        assert!(mode.is_controlled());
    }
}
