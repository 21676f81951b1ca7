//! Configuration loading for the playback clock
//!
//! Supports JSON configuration, e.g.:
//!
//! ```json
//! { "mode": "controlled", "starting_time_ns": 1700000000000000000, "rate": 2.0 }
//! ```

use replay_core::{ClockMode, Timestamp, timestamp_to_nanos};
use replay_ports::{ClockError, ClockResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Playback clock configuration
///
/// There is deliberately no default starting time: it must match the first
/// recorded item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackClockConfig {
    /// Who drives time
    #[serde(default)]
    pub mode: ClockMode,

    /// Starting player time, nanoseconds since the Unix epoch
    pub starting_time_ns: i64,

    /// Initial playback rate
    #[serde(default = "default_rate")]
    pub rate: f64,

    /// Clock publish frequency in Hz; <= 0 disables publishing
    #[serde(default)]
    pub publish_frequency: f64,
}

fn default_rate() -> f64 {
    1.0
}

impl PlaybackClockConfig {
    pub fn new(mode: ClockMode, starting_time: Timestamp) -> Self {
        Self {
            mode,
            starting_time_ns: timestamp_to_nanos(starting_time),
            rate: default_rate(),
            publish_frequency: 0.0,
        }
    }

    pub fn with_rate(mut self, rate: f64) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_publish_frequency(mut self, frequency: f64) -> Self {
        self.publish_frequency = frequency;
        self
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> ClockResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ClockError::Config(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from a JSON string
    pub fn from_json(json: &str) -> ClockResult<Self> {
        serde_json::from_str(json).map_err(|e| ClockError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use replay_core::timestamp_from_secs_f64;

    #[test]
    fn test_defaults_from_json() {
        let config = PlaybackClockConfig::from_json(r#"{ "starting_time_ns": 1000 }"#).unwrap();
        assert_eq!(config.mode, ClockMode::Controlled);
        assert_eq!(config.starting_time_ns, 1000);
        assert_eq!(config.rate, 1.0);
        assert_eq!(config.publish_frequency, 0.0);
    }

    #[test]
    fn test_full_json() {
        let json = r#"{
            "mode": "external_follower",
            "starting_time_ns": 1700000000000000000,
            "rate": 1.0,
            "publish_frequency": 100.0
        }"#;
        let config = PlaybackClockConfig::from_json(json).unwrap();
        assert_eq!(config.mode, ClockMode::ExternalFollower);
        assert_eq!(config.publish_frequency, 100.0);
    }

    #[test]
    fn test_starting_time_is_required() {
        let err = PlaybackClockConfig::from_json(r#"{ "rate": 2.0 }"#).unwrap_err();
        assert!(matches!(err, ClockError::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = PlaybackClockConfig::from_file("/nonexistent/replay-clock.json").unwrap_err();
        assert!(matches!(err, ClockError::Config(msg) if msg.contains("replay-clock.json")));
    }

    #[test]
    fn test_builder_round_trips_starting_time() {
        let start = timestamp_from_secs_f64(1000.0);
        let config = PlaybackClockConfig::new(ClockMode::Controlled, start).with_rate(0.5);
        assert_eq!(config.starting_time_ns, 1_000_000_000_000);
        assert_eq!(config.rate, 0.5);
    }
}
