//! Real time to player time mapping
//!
//! Pure functions over a [`TimeReference`]. Real time is always a monotonic
//! `Instant`, so wall-clock corrections never perturb the rate/pause math.

use chrono::{DateTime, Duration, Utc};
use replay_core::Timestamp;
use std::time::{Duration as StdDuration, Instant};

/// The regime player time currently advances under
///
/// Every control operation replaces the whole value at once, so a reader can
/// never pair a new rate with a stale anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeReference {
    /// Real instant at which this regime began
    pub real: Instant,
    /// Player time that corresponded to `real`
    pub player: Timestamp,
    /// Player seconds per real second while running
    pub rate: f64,
    pub paused: bool,
}

impl TimeReference {
    pub fn new(real: Instant, player: Timestamp) -> Self {
        Self {
            real,
            player,
            rate: 1.0,
            paused: false,
        }
    }

    /// The same regime re-anchored at `real_now`
    pub fn reanchored(&self, real_now: Instant) -> Self {
        Self {
            real: real_now,
            player: player_time(self, real_now),
            ..*self
        }
    }
}

/// Player time at `real_now`
///
/// `paused ? player : player + rate * (real_now - real)`. Instants earlier
/// than the anchor map to the anchor itself.
pub fn player_time(reference: &TimeReference, real_now: Instant) -> Timestamp {
    if reference.paused {
        return reference.player;
    }

    let elapsed = real_now.saturating_duration_since(reference.real);
    let scaled_nanos = (elapsed.as_nanos() as f64 * reference.rate) as i64;
    reference
        .player
        .checked_add_signed(Duration::nanoseconds(scaled_nanos))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// First real instant at which player time reaches `target`
///
/// Returns `None` when the target can never be reached under this regime
/// (paused, or too far away to represent).
pub fn real_time_for(reference: &TimeReference, target: Timestamp) -> Option<Instant> {
    if reference.paused {
        return None;
    }

    let ahead = target - reference.player;
    if ahead <= Duration::zero() {
        return Some(reference.real);
    }

    let nanos = (ahead.num_nanoseconds()? as f64 / reference.rate).ceil();
    if !nanos.is_finite() || nanos >= u64::MAX as f64 {
        return None;
    }

    // One extra nanosecond absorbs rounding in player_time's truncation
    reference
        .real
        .checked_add(StdDuration::from_nanos(nanos as u64 + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use replay_core::timestamp_from_secs_f64;

    fn running(rate: f64) -> TimeReference {
        TimeReference {
            rate,
            ..TimeReference::new(Instant::now(), timestamp_from_secs_f64(1000.0))
        }
    }

    #[test]
    fn test_paused_is_frozen() {
        let reference = TimeReference {
            paused: true,
            ..running(2.0)
        };
        let later = reference.real + StdDuration::from_secs(30);

        assert_eq!(player_time(&reference, later), reference.player);
        assert_eq!(real_time_for(&reference, reference.player), None);
    }

    #[test]
    fn test_rate_scales_elapsed_time() {
        let reference = running(2.0);
        let t1 = reference.real + StdDuration::from_millis(250);
        let t2 = reference.real + StdDuration::from_millis(1250);

        let delta = player_time(&reference, t2) - player_time(&reference, t1);
        assert_eq!(delta, Duration::seconds(2));
        assert_eq!(
            player_time(&reference, t2),
            timestamp_from_secs_f64(1002.5)
        );
    }

    #[test]
    fn test_instant_before_anchor_maps_to_anchor() {
        let reference = running(1.0);
        let earlier = reference.real - StdDuration::from_millis(5);
        assert_eq!(player_time(&reference, earlier), reference.player);
    }

    #[test]
    fn test_real_time_for_inverts_player_time() {
        let reference = running(0.5);
        let target = reference.player + Duration::seconds(1);

        let at = real_time_for(&reference, target).unwrap();
        let wait = at - reference.real;
        assert!(wait >= StdDuration::from_secs(2));
        assert!(wait <= StdDuration::from_secs(2) + StdDuration::from_micros(1));
        assert!(player_time(&reference, at) >= target);
    }

    #[test]
    fn test_real_time_for_past_target_is_anchor() {
        let reference = running(3.0);
        let target = reference.player - Duration::seconds(10);
        assert_eq!(real_time_for(&reference, target), Some(reference.real));
    }

    #[test]
    fn test_reanchor_preserves_player_time() {
        let reference = running(4.0);
        let real_now = reference.real + StdDuration::from_millis(100);

        let reanchored = reference.reanchored(real_now);
        assert_eq!(reanchored.real, real_now);
        assert_eq!(reanchored.player, timestamp_from_secs_f64(1000.4));
        assert_eq!(reanchored.rate, 4.0);
        assert_eq!(
            player_time(&reanchored, real_now),
            player_time(&reference, real_now)
        );
    }
}
