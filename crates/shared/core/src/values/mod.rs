use chrono::{DateTime, Utc};

/// Player time in UTC
///
/// Recorded items are stamped in nanoseconds since the Unix epoch, so the
/// conversions below are the only places that range limits are handled.
pub type Timestamp = DateTime<Utc>;

/// Build a timestamp from nanoseconds since the Unix epoch
pub fn timestamp_from_nanos(nanos: i64) -> Timestamp {
    DateTime::from_timestamp_nanos(nanos)
}

/// Nanoseconds since the Unix epoch, saturating outside the i64 range (~1677..2262)
pub fn timestamp_to_nanos(time: Timestamp) -> i64 {
    match time.timestamp_nanos_opt() {
        Some(nanos) => nanos,
        None if time.timestamp() < 0 => i64::MIN,
        None => i64::MAX,
    }
}

/// Build a timestamp from fractional seconds since the Unix epoch
pub fn timestamp_from_secs_f64(secs: f64) -> Timestamp {
    // `as` saturates, NaN maps to 0
    timestamp_from_nanos((secs * 1e9).round() as i64)
}
