//! Replay Core Domain
//!
//! Pure value types shared by the playback clock and its collaborators.
//! This crate contains no locking, no I/O, and is 100% unit testable.

pub mod entities;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{ClockMode, ClockUpdate, JumpDirection, JumpEvent, JumpThreshold};
pub use values::{Timestamp, timestamp_from_nanos, timestamp_from_secs_f64, timestamp_to_nanos};
