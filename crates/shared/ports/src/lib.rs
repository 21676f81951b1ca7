//! Replay Ports
//!
//! Port definitions (traits) for the Replay playback clock.
//! These define the boundaries between playback drivers and clock implementations.

mod clock;
mod error;

pub use clock::{Clock, TimeControl, WaitableClock};
pub use error::{ClockError, ClockResult};
