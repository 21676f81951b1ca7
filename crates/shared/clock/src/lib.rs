//! Replay Clock
//!
//! Player time for replaying recorded sessions:
//!
//! ## Components
//!
//! ```text
//! PlaybackClock (public façade, cheap to clone)
//!     │
//!     ├── ClockState     (mode, pause, rate, reference pair, publish frequency)
//!     │       └── mapper (real instant → player time, and back)
//!     ├── JumpNotifier   (handlers run synchronously on jump)
//!     └── ExternalTimeFeed (pushes samples in ExternalFollower mode)
//!
//! ClockPublisher (samples now() at the publish frequency onto a broadcast channel)
//! SystemClock    (wall-clock WaitableClock for live operation)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use replay_clock::{PlaybackClock, TimeControl};
//! use std::time::Duration;
//!
//! let clock = PlaybackClock::controlled(first_message_time);
//! clock.jump(first_message_time)?;
//! clock.set_rate(2.0)?;
//! clock.resume()?;
//!
//! for message in bag {
//!     while !clock.sleep_until(message.time, Duration::from_millis(100)) {
//!         // timed out, or the timeline jumped: re-evaluate
//!     }
//!     publish(message);
//! }
//! ```

mod config;
mod external;
mod jump;
pub mod mapper;
mod playback;
mod publisher;
mod state;
mod system;

pub use config::PlaybackClockConfig;
pub use external::ExternalTimeFeed;
pub use jump::{JumpCallback, JumpHandlerId, JumpNotifier};
pub use playback::PlaybackClock;
pub use publisher::ClockPublisher;
pub use state::ClockState;
pub use system::SystemClock;

// Re-export the ports for convenience
pub use replay_ports::{Clock, ClockError, ClockResult, TimeControl, WaitableClock};
