use log::{info, trace, warn};
use replay_core::ClockUpdate;
use replay_ports::{ClockError, ClockResult};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::PlaybackClock;

/// How often an idle publisher re-checks the publish frequency
const IDLE_POLL: Duration = Duration::from_millis(100);

const CHANNEL_CAPACITY: usize = 1024;

/// Samples `now()` at the clock's publish frequency and broadcasts it
///
/// The frequency is re-read at least every 100 ms, so
/// `set_clock_publish_frequency` takes effect without restarting the
/// publisher; the period is measured from the last sample sent. A frequency <= 0 publishes
/// nothing. Subscribers receive [`ClockUpdate`]s with consecutive sequence
/// numbers; a lagging subscriber sees `RecvError::Lagged` like any broadcast
/// receiver.
pub struct ClockPublisher {
    time_tx: broadcast::Sender<ClockUpdate>,
    task: JoinHandle<()>,
}

impl ClockPublisher {
    /// Start publishing on the current tokio runtime
    ///
    /// Fails for `ExternalFollower` clocks: externally driven time is never
    /// re-broadcast.
    pub fn spawn(clock: PlaybackClock) -> ClockResult<Self> {
        if !clock.mode().is_controlled() {
            warn!("Refusing to publish an externally driven clock");
            return Err(ClockError::unsupported("publish", clock.mode()));
        }

        let (time_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        let task = tokio::spawn(publish_loop(clock, time_tx.clone()));
        info!("Clock publisher started");

        Ok(Self { time_tx, task })
    }

    /// Subscribe to published samples
    pub fn subscribe(&self) -> broadcast::Receiver<ClockUpdate> {
        self.time_tx.subscribe()
    }

    /// Stop publishing
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for ClockPublisher {
    fn drop(&mut self) {
        self.task.abort();
        info!("Clock publisher stopped");
    }
}

async fn publish_loop(clock: PlaybackClock, time_tx: broadcast::Sender<ClockUpdate>) {
    let mut sequence = 0u64;
    let mut last_sent: Option<Instant> = None;

    loop {
        let frequency = clock.get_clock_publish_frequency();
        if frequency <= 0.0 {
            tokio::time::sleep(IDLE_POLL).await;
            continue;
        }

        // Sleep in slices of at most IDLE_POLL so frequency changes apply promptly
        let period = Duration::try_from_secs_f64(frequency.recip()).unwrap_or(Duration::MAX);
        let now = Instant::now();
        if let Some(due) = last_sent.and_then(|sent| sent.checked_add(period)) {
            if now < due {
                tokio::time::sleep((due - now).min(IDLE_POLL)).await;
                continue;
            }
        }

        let update = ClockUpdate {
            timestamp: clock.now(),
            sequence,
        };
        sequence += 1;
        last_sent = Some(now);
        if time_tx.send(update).is_err() {
            trace!("No clock subscribers");
        }
    }
}
