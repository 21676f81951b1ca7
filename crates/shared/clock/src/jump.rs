use log::trace;
use parking_lot::Mutex;
use replay_core::{JumpEvent, JumpThreshold};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Callback invoked with every admitted jump
pub type JumpCallback = Arc<dyn Fn(&JumpEvent) + Send + Sync>;

/// Opaque token returned on registration, used to remove the handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JumpHandlerId(u64);

#[derive(Clone)]
struct Registration {
    id: JumpHandlerId,
    threshold: JumpThreshold,
    callback: JumpCallback,
}

/// Ordered registry of jump handlers
///
/// Handlers run on the thread that called `notify`, in registration order,
/// outside the registry lock, so a handler may add or remove handlers.
/// Removal during a notification takes effect from the next jump.
pub struct JumpNotifier {
    next_id: AtomicU64,
    handlers: Mutex<Vec<Registration>>,
}

impl JumpNotifier {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            handlers: Mutex::new(Vec::new()),
        }
    }

    pub fn register<F>(&self, threshold: JumpThreshold, callback: F) -> JumpHandlerId
    where
        F: Fn(&JumpEvent) + Send + Sync + 'static,
    {
        let id = JumpHandlerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.lock().push(Registration {
            id,
            threshold,
            callback: Arc::new(callback),
        });
        id
    }

    /// Returns false if the handler was not registered (or already removed)
    pub fn unregister(&self, id: JumpHandlerId) -> bool {
        let mut handlers = self.handlers.lock();
        let before = handlers.len();
        handlers.retain(|registration| registration.id != id);
        handlers.len() != before
    }

    pub fn len(&self) -> usize {
        self.handlers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.lock().is_empty()
    }

    /// Invoke every handler whose threshold admits `event`; returns how many ran
    pub fn notify(&self, event: &JumpEvent) -> usize {
        let admitted: Vec<Registration> = self
            .handlers
            .lock()
            .iter()
            .filter(|registration| registration.threshold.admits(event))
            .cloned()
            .collect();

        for registration in &admitted {
            trace!("Notifying jump handler {:?}", registration.id);
            (registration.callback)(event);
        }
        admitted.len()
    }
}

impl Default for JumpNotifier {
    fn default() -> Self {
        Self::new()
    }
}
