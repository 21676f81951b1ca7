use serde::{Deserialize, Serialize};

use crate::values::Timestamp;

/// One published sample of player time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockUpdate {
    pub timestamp: Timestamp,
    /// Monotonic per-publisher sequence, starting at 0
    pub sequence: u64,
}
