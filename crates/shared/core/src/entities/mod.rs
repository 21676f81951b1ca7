mod clock_mode;
mod clock_update;
mod jump;

pub use clock_mode::ClockMode;
pub use clock_update::ClockUpdate;
pub use jump::{JumpDirection, JumpEvent, JumpThreshold};
