use replay_core::ClockMode;
use thiserror::Error;

/// Errors raised by clock control operations
///
/// Both contract variants are caller bugs and are reported at the offending call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClockError {
    #[error("{operation} is not supported in {mode} mode")]
    UnsupportedInMode {
        operation: &'static str,
        mode: ClockMode,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClockError {
    pub fn unsupported(operation: &'static str, mode: ClockMode) -> Self {
        ClockError::UnsupportedInMode { operation, mode }
    }
}

pub type ClockResult<T> = std::result::Result<T, ClockError>;
