use thiserror::Error;

/// Errors reported by the scheduling engine.
///
/// None of these leave the engine half-modified: a failing call returns
/// before touching any state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Index {index} out of range for {len} processes")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No processes to schedule")]
    NoProcesses,
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
