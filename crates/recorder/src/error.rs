//! Recorder error types

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecorderError {
    #[error("Already recording")]
    AlreadyActive,

    #[error("Not recording")]
    NotActive,

    #[error("Recording device failed: {0}")]
    DeviceFailure(String),

    #[error("Encoding recorded audio failed: {0}")]
    EncodingFailure(String),
}

pub type RecorderResult<T> = Result<T, RecorderError>;
