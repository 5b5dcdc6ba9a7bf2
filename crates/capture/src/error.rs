//! Capture error types

use thiserror::Error;

/// Every caller waiting on a coalesced capture receives its own copy of the
/// outcome, so the error is `Clone`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("Tab render failed: {0}")]
    RendererFailure(String),

    #[error("Crop and resize failed: {0}")]
    CropServiceFailure(String),

    /// The capturer and its pending work were dropped before settling
    #[error("Capturer dropped before the capture completed")]
    Abandoned,
}

pub type CaptureResult<T> = Result<T, CaptureError>;
