//! Boundaries the capturer delegates to

use async_trait::async_trait;
use media_protocol::{CropAndResizeMessage, CropAndResizeResponse, VideoCommand};

use crate::CaptureResult;

/// Renders the visible contents of a tab
#[async_trait]
pub trait TabRenderer: Send + Sync {
    /// Snapshot the tab as a data URL.
    ///
    /// Fails with [`crate::CaptureError::RendererFailure`] when the tab is
    /// gone or cannot be rendered.
    async fn render_snapshot(&self, target_id: u32) -> CaptureResult<String>;
}

/// Crops and scales a snapshot, performed by the video surface inside the tab
#[async_trait]
pub trait CropResizeService: Send + Sync {
    /// Send the command to the surface identified by `(target_id, source_id)`.
    ///
    /// Any transport error surfaces as
    /// [`crate::CaptureError::CropServiceFailure`].
    async fn crop_and_resize(
        &self,
        target_id: u32,
        source_id: &str,
        command: VideoCommand<CropAndResizeMessage>,
    ) -> CaptureResult<CropAndResizeResponse>;
}

/// Read-only view of the settings the capturer consults
pub trait CaptureSettings: Send + Sync {
    /// Read on every capture, never cached
    fn should_crop_screenshots(&self) -> bool;
}

impl<F> CaptureSettings for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn should_crop_screenshots(&self) -> bool {
        self()
    }
}
