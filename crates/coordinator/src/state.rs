//! Application state management

use std::sync::Arc;

use capture::{CropResizeService, ImageCapturer, TabRenderer};
use recorder::{AudioRecorder, RecorderConfig, RecordingDevice};
use tracing::info;

use crate::commands::CoordinatorEvent;
use crate::settings::SettingsStore;

/// Callback receiving coordinator events, e.g. to forward them to the UI
pub type EventNotifier = Arc<dyn Fn(CoordinatorEvent) + Send + Sync>;

/// Application-wide state
pub struct AppState {
    /// Coalescing screenshot capturer
    pub capturer: ImageCapturer,
    /// Exclusive audio recorder
    pub recorder: AudioRecorder,
    /// Live extension settings
    pub settings: Arc<SettingsStore>,
    notifier: Option<EventNotifier>,
}

impl AppState {
    pub fn new(
        renderer: Arc<dyn TabRenderer>,
        cropper: Arc<dyn CropResizeService>,
        device: Arc<dyn RecordingDevice>,
        settings: Arc<SettingsStore>,
        recorder_config: RecorderConfig,
    ) -> Self {
        info!(
            "Coordinator ready (crop screenshots: {}, monitor playback: {})",
            settings.get().crop_screenshot,
            recorder_config.monitor_playback
        );

        Self {
            capturer: ImageCapturer::new(renderer, cropper, settings.clone()),
            recorder: AudioRecorder::new(device, recorder_config),
            settings,
            notifier: None,
        }
    }

    pub fn with_notifier(mut self, notifier: EventNotifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub(crate) fn notify(&self, event: CoordinatorEvent) {
        if let Some(notifier) = &self.notifier {
            notifier(event);
        }
    }
}
