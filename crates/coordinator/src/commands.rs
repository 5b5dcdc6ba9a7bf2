//! Command handlers exposed to the extension

use std::sync::Arc;
use std::time::Duration;

use capture::{CaptureError, CaptureOutcome};
use media_protocol::{CaptureRequest, ExtensionSettings};
use parking_lot::Mutex;
use recorder::{InputStream, RecorderError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::settings::SettingsError;
use crate::state::AppState;

/// Error type for commands
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Recorder(#[from] RecorderError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("Invalid recording interval: {start_ms}ms to {end_ms}ms")]
    InvalidInterval { start_ms: u64, end_ms: u64 },
    #[error("No media stream to record")]
    MissingStream,
}

impl serde::Serialize for CommandError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

/// Events emitted while commands run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CoordinatorEvent {
    RecordingStarted,
    RecordingFinished { base64_len: usize },
    ScreenshotCaptured { base64_len: usize },
}

/// Media for one exported card
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMedia {
    pub image: Option<String>,
    pub audio: Option<String>,
}

/// Capture the media for the subtitle spanning `start_ms..end_ms`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMediaRequest {
    pub capture: CaptureRequest,
    pub start_ms: u64,
    pub end_ms: u64,
}

/// Take a screenshot, coalescing with any capture already pending
pub async fn capture_screenshot(
    state: &AppState,
    request: CaptureRequest,
) -> CommandResult<String> {
    debug!(
        "Screenshot requested for tab {} in {}ms",
        request.target_id, request.delay_ms
    );
    let image = state.capturer.capture(request).await?;
    state.notify(CoordinatorEvent::ScreenshotCaptured {
        base64_len: image.len(),
    });
    Ok(image)
}

/// Last screenshot produced, if no capture has been requested since
pub fn last_screenshot(state: &AppState) -> Option<String> {
    state.capturer.last_image_base64()
}

/// Start recording `stream`; returns the recording id
pub fn start_recording(state: &AppState, stream: Arc<dyn InputStream>) -> CommandResult<String> {
    let id = state.recorder.start(stream)?;
    state.notify(CoordinatorEvent::RecordingStarted);
    Ok(id.to_string())
}

/// Stop the current recording and return the base64 clip
pub async fn stop_recording(state: &AppState) -> CommandResult<String> {
    let clip = state.recorder.stop().await?;
    state.notify(CoordinatorEvent::RecordingFinished {
        base64_len: clip.len(),
    });
    Ok(clip)
}

/// Record `stream` for `duration_ms` and return the base64 clip
pub async fn record_for(
    state: &AppState,
    stream: Arc<dyn InputStream>,
    duration_ms: u64,
) -> CommandResult<String> {
    let clip = state
        .recorder
        .start_with_timeout(stream, Duration::from_millis(duration_ms), || {
            state.notify(CoordinatorEvent::RecordingStarted)
        })
        .await?;
    state.notify(CoordinatorEvent::RecordingFinished {
        base64_len: clip.len(),
    });
    Ok(clip)
}

pub fn get_settings(state: &AppState) -> ExtensionSettings {
    state.settings.get()
}

/// Merge a partial settings object into the live settings
pub fn update_settings(state: &AppState, patch: &str) -> CommandResult<ExtensionSettings> {
    let settings = state.settings.apply_patch(patch)?;
    info!("Settings updated");
    Ok(settings)
}

/// Gather the screenshot and audio clip for one card.
///
/// Which media are gathered follows the `screenshot` and `recordMedia`
/// settings. When both are on, the screenshot is scheduled as soon as the
/// recording has started so both cover the same moment of playback.
pub async fn capture_card_media(
    state: &AppState,
    stream: Option<Arc<dyn InputStream>>,
    request: CardMediaRequest,
) -> CommandResult<CardMedia> {
    let settings = state.settings.get();
    info!(
        "Capturing card media for {}ms..{}ms (screenshot: {}, audio: {})",
        request.start_ms, request.end_ms, settings.screenshot, settings.record_media
    );

    if !settings.record_media {
        let image = if settings.screenshot {
            Some(capture_screenshot(state, request.capture).await?)
        } else {
            None
        };
        return Ok(CardMedia { image, audio: None });
    }

    if request.end_ms <= request.start_ms {
        return Err(CommandError::InvalidInterval {
            start_ms: request.start_ms,
            end_ms: request.end_ms,
        });
    }
    let stream = stream.ok_or(CommandError::MissingStream)?;

    let pending: Mutex<Option<CaptureOutcome>> = Mutex::new(None);
    let audio = state
        .recorder
        .start_with_timeout(
            stream,
            Duration::from_millis(request.end_ms - request.start_ms),
            || {
                state.notify(CoordinatorEvent::RecordingStarted);
                if settings.screenshot {
                    let outcome = state.capturer.capture(request.capture.clone());
                    *pending.lock() = Some(outcome);
                }
            },
        )
        .await;

    let outcome = pending.lock().take();
    let image = match outcome {
        Some(outcome) => Some(outcome.await),
        None => None,
    };

    let audio = audio.inspect_err(|e| warn!("Card audio failed: {}", e))?;
    state.notify(CoordinatorEvent::RecordingFinished {
        base64_len: audio.len(),
    });

    let image = image.transpose()?;
    if let Some(image) = &image {
        state.notify(CoordinatorEvent::ScreenshotCaptured {
            base64_len: image.len(),
        });
    }

    Ok(CardMedia {
        image,
        audio: Some(audio),
    })
}
