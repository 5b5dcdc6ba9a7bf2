//! Exclusive audio recording session
//!
//! State machine: `Idle -> start -> Recording -> stop -> Idle`. Starting
//! while recording and stopping while idle are rejected without touching
//! the current state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::{Bytes, BytesMut};
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    ChunkSink, DeviceHandle, InputStream, RecorderError, RecorderResult, RecordingDevice,
};

/// Recorder configuration
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Keep the stream audible while recording it
    pub monitor_playback: bool,
    /// How long `stop` waits for the device to flush its final data
    pub blob_timeout: Duration,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            monitor_playback: true,
            blob_timeout: Duration::from_secs(5),
        }
    }
}

/// Identifies one start/stop cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordingId(pub Uuid);

impl RecordingId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for RecordingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct ActiveRecording {
    id: RecordingId,
    stream: Arc<dyn InputStream>,
    handle: Box<dyn DeviceHandle>,
    chunks: mpsc::UnboundedReceiver<Bytes>,
    started_at: Instant,
}

enum RecorderState {
    Idle,
    Recording(ActiveRecording),
}

/// A recording whose hardware has been released but whose data may still
/// be in flight
struct StoppedRecording {
    id: RecordingId,
    chunks: mpsc::UnboundedReceiver<Bytes>,
}

struct Inner {
    device: Arc<dyn RecordingDevice>,
    config: RecorderConfig,
    state: Mutex<RecorderState>,
}

/// Audio recorder; clones share the same session
#[derive(Clone)]
pub struct AudioRecorder {
    inner: Arc<Inner>,
}

impl AudioRecorder {
    pub fn new(device: Arc<dyn RecordingDevice>, config: RecorderConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                device,
                config,
                state: Mutex::new(RecorderState::Idle),
            }),
        }
    }

    /// Begin recording `stream`
    pub fn start(&self, stream: Arc<dyn InputStream>) -> RecorderResult<RecordingId> {
        let mut state = self.inner.state.lock();
        if let RecorderState::Recording(active) = &*state {
            warn!(
                "Refusing to record stream {}: recording {} already active",
                stream.id(),
                active.id
            );
            return Err(RecorderError::AlreadyActive);
        }

        let (tx, chunks) = mpsc::unbounded_channel();
        let handle = self
            .inner
            .device
            .start(Arc::clone(&stream), ChunkSink::new(tx))?;

        if self.inner.config.monitor_playback {
            if let Err(e) = stream.connect_playback() {
                warn!(
                    "Stream {} will not be audible while recording: {}",
                    stream.id(),
                    e
                );
            }
        }

        let id = RecordingId::new();
        info!("Recording {} started on stream {}", id, stream.id());

        *state = RecorderState::Recording(ActiveRecording {
            id,
            stream,
            handle,
            chunks,
            started_at: Instant::now(),
        });

        Ok(id)
    }

    /// Record `stream` for `duration` and return the encoded clip.
    ///
    /// `on_started` runs once recording has begun. The timed stop runs on
    /// its own task and stops only the recording started here, so dropping
    /// this future does not leave the stream open.
    pub async fn start_with_timeout<F>(
        &self,
        stream: Arc<dyn InputStream>,
        duration: Duration,
        on_started: F,
    ) -> RecorderResult<String>
    where
        F: FnOnce() + Send,
    {
        let id = self.start(stream)?;
        on_started();

        let (tx, rx) = oneshot::channel();
        let recorder = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            debug!("Recording {} reached its {:?} limit", id, duration);
            let _ = tx.send(recorder.stop_matching(Some(id)).await);
        });

        rx.await.unwrap_or_else(|_| {
            Err(RecorderError::EncodingFailure(
                "timed stop did not complete".to_string(),
            ))
        })
    }

    /// Stop recording and return the clip as base64.
    ///
    /// The hardware is released before any data is awaited, so it is freed
    /// even when encoding fails.
    pub async fn stop(&self) -> RecorderResult<String> {
        self.stop_matching(None).await
    }

    pub fn is_recording(&self) -> bool {
        matches!(*self.inner.state.lock(), RecorderState::Recording(_))
    }

    pub fn current_recording(&self) -> Option<RecordingId> {
        match &*self.inner.state.lock() {
            RecorderState::Recording(active) => Some(active.id),
            RecorderState::Idle => None,
        }
    }

    async fn stop_matching(&self, expected: Option<RecordingId>) -> RecorderResult<String> {
        let stopped = self.release(expected)?;
        let blob = self.collect(stopped.chunks).await.inspect_err(|e| {
            warn!("Recording {} produced no clip: {}", stopped.id, e);
        })?;

        info!("Recording {} encoded ({} bytes)", stopped.id, blob.len());
        Ok(STANDARD.encode(&blob))
    }

    /// Leave the recording state and release the device and every track
    fn release(&self, expected: Option<RecordingId>) -> RecorderResult<StoppedRecording> {
        let active = {
            let mut state = self.inner.state.lock();
            match std::mem::replace(&mut *state, RecorderState::Idle) {
                RecorderState::Recording(active)
                    if expected.is_none_or(|id| id == active.id) =>
                {
                    active
                }
                other => {
                    *state = other;
                    return Err(RecorderError::NotActive);
                }
            }
        };

        let ActiveRecording {
            id,
            stream,
            mut handle,
            chunks,
            started_at,
        } = active;

        handle.stop();
        drop(handle);

        let tracks = stream.tracks();
        for track in &tracks {
            track.stop();
        }

        info!(
            "Recording {} stopped after {:?}, released {} track(s) of stream {}",
            id,
            started_at.elapsed(),
            tracks.len(),
            stream.id()
        );

        Ok(StoppedRecording { id, chunks })
    }

    async fn collect(&self, mut chunks: mpsc::UnboundedReceiver<Bytes>) -> RecorderResult<Bytes> {
        let drain = async {
            let mut blob = BytesMut::new();
            while let Some(chunk) = chunks.recv().await {
                blob.extend_from_slice(&chunk);
            }
            blob.freeze()
        };

        tokio::time::timeout(self.inner.config.blob_timeout, drain)
            .await
            .map_err(|_| {
                RecorderError::EncodingFailure(format!(
                    "device did not flush its data within {:?}",
                    self.inner.config.blob_timeout
                ))
            })
    }
}
