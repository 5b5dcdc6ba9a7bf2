//! Coalescing screenshot capturer
//!
//! Screenshot requests arrive in bursts, e.g. while the user scrubs through
//! subtitles. Only one capture pipeline is ever live: a request made while
//! another is outstanding reschedules the pending work with its own delay and
//! parameters and shares the outcome every earlier caller is waiting on.
//!
//! Each scheduling mints a new generation. Delayed work that wakes up with a
//! generation other than the latest one has been superseded and is dropped
//! without settling anything.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use media_protocol::{CaptureRequest, CropAndResizeMessage, VideoCommand};
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::{
    CaptureError, CaptureResult, CaptureSettings, CapturedImage, CropResizeService, TabRenderer,
};

/// Outcome shared by every caller of a coalesced capture
pub type CaptureOutcome = Shared<BoxFuture<'static, CaptureResult<String>>>;

/// Capture statistics
#[derive(Debug, Clone, Default)]
pub struct CaptureStats {
    /// Calls to `capture`
    pub requests: u64,
    /// Render pipelines that started
    pub pipelines_started: u64,
    /// Scheduled work dropped because a newer request replaced it
    pub superseded: u64,
    /// Captures that settled with an image
    pub completed: u64,
    /// Captures that settled with an error
    pub failed: u64,
}

/// The resolver lives here rather than in the spawned work, so an unsettled
/// outcome is only abandoned once the capturer itself is gone.
struct InFlight {
    outcome: CaptureOutcome,
    resolver: oneshot::Sender<CaptureResult<String>>,
    generation: u64,
}

#[derive(Default)]
struct CaptureState {
    in_flight: Option<InFlight>,
    last_image: Option<CapturedImage>,
    next_generation: u64,
}

struct Inner {
    renderer: Arc<dyn TabRenderer>,
    cropper: Arc<dyn CropResizeService>,
    settings: Arc<dyn CaptureSettings>,
    state: Mutex<CaptureState>,
    stats: Mutex<CaptureStats>,
}

/// Screenshot capturer; clones share the same pending capture
#[derive(Clone)]
pub struct ImageCapturer {
    inner: Arc<Inner>,
}

impl ImageCapturer {
    pub fn new(
        renderer: Arc<dyn TabRenderer>,
        cropper: Arc<dyn CropResizeService>,
        settings: Arc<dyn CaptureSettings>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                renderer,
                cropper,
                settings,
                state: Mutex::new(CaptureState::default()),
                stats: Mutex::new(CaptureStats::default()),
            }),
        }
    }

    /// Schedule a screenshot of `request.target_id` after `request.delay_ms`.
    ///
    /// The returned outcome resolves to the base64 image payload. If a
    /// capture is already outstanding, this request replaces its parameters
    /// and delay and the existing outcome is returned. Must be called from
    /// within a Tokio runtime.
    pub fn capture(&self, request: CaptureRequest) -> CaptureOutcome {
        let (generation, outcome) = {
            let mut state = self.inner.state.lock();
            state.last_image = None;
            state.next_generation += 1;
            let generation = state.next_generation;

            let outcome = match state.in_flight.as_mut() {
                Some(in_flight) => {
                    debug!(
                        "Rescheduling pending capture: generation {} -> {}, delay={}ms",
                        in_flight.generation, generation, request.delay_ms
                    );
                    in_flight.generation = generation;
                    in_flight.outcome.clone()
                }
                None => {
                    debug!(
                        "Scheduling capture: generation={}, target={}, delay={}ms",
                        generation, request.target_id, request.delay_ms
                    );
                    let (resolver, rx) = oneshot::channel();
                    let outcome = rx
                        .map(|result| result.unwrap_or(Err(CaptureError::Abandoned)))
                        .boxed()
                        .shared();
                    state.in_flight = Some(InFlight {
                        outcome: outcome.clone(),
                        resolver,
                        generation,
                    });
                    outcome
                }
            };

            (generation, outcome)
        };

        self.inner.stats.lock().requests += 1;

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move { inner.run(generation, request).await });

        outcome
    }

    /// Payload of the last successful capture, cleared by every `capture` call
    pub fn last_image_base64(&self) -> Option<String> {
        self.inner
            .state
            .lock()
            .last_image
            .as_ref()
            .map(|image| image.base64.clone())
    }

    /// Last successful capture with its metadata
    pub fn last_image(&self) -> Option<CapturedImage> {
        self.inner.state.lock().last_image.clone()
    }

    /// Whether an outcome is outstanding
    pub fn is_capturing(&self) -> bool {
        self.inner.state.lock().in_flight.is_some()
    }

    pub fn stats(&self) -> CaptureStats {
        self.inner.stats.lock().clone()
    }
}

impl Inner {
    fn is_current(&self, generation: u64) -> bool {
        self.state
            .lock()
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.generation == generation)
    }

    fn drop_stale(&self, generation: u64, stage: &str) {
        debug!("Dropping superseded capture {} {}", generation, stage);
        self.stats.lock().superseded += 1;
    }

    async fn run(self: Arc<Self>, generation: u64, request: CaptureRequest) {
        tokio::time::sleep(Duration::from_millis(request.delay_ms)).await;

        if !self.is_current(generation) {
            self.drop_stale(generation, "before rendering");
            return;
        }

        self.stats.lock().pipelines_started += 1;

        if let Some(result) = self.render(generation, &request).await {
            self.settle(generation, result);
        }
    }

    /// Render and optionally crop. `None` means the work went stale midway.
    async fn render(
        &self,
        generation: u64,
        request: &CaptureRequest,
    ) -> Option<CaptureResult<String>> {
        let data_url = match self.renderer.render_snapshot(request.target_id).await {
            Ok(data_url) => data_url,
            Err(e) => return Some(Err(e)),
        };

        if !self.is_current(generation) {
            self.drop_stale(generation, "after rendering");
            return None;
        }

        if !self.settings.should_crop_screenshots() {
            return Some(Ok(data_url));
        }

        let command = VideoCommand::new(
            CropAndResizeMessage::new(data_url, &request.capture_params),
            request.source_id.clone(),
        );
        let response = match self
            .cropper
            .crop_and_resize(request.target_id, &request.source_id, command)
            .await
        {
            Ok(response) => response,
            Err(e) => return Some(Err(e)),
        };

        if !self.is_current(generation) {
            self.drop_stale(generation, "after cropping");
            return None;
        }

        Some(Ok(response.data_url))
    }

    fn settle(&self, generation: u64, result: CaptureResult<String>) {
        let mut state = self.state.lock();
        let Some(in_flight) = state
            .in_flight
            .take_if(|in_flight| in_flight.generation == generation)
        else {
            drop(state);
            self.drop_stale(generation, "at settlement");
            return;
        };

        let result = result.map(|data_url| {
            let image = CapturedImage::from_data_url(&data_url, generation);
            let payload = image.base64.clone();
            state.last_image = Some(image);
            payload
        });
        drop(state);

        match &result {
            Ok(payload) => {
                info!(
                    "Capture {} complete ({} bytes base64)",
                    generation,
                    payload.len()
                );
                self.stats.lock().completed += 1;
            }
            Err(e) => {
                warn!("Capture {} failed: {}", generation, e);
                self.stats.lock().failed += 1;
            }
        }

        // Waiters may all have gone away; the outcome is still settled.
        let _ = in_flight.resolver.send(result);
    }
}
