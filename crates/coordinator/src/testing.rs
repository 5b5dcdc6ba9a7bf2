//! In-memory collaborators for coordinator tests

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use capture::{CaptureError, CaptureResult, CropResizeService, TabRenderer};
use media_protocol::{CropAndResizeMessage, CropAndResizeResponse, VideoCommand};
use parking_lot::Mutex;
use recorder::{
    ChunkSink, DeviceHandle, InputStream, MediaTrack, RecorderConfig, RecorderResult,
    RecordingDevice,
};

use crate::{AppState, CoordinatorEvent, SettingsStore};

#[derive(Default)]
pub struct FakeRenderer {
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
}

#[async_trait]
impl TabRenderer for FakeRenderer {
    async fn render_snapshot(&self, target_id: u32) -> CaptureResult<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail.load(Ordering::SeqCst) {
            return Err(CaptureError::RendererFailure(format!(
                "tab {} is gone",
                target_id
            )));
        }
        Ok(format!("data:image/png;base64,TAB{}SHOT{}", target_id, call))
    }
}

#[derive(Default)]
pub struct FakeCropper {
    pub calls: AtomicUsize,
}

#[async_trait]
impl CropResizeService for FakeCropper {
    async fn crop_and_resize(
        &self,
        _target_id: u32,
        _source_id: &str,
        command: VideoCommand<CropAndResizeMessage>,
    ) -> CaptureResult<CropAndResizeResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(CropAndResizeResponse {
            data_url: format!("{}CROPPED", command.message.data_url),
        })
    }
}

#[derive(Default)]
pub struct FakeTrack {
    pub stopped: AtomicBool,
}

impl MediaTrack for FakeTrack {
    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

pub struct FakeStream {
    pub id: String,
    pub track: Arc<FakeTrack>,
}

impl FakeStream {
    pub fn new(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            track: Arc::new(FakeTrack::default()),
        })
    }

    pub fn released(&self) -> bool {
        self.track.stopped.load(Ordering::SeqCst)
    }
}

impl InputStream for FakeStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn tracks(&self) -> Vec<Arc<dyn MediaTrack>> {
        vec![self.track.clone() as Arc<dyn MediaTrack>]
    }

    fn connect_playback(&self) -> RecorderResult<()> {
        Ok(())
    }
}

/// Emits `audio:<stream id>` as soon as recording starts
#[derive(Default)]
pub struct FakeDevice;

struct FakeHandle {
    _sink: ChunkSink,
}

impl DeviceHandle for FakeHandle {
    fn stop(&mut self) {}
}

impl RecordingDevice for FakeDevice {
    fn start(
        &self,
        stream: Arc<dyn InputStream>,
        sink: ChunkSink,
    ) -> RecorderResult<Box<dyn DeviceHandle>> {
        sink.push(Bytes::from(format!("audio:{}", stream.id())));
        Ok(Box::new(FakeHandle { _sink: sink }))
    }
}

pub struct Fixture {
    pub state: AppState,
    pub renderer: Arc<FakeRenderer>,
    pub cropper: Arc<FakeCropper>,
    pub events: Arc<Mutex<Vec<CoordinatorEvent>>>,
}

pub fn fixture() -> Fixture {
    let renderer = Arc::new(FakeRenderer::default());
    let cropper = Arc::new(FakeCropper::default());
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);

    let state = AppState::new(
        renderer.clone(),
        cropper.clone(),
        Arc::new(FakeDevice),
        Arc::new(SettingsStore::default()),
        RecorderConfig::default(),
    )
    .with_notifier(Arc::new(move |event| sink.lock().push(event)));

    Fixture {
        state,
        renderer,
        cropper,
        events,
    }
}
