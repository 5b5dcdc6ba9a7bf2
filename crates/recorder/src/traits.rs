//! Recording device trait abstraction

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;

use crate::RecorderResult;

/// A single hardware track of an input stream
pub trait MediaTrack: Send + Sync {
    /// Stop the track and release the hardware behind it
    fn stop(&self);
}

/// Live media stream handed to the recorder
pub trait InputStream: Send + Sync {
    fn id(&self) -> &str;

    fn tracks(&self) -> Vec<Arc<dyn MediaTrack>>;

    /// Route the stream back to the speakers so it stays audible while it
    /// is being captured.
    ///
    /// Called while the recorder holds its state lock: implementations must
    /// not call back into the recorder.
    fn connect_playback(&self) -> RecorderResult<()>;
}

/// Receives recorded data from a device.
///
/// The recording is complete once every clone of the sink has been dropped.
#[derive(Debug, Clone)]
pub struct ChunkSink {
    tx: mpsc::UnboundedSender<Bytes>,
}

impl ChunkSink {
    pub(crate) fn new(tx: mpsc::UnboundedSender<Bytes>) -> Self {
        Self { tx }
    }

    /// Append a chunk. Returns false once the recording has been abandoned.
    pub fn push(&self, chunk: Bytes) -> bool {
        self.tx.send(chunk).is_ok()
    }
}

/// Hardware recorder
pub trait RecordingDevice: Send + Sync {
    /// Start recording `stream`, pushing data into `sink` as it arrives.
    ///
    /// Called while the recorder holds its state lock: implementations must
    /// not call back into the recorder. [`DeviceHandle::stop`] and
    /// [`MediaTrack::stop`] run after the lock is released and may.
    fn start(
        &self,
        stream: Arc<dyn InputStream>,
        sink: ChunkSink,
    ) -> RecorderResult<Box<dyn DeviceHandle>>;
}

/// Handle to a running hardware recorder
pub trait DeviceHandle: Send {
    /// Halt the recorder. The device flushes its final chunk and then drops
    /// its [`ChunkSink`].
    fn stop(&mut self);
}
