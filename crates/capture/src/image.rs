//! Captured image data

use std::time::Instant;

use media_protocol::{data_url_mime, strip_data_url_prefix};

/// Screenshot produced by a completed capture
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedImage {
    /// Base64 payload without the `data:` prefix
    pub base64: String,
    /// MIME type reported by the data URL, if it carried one
    pub mime: Option<String>,
    /// Generation of the capture that produced this image
    pub generation: u64,
    /// Capture timestamp
    pub captured_at: Instant,
}

impl CapturedImage {
    pub fn from_data_url(data_url: &str, generation: u64) -> Self {
        Self {
            base64: strip_data_url_prefix(data_url).to_string(),
            mime: data_url_mime(data_url).map(str::to_string),
            generation,
            captured_at: Instant::now(),
        }
    }
}
