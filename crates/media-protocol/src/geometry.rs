//! Capture geometry and per-request parameters

use serde::{Deserialize, Serialize};

/// Rectangle of the video element inside the rendered tab, in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RectModel {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl RectModel {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Parameters controlling how a screenshot is cropped and scaled
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageCaptureParams {
    /// Maximum output width (0 = unbounded)
    pub max_width: u32,
    /// Maximum output height (0 = unbounded)
    pub max_height: u32,
    /// Region of the tab holding the video
    pub rect: RectModel,
    /// Frame hosting the video, when it is not the top frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<String>,
}

/// A single screenshot request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureRequest {
    /// Tab to render
    pub target_id: u32,
    /// Video surface inside the tab that performs cropping
    pub source_id: String,
    /// Delay before the tab is rendered
    pub delay_ms: u64,
    pub capture_params: ImageCaptureParams,
}

impl CaptureRequest {
    pub fn new(
        target_id: u32,
        source_id: impl Into<String>,
        delay_ms: u64,
        capture_params: ImageCaptureParams,
    ) -> Self {
        Self {
            target_id,
            source_id: source_id.into(),
            delay_ms,
            capture_params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_request_wire_names() {
        let request = CaptureRequest::new(
            7,
            "video-src",
            50,
            ImageCaptureParams {
                max_width: 640,
                max_height: 360,
                rect: RectModel::new(0.0, 10.0, 1280.0, 720.0),
                frame_id: None,
            },
        );

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["targetId"], 7);
        assert_eq!(json["sourceId"], "video-src");
        assert_eq!(json["delayMs"], 50);
        assert_eq!(json["captureParams"]["maxWidth"], 640);
        assert!(json["captureParams"].get("frameId").is_none());
    }
}
