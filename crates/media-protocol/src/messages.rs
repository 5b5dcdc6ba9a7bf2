//! Messages exchanged with the companion video surface

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    CROP_AND_RESIZE_COMMAND, EXTENSION_TO_VIDEO_SENDER, ImageCaptureParams, ProtocolError,
    ProtocolResult, RectModel,
};

/// Envelope for a command sent from the extension to a video surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoCommand<M> {
    pub sender: String,
    pub message: M,
    /// Video surface the command is addressed to
    pub src: String,
}

impl<M> VideoCommand<M> {
    pub fn new(message: M, src: impl Into<String>) -> Self {
        Self {
            sender: EXTENSION_TO_VIDEO_SENDER.to_string(),
            message,
            src: src.into(),
        }
    }
}

impl<M: Serialize> VideoCommand<M> {
    pub fn to_json(&self) -> ProtocolResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<M: DeserializeOwned> VideoCommand<M> {
    pub fn from_json(json: &str) -> ProtocolResult<Self> {
        let command: Self = serde_json::from_str(json)?;
        if command.sender != EXTENSION_TO_VIDEO_SENDER {
            return Err(ProtocolError::UnexpectedCommand {
                expected: EXTENSION_TO_VIDEO_SENDER,
                actual: command.sender,
            });
        }
        Ok(command)
    }
}

/// Ask the video surface to crop a tab snapshot down to the video and scale it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropAndResizeMessage {
    pub command: String,
    pub data_url: String,
    pub max_width: u32,
    pub max_height: u32,
    pub rect: RectModel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<String>,
}

impl CropAndResizeMessage {
    pub fn new(data_url: impl Into<String>, params: &ImageCaptureParams) -> Self {
        Self {
            command: CROP_AND_RESIZE_COMMAND.to_string(),
            data_url: data_url.into(),
            max_width: params.max_width,
            max_height: params.max_height,
            rect: params.rect,
            frame_id: params.frame_id.clone(),
        }
    }

    /// Reject messages carrying some other command name
    pub fn validate(&self) -> ProtocolResult<()> {
        if self.command != CROP_AND_RESIZE_COMMAND {
            return Err(ProtocolError::UnexpectedCommand {
                expected: CROP_AND_RESIZE_COMMAND,
                actual: self.command.clone(),
            });
        }
        Ok(())
    }
}

/// Reply of the video surface to a crop-and-resize command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropAndResizeResponse {
    pub data_url: String,
}

impl CropAndResizeResponse {
    pub fn from_json(json: &str) -> ProtocolResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
