//! Shared message definitions for the capture companion
//!
//! This crate contains the capture geometry, the messages exchanged with the
//! companion video surface, and the extension settings record shared by the
//! capture, recorder and coordinator crates.

mod data_url;
mod error;
mod geometry;
mod messages;
mod settings;

pub use data_url::*;
pub use error::*;
pub use geometry::*;
pub use messages::*;
pub use settings::*;

/// Sender tag stamped on every command the extension sends to a video surface
pub const EXTENSION_TO_VIDEO_SENDER: &str = "asbplayer-extension-to-video";

/// Command name of the crop-and-resize request
pub const CROP_AND_RESIZE_COMMAND: &str = "crop-and-resize";
