//! Screenshot capture for the companion
//!
//! Coalesces bursts of screenshot requests into a single delayed render of
//! the tab, optionally cropped to the video by the video surface itself.

mod capturer;
mod error;
mod image;
mod traits;

pub use capturer::*;
pub use error::*;
pub use image::*;
pub use traits::*;
