//! Audio recording for the companion
//!
//! Owns at most one hardware input stream at a time and turns what it
//! records into a base64 clip.

mod error;
mod recorder;
mod traits;

pub use error::*;
pub use recorder::*;
pub use traits::*;
