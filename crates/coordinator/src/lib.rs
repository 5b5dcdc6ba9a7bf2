//! Media capture coordinator
//!
//! Composition root of the companion: wires the screenshot capturer and the
//! audio recorder to the extension settings and exposes the command surface
//! the extension talks to.

pub mod commands;
mod logging;
mod settings;
mod state;

#[cfg(test)]
mod testing;

pub use commands::{CardMedia, CardMediaRequest, CommandError, CommandResult, CoordinatorEvent};
pub use logging::init_tracing;
pub use settings::{SettingsError, SettingsResult, SettingsStore};
pub use state::{AppState, EventNotifier};
