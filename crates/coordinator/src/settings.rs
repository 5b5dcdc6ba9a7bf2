//! In-memory extension settings

use std::path::Path;

use capture::CaptureSettings;
use media_protocol::{ExtensionSettings, ProtocolError};
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Invalid settings patch: {0}")]
    InvalidPatch(String),
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Live settings shared by every component.
///
/// Readers always see the current value; nothing downstream caches it.
#[derive(Debug, Default)]
pub struct SettingsStore {
    settings: RwLock<ExtensionSettings>,
}

impl SettingsStore {
    pub fn new(settings: ExtensionSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }

    /// Load settings exported by the extension. A missing file yields the
    /// defaults.
    pub fn load_from_path(path: impl AsRef<Path>) -> SettingsResult<Self> {
        let path = path.as_ref();
        let settings = match std::fs::read_to_string(path) {
            Ok(json) => ExtensionSettings::from_json(&json)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No settings at {}, using defaults", path.display());
                ExtensionSettings::default()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self::new(settings))
    }

    pub fn get(&self) -> ExtensionSettings {
        self.settings.read().clone()
    }

    pub fn update(&self, f: impl FnOnce(&mut ExtensionSettings)) {
        f(&mut self.settings.write());
    }

    /// Merge a partial settings object (extension wire names) into the
    /// current settings
    pub fn apply_patch(&self, patch: &str) -> SettingsResult<ExtensionSettings> {
        let patch: serde_json::Value =
            serde_json::from_str(patch).map_err(|e| SettingsError::InvalidPatch(e.to_string()))?;
        let serde_json::Value::Object(patch) = patch else {
            return Err(SettingsError::InvalidPatch(
                "expected a JSON object".to_string(),
            ));
        };

        let mut settings = self.settings.write();
        let mut merged = serde_json::to_value(&*settings)
            .map_err(|e| SettingsError::InvalidPatch(e.to_string()))?;
        if let serde_json::Value::Object(fields) = &mut merged {
            for (key, value) in patch {
                debug!("Setting {} = {}", key, value);
                fields.insert(key, value);
            }
        }

        *settings = serde_json::from_value(merged)
            .map_err(|e| SettingsError::InvalidPatch(e.to_string()))?;
        Ok(settings.clone())
    }
}

impl CaptureSettings for SettingsStore {
    fn should_crop_screenshots(&self) -> bool {
        self.settings.read().crop_screenshot
    }
}
