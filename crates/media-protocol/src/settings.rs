//! Extension settings record

use serde::{Deserialize, Serialize};

use crate::ProtocolResult;

/// Theme the extension UI last rendered with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeType {
    #[default]
    Dark,
    Light,
}

/// Which player shortcuts the extension binds on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyBindingsSettings {
    pub bind_play: bool,
    pub bind_toggle_subtitles: bool,
    pub bind_toggle_subtitle_track_in_video: bool,
    pub bind_toggle_subtitle_track_in_asbplayer: bool,
    pub bind_seek_to_subtitle: bool,
    pub bind_adjust_offset_to_subtitle: bool,
    pub bind_adjust_offset: bool,
}

impl Default for KeyBindingsSettings {
    fn default() -> Self {
        Self {
            bind_play: true,
            bind_toggle_subtitles: true,
            bind_toggle_subtitle_track_in_video: true,
            bind_toggle_subtitle_track_in_asbplayer: true,
            bind_seek_to_subtitle: true,
            bind_adjust_offset_to_subtitle: true,
            bind_adjust_offset: true,
        }
    }
}

/// Extension settings
///
/// Missing fields take their defaults and unknown fields are ignored, so
/// settings written by older or newer extension versions still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtensionSettings {
    pub display_subtitles: bool,
    /// Record an audio clip for each exported card
    pub record_media: bool,
    /// Take a screenshot for each exported card
    pub screenshot: bool,
    /// Hide subtitles before taking the screenshot
    pub clean_screenshot: bool,
    /// Crop screenshots down to the video element
    pub crop_screenshot: bool,
    pub subs_drag_and_drop: bool,
    pub auto_sync: bool,
    pub last_language_synced: String,
    pub subtitle_position_offset_bottom: f64,
    pub asbplayer_url: String,
    pub last_theme_type: ThemeType,
    #[serde(flatten)]
    pub key_bindings: KeyBindingsSettings,
}

impl Default for ExtensionSettings {
    fn default() -> Self {
        Self {
            display_subtitles: true,
            record_media: true,
            screenshot: true,
            clean_screenshot: true,
            crop_screenshot: true,
            subs_drag_and_drop: true,
            auto_sync: false,
            last_language_synced: String::new(),
            subtitle_position_offset_bottom: 100.0,
            asbplayer_url: "https://killergerbah.github.io/asbplayer/".to_string(),
            last_theme_type: ThemeType::Dark,
            key_bindings: KeyBindingsSettings::default(),
        }
    }
}

impl ExtensionSettings {
    pub fn from_json(json: &str) -> ProtocolResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> ProtocolResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
