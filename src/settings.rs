//! Game settings and preferences
//!
//! Read once at startup. On the web they come from an inline JSON
//! `<script id="hat-runner-settings">` element, natively from the file named
//! by `HAT_RUNNER_SETTINGS`. Anything unreadable falls back to defaults.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Maximum live lava dots for this preset
    pub fn max_lava_dots(&self) -> usize {
        match self {
            QualityPreset::Low => 120,
            QualityPreset::Medium => 600,
            QualityPreset::High => 1500,
        }
    }

    /// Whether to draw the background scenery (mountains, trees, clouds)
    pub fn scenery_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Lava effect over the canyons
    pub lava: bool,

    // === HUD ===
    /// Show the control instructions while paused
    pub show_hints: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            lava: true,
            show_hints: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Effective lava dot cap
    pub fn max_lava_dots(&self) -> usize {
        if !self.lava {
            0
        } else {
            self.quality.max_lava_dots()
        }
    }

    /// Combined cue volume, zero when muted
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        for (name, value) in [
            ("master_volume", self.master_volume),
            ("sfx_volume", self.sfx_volume),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::SettingOutOfRange { name, value });
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON settings document. Missing fields take
    /// their defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults with a warning when `result` failed
    fn or_default(result: ConfigResult<Self>, source: &str) -> Self {
        match result {
            Ok(settings) => {
                log::info!("Loaded settings from {} ({})", source, settings.quality.as_str());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings from {}: {}", source, e);
                Self::default()
            }
        }
    }

    /// Inline settings element id
    #[cfg(target_arch = "wasm32")]
    const ELEMENT_ID: &'static str = "hat-runner-settings";

    /// Load settings from the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        match json {
            Some(json) => Self::or_default(Self::from_json(&json), Self::ELEMENT_ID),
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Environment variable naming a settings file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub const ENV_VAR: &'static str = "HAT_RUNNER_SETTINGS";

    /// Load settings from the file named by `HAT_RUNNER_SETTINGS` (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::ENV_VAR) else {
            log::info!("Using default settings");
            return Self::default();
        };
        let result = std::fs::read_to_string(&path)
            .map_err(ConfigError::from)
            .and_then(|json| Self::from_json(&json));
        Self::or_default(result, &path)
    }
}
