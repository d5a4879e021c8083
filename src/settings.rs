//! Control and voice preferences
//!
//! Persisted separately from tuning in LocalStorage.

use serde::{Deserialize, Serialize};

/// How forgiving voice control is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ControlPreset {
    Relaxed,
    #[default]
    Standard,
    Strict,
}

impl ControlPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlPreset::Relaxed => "Relaxed",
            ControlPreset::Standard => "Standard",
            ControlPreset::Strict => "Strict",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "relaxed" | "easy" => Some(ControlPreset::Relaxed),
            "standard" | "normal" => Some(ControlPreset::Standard),
            "strict" => Some(ControlPreset::Strict),
            _ => None,
        }
    }

    /// Added to each game's voice confidence threshold
    pub fn confidence_offset(&self) -> f32 {
        match self {
            ControlPreset::Relaxed => -0.1,
            ControlPreset::Standard => 0.0,
            ControlPreset::Strict => 0.1,
        }
    }

    /// Window in which a repeated voice command is dropped
    pub fn debounce_ms(&self) -> f32 {
        match self {
            ControlPreset::Relaxed => 60.0,
            ControlPreset::Standard => 100.0,
            ControlPreset::Strict => 150.0,
        }
    }
}

/// Control settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub preset: ControlPreset,

    // === Voice ===
    /// Accept commands from the speech backend at all
    pub voice_enabled: bool,
    /// Fixed confidence threshold, overriding the game's own
    pub min_confidence: Option<f32>,
    /// Same command from the same player inside this window is dropped
    pub debounce_ms: f32,

    // === Voice holds (block/dodge) ===
    /// Re-assert period for an emulated hold
    pub hold_interval_ms: f32,
    /// Total length of an emulated hold before it is released
    pub hold_duration_ms: f32,

    // === Synthetic key presses (pong) ===
    pub press_min_ms: f32,
    /// Press length for a half-volume utterance
    pub press_base_ms: f32,
    pub press_max_ms: f32,
    /// Quietest `volume` message that keeps repeating the last direction
    pub continuous_min_volume: f32,

    // === Feedback ===
    /// Emit camera shake events
    pub screen_shake: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preset: ControlPreset::Standard,

            voice_enabled: true,
            min_confidence: None,
            debounce_ms: ControlPreset::Standard.debounce_ms(),

            hold_interval_ms: 50.0,
            hold_duration_ms: 1500.0,

            press_min_ms: 60.0,
            press_base_ms: 240.0,
            press_max_ms: 800.0,
            continuous_min_volume: 0.1,

            screen_shake: true,
        }
    }
}

impl Settings {
    /// Create settings from a preset (applies preset defaults)
    pub fn from_preset(preset: ControlPreset) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a preset (updates preset-dependent settings)
    pub fn apply_preset(&mut self, preset: ControlPreset) {
        self.preset = preset;
        self.debounce_ms = preset.debounce_ms();
    }

    /// Confidence a voice command needs for a game whose own threshold is `game_default`
    pub fn effective_min_confidence(&self, game_default: f32) -> f32 {
        self.min_confidence
            .unwrap_or(game_default + self.preset.confidence_offset())
            .clamp(0.0, 1.0)
    }

    /// Key-press length for a synthetic voice press at `volume` (0-1).
    ///
    /// Half volume gives `press_base_ms`; growth is quadratic in volume
    /// and capped at `press_max_ms`.
    pub fn synthetic_press_ms(&self, volume: f32) -> f32 {
        let scaled = volume.clamp(0.0, 1.0) * 2.0;
        let curve = scaled * scaled;
        let duration = self.press_min_ms + curve * (self.press_base_ms - self.press_min_ms);
        duration.min(self.press_max_ms)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "duel_arcade_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
