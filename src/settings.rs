//! Player preferences
//!
//! Persisted in LocalStorage. Game state itself is never saved.

use serde::{Deserialize, Serialize};

use crate::tuning::Difficulty;

/// Which controls to offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ControlPreference {
    /// Keyboard on desktop-sized viewports, touch buttons otherwise
    #[default]
    Auto,
    Keyboard,
    Touch,
}

impl ControlPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlPreference::Auto => "auto",
            ControlPreference::Keyboard => "keyboard",
            ControlPreference::Touch => "touch",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Some(ControlPreference::Auto),
            "keyboard" | "keys" => Some(ControlPreference::Keyboard),
            "touch" => Some(ControlPreference::Touch),
            _ => None,
        }
    }
}

/// Options the painter honors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintOptions {
    /// Blink the player while invulnerable
    pub flash_invulnerable: bool,
    /// Draw explosion particles
    pub particles: bool,
    /// Show the wave-start banner
    pub wave_banner: bool,
}

impl Default for PaintOptions {
    fn default() -> Self {
        Settings::default().paint_options()
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty preselected in the game tab
    pub difficulty: Difficulty,
    pub controls: ControlPreference,

    // === Visual Effects ===
    /// Explosion particles
    pub particles: bool,
    /// "Wave 1 / Get Ready!" banner after start
    pub wave_banner: bool,

    // === Accessibility ===
    /// Reduced motion (no invulnerability blinking)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            controls: ControlPreference::Auto,
            particles: true,
            wave_banner: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective invulnerability flash (respects reduced_motion)
    pub fn effective_flash(&self) -> bool {
        !self.reduced_motion
    }

    pub fn paint_options(&self) -> PaintOptions {
        PaintOptions {
            flash_invulnerable: self.effective_flash(),
            particles: self.particles,
            wave_banner: self.wave_banner,
        }
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "sentiment_invaders_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Stored settings unreadable ({}), using defaults", e),
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
            if let Ok(json) = serde_json::to_string(self) {
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
