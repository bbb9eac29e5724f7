//! Game settings and preferences
//!
//! Persisted as JSON: a file on native, LocalStorage on web. Missing fields
//! fall back to defaults so older settings files keep loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StorageResult;
use crate::theme::ThemeId;

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

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }
}

/// Opponent behaviour knobs
///
/// Pursuit gets more aggressive from EASY to HARD: HARD should keep less
/// jitter and less persistence than MEDIUM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    /// Chance EASY keeps a still-legal heading
    pub easy_persistence: f32,
    /// Random cells added to each MEDIUM distance score
    pub medium_jitter: f32,
    pub medium_persistence: f32,
    pub hard_jitter: f32,
    pub hard_persistence: f32,
    /// Spawn weights for EASY, MEDIUM, HARD
    pub difficulty_weights: [f32; 3],
    /// Respawn ring around the player, in cells
    pub spawn_min_distance: f32,
    pub spawn_max_distance: f32,
    pub spawn_attempts: u32,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            easy_persistence: 0.8,
            medium_jitter: 4.0,
            medium_persistence: 0.6,
            hard_jitter: 1.0,
            hard_persistence: 0.3,
            difficulty_weights: [0.2, 0.4, 0.4],
            spawn_min_distance: 15.0,
            spawn_max_distance: 30.0,
            spawn_attempts: 20,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Particle effects (crashes, pickups, teleports)
    pub particles: bool,
    /// Newest trail cells withheld from the renderer
    pub trail_reveal_delay: usize,

    // === Gameplay ===
    pub theme: ThemeId,
    /// Weapon pickups appear in the obstacle field
    pub weapons: bool,
    pub ai: AiTuning,

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

            particles: true,
            trail_reveal_delay: 0,

            theme: ThemeId::Default,
            weapons: false,
            ai: AiTuning::default(),

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Read settings from a JSON file
    pub fn load_from(path: &Path) -> StorageResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings as pretty JSON
    pub fn save_to(&self, path: &Path) -> StorageResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "light_cycle_settings";

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
                    Err(err) => log::warn!("Ignoring stored settings: {}", err),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native: read `path` if given, defaults otherwise
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Failed to load settings from {}: {}", path.display(), err);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_cap_follows_preset() {
        assert_eq!(Settings::from_preset(QualityPreset::Low).max_particles(), 100);
        assert_eq!(Settings::default().max_particles(), 500);
        let mut settings = Settings::from_preset(QualityPreset::High);
        assert_eq!(settings.max_particles(), 2000);
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_quality_from_str() {
        assert_eq!(QualityPreset::from_str("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"theme":"tron","weapons":true,"ai":{"hard_jitter":0.5}}"#)
                .unwrap();
        assert_eq!(settings.theme, ThemeId::Tron);
        assert!(settings.weapons);
        assert_eq!(settings.ai.hard_jitter, 0.5);
        assert_eq!(settings.ai.medium_jitter, 4.0);
        assert_eq!(settings.quality, QualityPreset::Medium);
    }

    #[test]
    fn test_default_tuning_ordering() {
        let ai = AiTuning::default();
        assert!(ai.hard_jitter <= ai.medium_jitter);
        assert!(ai.hard_persistence <= ai.medium_persistence);
        assert!(ai.spawn_min_distance <= ai.spawn_max_distance);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut settings = Settings::default();
        settings.theme = ThemeId::Avatar;
        settings.trail_reveal_delay = 2;
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_or_default(Some(&dir.path().join("missing.json")));
        assert_eq!(settings, Settings::default());
    }
}
