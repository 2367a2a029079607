//! Game settings
//!
//! Gameplay tuning read once at startup from an optional JSON file. Anything
//! not in the file keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// How holding reverse moves the bike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ReverseMode {
    /// Brake to a stop while still rolling forward, then creep backward
    #[default]
    DecelerateThenCreep,
    /// Roll backward at the current speed straight away
    Direct,
}

impl ReverseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReverseMode::DecelerateThenCreep => "DecelerateThenCreep",
            ReverseMode::Direct => "Direct",
        }
    }
}

/// Settings errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Gameplay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed; `None` picks one from the clock
    pub seed: Option<u64>,
    /// Number of road segment groups kept alive
    pub segment_count: usize,
    /// Road width in world units (the road model is scaled to this)
    pub road_width: f32,
    /// A segment is recycled once it is this many segment lengths behind the camera
    pub recycle_distance_segments: f32,
    /// Reverse behaviour
    pub reverse_mode: ReverseMode,
    /// Display refresh rate the native driver simulates
    pub refresh_hz: f64,
    /// Frame cap for the native demo ride
    pub demo_frames: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            segment_count: 20,
            road_width: 12.0,
            recycle_distance_segments: 1.0,
            reverse_mode: ReverseMode::DecelerateThenCreep,
            refresh_hz: 60.0,
            demo_frames: 7200,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a file
    pub fn read(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults when the file is absent or bad
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::read(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.segment_count < 2 {
            return Err(SettingsError::Invalid(format!(
                "segment_count must be at least 2 (got {})",
                self.segment_count
            )));
        }
        if !(self.road_width.is_finite() && self.road_width > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "road_width must be positive (got {})",
                self.road_width
            )));
        }
        if !(self.recycle_distance_segments.is_finite() && self.recycle_distance_segments > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "recycle_distance_segments must be positive (got {})",
                self.recycle_distance_segments
            )));
        }
        if !(self.refresh_hz.is_finite() && self.refresh_hz > 0.0) {
            return Err(SettingsError::Invalid(format!(
                "refresh_hz must be positive (got {})",
                self.refresh_hz
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s = Settings::from_json(r#"{ "seed": 42, "reverse_mode": "Direct" }"#).unwrap();
        assert_eq!(s.seed, Some(42));
        assert_eq!(s.reverse_mode, ReverseMode::Direct);
        assert_eq!(s.segment_count, 20);
        assert_eq!(s.road_width, 12.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Settings::from_json(r#"{ "segment_count": 1 }"#),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json(r#"{ "recycle_distance_segments": 0.0 }"#),
            Err(SettingsError::Invalid(_))
        ));
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let s = Settings {
            seed: Some(7),
            recycle_distance_segments: 10.0,
            ..Default::default()
        };
        let back = Settings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(s, back);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let s = Settings::load(Path::new("/definitely/not/here/settings.json"));
        assert_eq!(s, Settings::default());
    }
}
