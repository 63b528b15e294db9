//! Visualizer settings
//!
//! Loaded once at startup from an optional JSON file (`POINTCLOUD_CONFIG`).
//! Every field is optional; missing fields fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::particles::{Mode, ParticleStyle};

/// Env var naming the settings file
pub const CONFIG_ENV: &str = "POINTCLOUD_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Mode every point cloud starts in
    pub mode: Mode,
    /// Size and color shared by all particles
    pub style: ParticleStyle,
}

impl Settings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&text)?;
        info!(path = %path.display(), mode = ?settings.mode, "Settings loaded");
        Ok(settings)
    }

    /// Settings from the file named by `POINTCLOUD_CONFIG`, or defaults when unset
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VisError;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_json_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.mode, Mode::All);
        assert_eq!(settings.style.size, 0.015);
    }

    #[test]
    fn test_partial_override() {
        let settings =
            Settings::from_json_str(r#"{"mode": "CurrentFrame", "style": {"size": 0.05}}"#).unwrap();
        assert_eq!(settings.mode, Mode::CurrentFrame);
        assert_eq!(settings.style.size, 0.05);
        assert_eq!(settings.style.color, ParticleStyle::default().color);
    }

    #[test]
    fn test_invalid_mode_rejected() {
        let err = Settings::from_json_str(r#"{"mode": "Everything"}"#).unwrap_err();
        assert!(matches!(err, VisError::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Settings::load("/nonexistent/pointcloud-settings.json").unwrap_err();
        assert!(matches!(err, VisError::Io(_)));
    }
}
