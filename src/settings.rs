//! Demo settings
//!
//! Read once at startup from an optional JSON file. Every section and field
//! falls back to the defaults in `crate::consts`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::app::ResizeGuard;
use crate::consts::*;
use crate::error::{DemoError, DemoResult};

/// Window settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: WINDOW_WIDTH,
            height: WINDOW_HEIGHT,
            resizable: true,
        }
    }
}

/// Physics and scenario settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Seconds per physics sub-step
    pub fixed_dt: f32,
    /// Sub-steps per frame at startup (the slow-mo toggle flips between 2 and 1)
    pub substeps: u32,
    pub ball_speed: f32,
    pub ball_radius: f32,
    /// Initial direction of travel, degrees
    pub initial_heading_deg: f32,
    /// Enclose the initial window rectangle with static walls
    pub walls: bool,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            fixed_dt: SIM_DT,
            substeps: SUBSTEPS_NORMAL,
            ball_speed: BALL_SPEED,
            ball_radius: BALL_RADIUS,
            initial_heading_deg: BALL_HEADING_DEG,
            walls: true,
        }
    }
}

/// Presentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub target_fps: u32,
    pub clear_color: [u8; 3],
    /// Which size the zoom update checks before rescaling
    pub resize_guard: ResizeGuard,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            target_fps: TARGET_FPS,
            clear_color: CLEAR_COLOR,
            resize_guard: ResizeGuard::default(),
        }
    }
}

/// All demo settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub window: WindowSettings,
    pub physics: PhysicsSettings,
    pub display: DisplaySettings,
    /// Background image path
    pub asset_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            physics: PhysicsSettings::default(),
            display: DisplaySettings::default(),
            asset_path: PathBuf::from(ASSET_PATH),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or defaults when no path is given or the
    /// file does not exist.
    pub fn load(path: Option<&Path>) -> DemoResult<Self> {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Ok(Self::default());
        };

        match std::fs::read_to_string(path) {
            Ok(json) => {
                let settings = Self::from_json(&json)
                    .map_err(|e| DemoError::Config(format!("{}: {}", path.display(), e)))?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("Settings file {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(DemoError::Config(format!("{}: {}", path.display(), e))),
        }
    }

    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> DemoResult<Self> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|e| DemoError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> DemoResult<()> {
        if !(self.physics.fixed_dt > 0.0) {
            return Err(DemoError::Config("physics.fixed_dt must be positive".into()));
        }
        if self.physics.substeps == 0 {
            return Err(DemoError::Config("physics.substeps must be at least 1".into()));
        }
        if self.display.target_fps == 0 {
            return Err(DemoError::Config("display.target_fps must be at least 1".into()));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(DemoError::Config("window size must be non-zero".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.window.width, 1280);
        assert_eq!(settings.window.height, 720);
        assert_eq!(settings.physics.substeps, 2);
        assert_eq!(settings.display.target_fps, 60);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let settings = Settings::from_json(r#"{ "physics": { "walls": false } }"#).unwrap();
        assert!(!settings.physics.walls);
        assert_eq!(settings.physics.ball_speed, BALL_SPEED);
        assert_eq!(settings.asset_path, PathBuf::from("spaghetti.png"));
    }

    #[test]
    fn test_resize_guard_parses() {
        let settings =
            Settings::from_json(r#"{ "display": { "resize_guard": "current_size" } }"#).unwrap();
        assert_eq!(settings.display.resize_guard, ResizeGuard::CurrentSize);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Settings::from_json(r#"{ "physics": { "substeps": 0 } }"#).is_err());
        assert!(Settings::from_json(r#"{ "physics": { "fixed_dt": 0.0 } }"#).is_err());
        assert!(Settings::from_json(r#"{ "display": { "target_fps": 0 } }"#).is_err());
        assert!(Settings::from_json("not json").is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = Path::new("definitely/not/here/settings.json");
        let settings = Settings::load(Some(path)).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
