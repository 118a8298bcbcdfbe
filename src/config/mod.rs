use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_DIR: &str = "gallery-select";
const APP_CONFIG_FILE: &str = "config.json";

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPathError {
    MissingHomeDirectory,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("long press delay must be non-zero")]
    ZeroLongPressDelay,
    #[error("{field} must be a finite, non-negative distance (got {value})")]
    InvalidDistance { field: &'static str, value: f64 },
    #[error("edge zone must be positive (got {0})")]
    InvalidEdgeZone(f64),
    #[error("scroll speed bounds are inverted or negative: min={min} max={max}")]
    InvalidScrollSpeed { min: f64, max: f64 },
}

/// Tuning for long press, drag promotion and edge auto-scroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub long_press_delay_ms: u64,
    pub long_press_tolerance_px: f64,
    pub drag_threshold_px: f64,
    pub edge_zone_px: f64,
    pub min_scroll_speed: f64,
    pub max_scroll_speed: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            long_press_delay_ms: 400,
            long_press_tolerance_px: 10.0,
            drag_threshold_px: 8.0,
            edge_zone_px: 60.0,
            min_scroll_speed: 6.0,
            max_scroll_speed: 48.0,
        }
    }
}

impl GestureConfig {
    pub fn long_press_delay(&self) -> Duration {
        Duration::from_millis(self.long_press_delay_ms)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.long_press_delay_ms == 0 {
            return Err(ConfigError::ZeroLongPressDelay);
        }
        for (field, value) in [
            ("long_press_tolerance_px", self.long_press_tolerance_px),
            ("drag_threshold_px", self.drag_threshold_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidDistance { field, value });
            }
        }
        if !self.edge_zone_px.is_finite() || self.edge_zone_px <= 0.0 {
            return Err(ConfigError::InvalidEdgeZone(self.edge_zone_px));
        }
        let (min, max) = (self.min_scroll_speed, self.max_scroll_speed);
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
            return Err(ConfigError::InvalidScrollSpeed { min, max });
        }
        Ok(())
    }
}

pub fn load_gesture_config() -> GestureConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_gesture_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_gesture_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> GestureConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return GestureConfig::default(),
    };
    if !path.exists() {
        return GestureConfig::default();
    }
    let config = match std::fs::read_to_string(&path) {
        Ok(contents) => parse_gesture_config(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            GestureConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            GestureConfig::default()
        }
    };
    match config.validate() {
        Ok(()) => config,
        Err(err) => {
            tracing::warn!(%err, ?path, "invalid gesture config; using defaults");
            GestureConfig::default()
        }
    }
}

fn parse_gesture_config(contents: &str) -> serde_json::Result<GestureConfig> {
    serde_json::from_str(contents)
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
