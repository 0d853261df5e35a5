//! User settings read from `settings.toml` in the XDG config directory.

use crate::config;
use crate::source::UrlTemplateMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Delay between window opens of one multi-search, in milliseconds
    pub stagger_interval_ms: u64,
    /// Start of a new multi-search drops displays still pending from the last one
    pub cancel_previous_search: bool,
    pub url_template_mode: UrlTemplateMode,
    pub result_window_width: i32,
    pub result_window_height: i32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            stagger_interval_ms: config::DEFAULT_STAGGER_MS,
            cancel_previous_search: true,
            url_template_mode: UrlTemplateMode::Append,
            result_window_width: config::DEFAULT_RESULT_WIDTH,
            result_window_height: config::DEFAULT_RESULT_HEIGHT,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, falling back to defaults
    pub fn load() -> Self {
        match settings_path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::warn!("No config directory, using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from `path`. Missing or malformed files yield defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No settings file at {:?}, using defaults", path);
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                log::warn!("Failed to read settings {:?}: {}", path, e);
                return Self::default();
            }
        };

        match toml::from_str::<AppSettings>(&contents) {
            Ok(settings) => {
                log::info!("Settings loaded from {:?}", path);
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings {:?}, using defaults: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn stagger_interval(&self) -> Duration {
        Duration::from_millis(self.stagger_interval_ms)
    }
}

fn settings_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "myyc", config::APP_NAME)
        .map(|dirs| dirs.config_dir().join(config::SETTINGS_FILE))
}
