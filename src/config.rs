use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, ErrorKind, Result};

const CONFIG_PATH_ENV_VAR: &str = "WEEKFOLD_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("weekfold").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".weekfold.toml"));
    }

    locations
}

/// Loads `path` if given, otherwise the first config file found in the
/// usual locations, otherwise the defaults.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_path(path);
    }

    match find_configfile_locations()
        .into_iter()
        .find(|location| location.is_file())
    {
        Some(location) => Config::from_path(&location),
        None => {
            log::info!("no config file found, using defaults");
            Ok(Config::default())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub tick_rate_ms: u64,
    pub animation_duration_ms: u64,
    pub drag_threshold: f32,
    pub cell_height: u16,
    pub weekday_labels: [String; 7],
    pub footer: String,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            tick_rate_ms: 16,
            animation_duration_ms: 220,
            drag_threshold: 2.0,
            cell_height: 2,
            weekday_labels: [
                "Sun".to_owned(),
                "Mon".to_owned(),
                "Tue".to_owned(),
                "Wed".to_owned(),
                "Thu".to_owned(),
                "Fri".to_owned(),
                "Sat".to_owned(),
            ],
            footer: "No schedule".to_owned(),
        }
    }
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Config> {
        log::info!("loading config from {}", path.display());
        let content = fs::read_to_string(path)?;
        content.parse().map_err(|e: Error| {
            let msg = format!(
                "{}: {}",
                path.display(),
                e.message.as_deref().unwrap_or_default()
            );
            e.with_msg(&msg)
        })
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }

    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    fn validate(self) -> Result<Config> {
        if self.cell_height == 0 {
            return Err(Error::new(
                ErrorKind::ConfigParse,
                "cell_height must be at least 1",
            ));
        }
        if !(self.drag_threshold >= 0.0) {
            return Err(Error::new(
                ErrorKind::ConfigParse,
                "drag_threshold must not be negative",
            ));
        }
        Ok(self)
    }
}

impl std::str::FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()
    }
}
