use std::{env, fs, path::PathBuf};

use log::info;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unable to read config: {0}")]
    UnableToReadConfig(PathBuf),
    #[error("invalid toml file: {0}")]
    TomlSyntaxError(String),
    #[error("$HOME is not defined")]
    HomeNotDefined,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// First stacking value handed out by the manager.
    pub z_index_base: u64,
    /// Height a window collapses to when minimized.
    pub title_bar_height: i32,
    /// Same as `title_bar_height`, used when the host is touch-primary.
    pub touch_title_bar_height: i32,
    pub min_width: i32,
    pub min_height: i32,
    pub max_width_fraction: f64,
    pub max_height_fraction: f64,
    /// Viewports at most this wide get phone-friendly defaults.
    pub compact_breakpoint: i32,
    pub compact_margin: i32,
    pub log_file: String,
    pub log_level: String,
    pub viewport: ViewportConfig,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        ViewportConfig {
            width: 1280,
            height: 800,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            z_index_base: 10000,
            title_bar_height: 32,
            touch_title_bar_height: 44,
            min_width: 150,
            min_height: 150,
            max_width_fraction: 0.95,
            max_height_fraction: 0.90,
            compact_breakpoint: 768,
            compact_margin: 10,
            log_file: String::from("dialogwm.log"),
            log_level: String::from("info"),
            viewport: ViewportConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
    let home_dir = match env::var("HOME") {
        Ok(home_dir) => home_dir,
        Err(_e) => return Err(ConfigError::HomeNotDefined),
    };

    Ok([home_dir.as_str(), ".config", "dialogwm", "dialogwm.toml"]
        .iter()
        .collect())
}

pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::TomlSyntaxError(e.to_string()))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = config_path()?;
    let config_content = fs::read_to_string(config_path.clone())
        .map_err(|_| ConfigError::UnableToReadConfig(config_path))?;

    let config = parse_config(&config_content)?;
    info!("config loaded !");
    Ok(config)
}
