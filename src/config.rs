use crate::api::DEFAULT_BACKEND_URL;
use crate::errors::{AgriChatError, AgriChatResult};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::RwLock,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub backend_url: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            log_level: "info".to_string(),
        }
    }
}

static CONFIG: Lazy<RwLock<Config>> = Lazy::new(|| RwLock::new(Config::default()));

/// Loads `~/.config/agrichat/config.json` (creating it with defaults when
/// absent), applies the `BACKEND_URL` environment override, validates, and
/// installs the result as the global config.
pub fn initialize_config() -> AgriChatResult<()> {
    let config_path = get_config_path()?;
    let mut config = load_or_create(&config_path)?;

    // Environment wins over the config file
    if let Ok(url) = env::var("BACKEND_URL") {
        if !url.trim().is_empty() {
            config.backend_url = url.trim().to_string();
        }
    }

    validate_config(&config)?;
    *CONFIG.write().unwrap() = config;

    Ok(())
}

fn load_or_create(config_path: &Path) -> AgriChatResult<Config> {
    if config_path.exists() {
        let config_str = fs::read_to_string(config_path)
            .map_err(|e| AgriChatError::config_error(format!("failed to read config file: {}", e)))?;

        serde_json::from_str(&config_str)
            .map_err(|e| AgriChatError::config_error(format!("failed to parse config: {}", e)))
    } else {
        let config = Config::default();

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AgriChatError::config_error(format!("failed to create config directory: {}", e))
            })?;
        }

        let config_str = serde_json::to_string_pretty(&config)
            .map_err(|e| AgriChatError::config_error(format!("failed to serialize config: {}", e)))?;

        fs::write(config_path, config_str)
            .map_err(|e| AgriChatError::config_error(format!("failed to write config file: {}", e)))?;

        Ok(config)
    }
}

fn get_config_path() -> AgriChatResult<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| AgriChatError::config_error("could not determine home directory"))?;

    Ok(home_dir
        .join(".config")
        .join("agrichat")
        .join("config.json"))
}

fn validate_config(config: &Config) -> AgriChatResult<()> {
    if config.backend_url.is_empty() {
        return Err(AgriChatError::config_error("backend_url is required"));
    }

    if !config.backend_url.starts_with("http://") && !config.backend_url.starts_with("https://") {
        return Err(AgriChatError::config_error(
            "backend_url must start with http:// or https://",
        ));
    }

    match config.log_level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        other => Err(AgriChatError::config_error(format!(
            "unknown log level: {}",
            other
        ))),
    }
}

pub fn get_config() -> Config {
    CONFIG.read().unwrap().clone()
}
