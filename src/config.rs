use anyhow::{Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const CONFIG_DIR_NAME: &str = "gemini-chat";
const CONFIG_FILE_NAME: &str = "config.toml";
const API_KEY_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFileConfig {
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_with_path(None)
    }

    /// Resolves settings with precedence: process env, `.env`, config file, defaults.
    pub fn load_with_path(explicit_path: Option<&Path>) -> Result<Self> {
        let config_path = match explicit_path {
            Some(path) if !path.is_file() => {
                bail!(
                    "Failed to load config {}: file does not exist",
                    path.display()
                );
            }
            Some(path) => path.to_path_buf(),
            None => discover_config_path()?,
        };
        let file_config = load_file_config(&config_path)?.unwrap_or_default();

        // dotenvy never overrides variables already set in the process.
        dotenvy::dotenv().ok();

        let api_key = API_KEY_VARS
            .iter()
            .find_map(|key| env_non_empty(key))
            .or_else(|| file_config.api_key.as_deref().and_then(non_empty_owned));

        Ok(Self {
            api_key,
            model: env_non_empty("GEMINI_MODEL")
                .or_else(|| file_config.model.as_deref().and_then(non_empty_owned))
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            base_url: env_non_empty("GEMINI_BASE_URL")
                .or_else(|| file_config.base_url.as_deref().and_then(non_empty_owned))
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
        })
    }
}

fn discover_config_path() -> Result<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let trimmed = xdg.trim();
        if trimmed.is_empty() {
            bail!("Failed to resolve config path: XDG_CONFIG_HOME is set but empty");
        }

        return Ok(PathBuf::from(trimmed)
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME));
    }

    let home = dirs::home_dir()
        .ok_or_else(|| anyhow!("Failed to resolve config path: HOME directory is unavailable"))?;

    Ok(home
        .join(".config")
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME))
}

fn load_file_config(config_path: &Path) -> Result<Option<RawFileConfig>> {
    if !config_path.is_file() {
        return Ok(None);
    }

    let config_text = fs::read_to_string(config_path).map_err(|err| {
        anyhow!(
            "Failed to load config {}: unable to read file: {err}",
            config_path.display()
        )
    })?;

    toml::from_str(&config_text)
        .map(Some)
        .map_err(|err| anyhow!("Failed to load config {}: {err}", config_path.display()))
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .and_then(|value| non_empty_owned(&value))
}

fn non_empty_owned(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
