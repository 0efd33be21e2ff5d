use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::Category;

/// Project defaults, also written out as the user's starting config.
const BLUEPRINT: &str = include_str!("../newsdigest.default.toml");

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    Dark,
    Light,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub why_prefix: String,
    pub theme: Option<ThemeChoice>,
    pub digest_topics: Vec<String>,
    pub categories: Vec<Category>,
    pub log_file: Option<String>,
}

impl Settings {
    /// Loads blueprint defaults, the user config (created on first run),
    /// an optional `newsdigest.toml` in the working directory, then
    /// `NEWSDIGEST_*` environment variables.
    pub fn load(user_config_path: &Path) -> Result<Self, ConfigError> {
        // If the user config doesn't exist, create it from the blueprint
        if !user_config_path.exists() {
            if let Some(parent) = user_config_path.parent() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::Foreign(Box::new(e)))?;
            }
            fs::write(user_config_path, BLUEPRINT).map_err(|e| ConfigError::Foreign(Box::new(e)))?;
        }

        let s = Config::builder()
            .add_source(File::from_str(BLUEPRINT, FileFormat::Toml))
            .add_source(File::from(user_config_path.to_path_buf()).required(true))
            .add_source(File::with_name("newsdigest.toml").required(false))
            .add_source(Environment::with_prefix("NEWSDIGEST"))
            .build()?;

        s.try_deserialize()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Saved choice wins; without one, follow the terminal.
    pub fn initial_dark_mode(&self) -> bool {
        resolve_dark_mode(self.theme, terminal_prefers_dark())
    }
}

pub fn resolve_dark_mode(saved: Option<ThemeChoice>, system_prefers_dark: Option<bool>) -> bool {
    match saved {
        Some(choice) => choice == ThemeChoice::Dark,
        None => system_prefers_dark.unwrap_or(false),
    }
}

/// Reads the `COLORFGBG` hint ("fg;bg") some terminals export.
pub fn terminal_prefers_dark() -> Option<bool> {
    let value = std::env::var("COLORFGBG").ok()?;
    parse_colorfgbg(&value)
}

fn parse_colorfgbg(value: &str) -> Option<bool> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(bg <= 6 || bg == 8)
}

pub fn get_user_config_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".config");
    path.push("newsdigest");
    path.push("newsdigest.toml");
    path
}

/// Persists the theme choice, leaving every other key alone.
pub fn save_theme(user_config_path: &Path, dark: bool) -> Result<(), anyhow::Error> {
    let config_str = match fs::read_to_string(user_config_path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };
    let mut doc = config_str.parse::<toml::Table>()?;

    let value = if dark { "dark" } else { "light" };
    doc.insert("theme".to_string(), toml::Value::String(value.to_string()));

    if let Some(parent) = user_config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(user_config_path, doc.to_string())?;

    Ok(())
}
