use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    errors::ConfigError,
    source::{HttpBackend, JsonBackend, LedgerSource},
};

const DEFAULT_DIR_NAME: &str = ".wallet_core";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

pub const HOME_ENV: &str = "WALLET_CORE_HOME";
pub const API_URL_ENV: &str = "WALLET_CORE_API_URL";
pub const API_TOKEN_ENV: &str = "WALLET_CORE_API_TOKEN";
pub const DATA_FILE_ENV: &str = "WALLET_CORE_DATA_FILE";

/// User preferences for the wallet shell and its remote source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_api_base_url")]
    pub api_base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// When set, entries come from this JSON file instead of the HTTP backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
    #[serde(default = "Config::default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "Config::default_true")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_true")]
    pub confirm_deletes: bool,
    #[serde(default = "Config::default_currency_suffix")]
    pub currency_suffix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Self::default_api_base_url(),
            api_token: None,
            data_file: None,
            request_timeout_secs: Self::default_request_timeout_secs(),
            ui_color_enabled: true,
            confirm_deletes: true,
            currency_suffix: Self::default_currency_suffix(),
        }
    }
}

impl Config {
    pub fn default_api_base_url() -> String {
        "http://localhost:8080".into()
    }

    pub fn default_request_timeout_secs() -> u64 {
        10
    }

    pub fn default_currency_suffix() -> String {
        "원".into()
    }

    fn default_true() -> bool {
        true
    }

    /// Applies `WALLET_CORE_API_URL`, `WALLET_CORE_API_TOKEN` and
    /// `WALLET_CORE_DATA_FILE` when present.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var(API_URL_ENV) {
            self.api_base_url = url;
        }
        if let Ok(token) = env::var(API_TOKEN_ENV) {
            self.api_token = Some(token).filter(|value| !value.is_empty());
        }
        if let Some(path) = env::var_os(DATA_FILE_ENV) {
            self.data_file = Some(PathBuf::from(path)).filter(|p| !p.as_os_str().is_empty());
        }
    }

    /// Updates one field from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let flag = |value: &str| match value.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Ok(true),
            "false" | "off" | "no" | "0" => Ok(false),
            other => Err(ConfigError::Invalid(format!(
                "expected true/false for `{key}`, got `{other}`"
            ))),
        };
        let optional = |value: &str| Some(value.trim().to_string()).filter(|v| !v.is_empty());
        match key {
            "api_base_url" => self.api_base_url = value.trim().to_string(),
            "api_token" => self.api_token = optional(value),
            "data_file" => self.data_file = optional(value).map(PathBuf::from),
            "request_timeout_secs" => {
                self.request_timeout_secs = value.trim().parse().map_err(|_| {
                    ConfigError::Invalid(format!("`{value}` is not a number of seconds"))
                })?
            }
            "ui_color_enabled" => self.ui_color_enabled = flag(value)?,
            "confirm_deletes" => self.confirm_deletes = flag(value)?,
            "currency_suffix" => self.currency_suffix = value.to_string(),
            other => {
                return Err(ConfigError::Invalid(format!(
                    "unknown configuration key `{other}`"
                )))
            }
        }
        Ok(())
    }

    /// `(key, value)` pairs for display.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("api_base_url", self.api_base_url.clone()),
            (
                "api_token",
                self.api_token
                    .as_ref()
                    .map(|_| "(set)".to_string())
                    .unwrap_or_else(|| "(none)".into()),
            ),
            (
                "data_file",
                self.data_file
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "(none)".into()),
            ),
            ("request_timeout_secs", self.request_timeout_secs.to_string()),
            ("ui_color_enabled", self.ui_color_enabled.to_string()),
            ("confirm_deletes", self.confirm_deletes.to_string()),
            ("currency_suffix", self.currency_suffix.clone()),
        ]
    }

    /// Builds the source this configuration points at.
    pub fn open_source(&self) -> Result<Box<dyn LedgerSource>, ConfigError> {
        if let Some(path) = &self.data_file {
            return Ok(Box::new(JsonBackend::new(path.clone())));
        }
        let mut backend = HttpBackend::new(
            self.api_base_url.clone(),
            Duration::from_secs(self.request_timeout_secs.max(1)),
        )?;
        if let Some(token) = &self.api_token {
            backend = backend.with_token(token.clone());
        }
        Ok(Box::new(backend))
    }
}

/// Handles persistence for [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let config_dir = base.join(CONFIG_DIR);
        fs::create_dir_all(&config_dir)?;
        Ok(Self::new(config_dir.join(CONFIG_FILE)))
    }

    /// Uses `$WALLET_CORE_HOME`, defaulting to `~/.wallet_core`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.config_path.exists() {
            let data = fs::read_to_string(&self.config_path)?;
            serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config)
            .map_err(|err| ConfigError::Serde(err.to_string()))?;
        let tmp = tmp_path(&self.config_path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.config_path)?;
        Ok(())
    }
}

/// The application data directory.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
