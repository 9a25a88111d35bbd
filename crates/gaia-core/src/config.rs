use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{GaiaError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub studio: StudioConfig,
    /// User-visible fallback texts sent by the assistant.
    #[serde(default)]
    pub messages: MessagesConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Public URL of the webhook. When set, it is registered with Telegram at startup.
    #[serde(default)]
    pub public_url: String,
}

fn default_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_base_url: default_api_base_url(),
            public_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
    #[serde(default)]
    pub turso_url: String,
    #[serde(default)]
    pub turso_token: String,
}

fn default_db_path() -> String {
    "gaia.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            turso_url: String::new(),
            turso_token: String::new(),
        }
    }
}

impl DatabaseConfig {
    pub fn is_remote(&self) -> bool {
        !self.turso_url.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_webhook_path() -> String {
    "/webhook".to_string()
}

impl ServerConfig {
    /// The webhook path must be a literal route: a leading `/` and no
    /// capture syntax (`{name}`, `:name`, `*rest`).
    pub fn check_webhook_path(&self) -> Result<()> {
        let path = &self.webhook_path;
        if !path.starts_with('/') {
            return Err(GaiaError::Config(format!(
                "server.webhook_path must start with '/', got '{path}'"
            )));
        }
        let has_capture = path.contains(['{', '}'])
            || path
                .split('/')
                .any(|segment| segment.starts_with(':') || segment.starts_with('*'));
        if has_capture {
            return Err(GaiaError::Config(format!(
                "server.webhook_path must be a literal path, got '{path}'"
            )));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            webhook_path: default_webhook_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioConfig {
    /// Tenant key of the single studio profile row.
    #[serde(default = "default_profile_id")]
    pub profile_id: String,
}

fn default_profile_id() -> String {
    "default".to_string()
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            profile_id: default_profile_id(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagesConfig {
    #[serde(default = "default_not_understood")]
    pub not_understood: String,
    #[serde(default = "default_memory_failure")]
    pub memory_failure: String,
    #[serde(default = "default_location_unavailable")]
    pub location_unavailable: String,
    #[serde(default = "default_address_not_configured")]
    pub address_not_configured: String,
    #[serde(default = "default_address_prefix")]
    pub address_prefix: String,
}

fn default_not_understood() -> String {
    "Sorry, I did not understand that command. Could you rephrase it?".to_string()
}

fn default_memory_failure() -> String {
    "Sorry, I could not access my memory right now. Please try again in a moment.".to_string()
}

fn default_location_unavailable() -> String {
    "Sorry, our location is unavailable at the moment.".to_string()
}

fn default_address_not_configured() -> String {
    "Our address has not been configured yet. Please contact the studio directly.".to_string()
}

fn default_address_prefix() -> String {
    "Our address is: ".to_string()
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            not_understood: default_not_understood(),
            memory_failure: default_memory_failure(),
            location_unavailable: default_location_unavailable(),
            address_not_configured: default_address_not_configured(),
            address_prefix: default_address_prefix(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `gaia_brain=debug,info`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

impl Config {
    /// Load config: defaults → gaia.toml → env vars (env wins).
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`] with an explicit environment lookup.
    pub fn load_with_env<F>(path: &Path, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| GaiaError::Config(format!("failed to read config: {e}")))?;
            toml::from_str(&content)
                .map_err(|e| GaiaError::Config(format!("failed to parse config: {e}")))?
        } else {
            Self::default()
        };

        if let Some(v) = env("GAIA_TELEGRAM_TOKEN") {
            config.telegram.token = v;
        }
        if let Some(v) = env("GAIA_PUBLIC_URL") {
            config.telegram.public_url = v;
        }
        if let Some(v) = env("GAIA_TURSO_URL") {
            config.database.turso_url = v;
        }
        if let Some(v) = env("GAIA_TURSO_TOKEN") {
            config.database.turso_token = v;
        }
        if let Some(v) = env("GAIA_DB_PATH") {
            config.database.path = v;
        }
        if let Some(v) = env("GAIA_PORT") {
            config.server.port = v
                .parse()
                .map_err(|e| GaiaError::Config(format!("invalid GAIA_PORT '{v}': {e}")))?;
        }
        if let Some(v) = env("GAIA_LOG") {
            config.log.filter = v;
        }

        config.server.check_webhook_path()?;

        Ok(config)
    }

    /// Check that the credentials needed to answer a message are present.
    pub fn validate(&self) -> Result<()> {
        if self.telegram.token.trim().is_empty() {
            return Err(GaiaError::Config(
                "telegram token is not set (GAIA_TELEGRAM_TOKEN)".to_string(),
            ));
        }
        if self.database.is_remote() {
            if self.database.turso_token.trim().is_empty() {
                return Err(GaiaError::Config(
                    "turso url is set but GAIA_TURSO_TOKEN is missing".to_string(),
                ));
            }
        } else if self.database.path.trim().is_empty() {
            return Err(GaiaError::Config("database path is empty".to_string()));
        }
        Ok(())
    }
}
