//! Configuration
//!
//! Settings are layered: built-in defaults, then an optional TOML file
//! (path taken from `EB_CONFIG`), then environment variables.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `EB_CONFIG` | - | Path to a TOML config file |
//! | `EB_HOST` | `0.0.0.0` | Bind address |
//! | `EB_API_PORT` | `8080` | Booking API port |
//! | `EB_STORAGE` | `mongo` | `mongo` or `memory` |
//! | `EB_MONGO_URL` | `mongodb://localhost:27017` | MongoDB connection URL |
//! | `EB_MONGO_DB` | `event_booking` | MongoDB database name |
//! | `EB_JWT_SECRET` | - | HS256 signing secret |
//! | `EB_TOKEN_EXPIRY_MINUTES` | `30` | Access token lifetime |
//! | `EB_LOG_FORMAT` | `text` | `text` or `json` |
//! | `EB_DEV_MODE` | `false` | Seed dev users, allow the dev secret |
//! | `EB_CHAT_PORT` | `8081` | Chat proxy port |
//! | `OPENAI_API_KEY` | - | Upstream chat API key |
//! | `EB_CHAT_BASE_URL` | `https://api.openai.com/v1` | Upstream base URL |
//! | `EB_CHAT_MODEL` | `gpt-4` | Upstream model |

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Signing secret used when dev mode is on and no secret is configured.
pub const DEV_JWT_SECRET: &str = "event-booking-dev-secret";

/// Longest accepted token lifetime, one year.
pub const MAX_TOKEN_EXPIRY_MINUTES: i64 = 365 * 24 * 60;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required setting: {0}")]
    Missing(&'static str),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerSettings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where users and events are stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Mongo,
    /// Process-local maps, lost on restart
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(Self::Mongo),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::InvalidValue {
                key: "storage".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MongoSettings {
    pub url: String,
    pub database: String,
}

impl Default for MongoSettings {
    fn default() -> Self {
        Self {
            url: "mongodb://localhost:27017".to_string(),
            database: "event_booking".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_expiry_minutes: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_expiry_minutes: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidValue {
                key: "log.format".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub format: LogFormat,
}

/// A user created by the dev seeder
#[derive(Debug, Clone, Deserialize)]
pub struct DevUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DevSettings {
    pub enabled: bool,
    pub users: Vec<DevUser>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    pub port: u16,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            port: 8081,
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4".to_string(),
        }
    }
}

/// Top-level configuration shared by both binaries
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub storage: StorageBackend,
    pub mongo: MongoSettings,
    pub auth: AuthSettings,
    pub log: LogSettings,
    pub dev: DevSettings,
    pub chat: ChatSettings,
}

impl AppConfig {
    /// Load from `EB_CONFIG` (if set) and the process environment.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var("EB_CONFIG") {
            Ok(path) if !path.is_empty() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = get("EB_HOST") {
            self.server.host = v;
        }
        if let Some(v) = get("EB_API_PORT") {
            self.server.port = parse_value("EB_API_PORT", &v)?;
        }
        if let Some(v) = get("EB_STORAGE") {
            self.storage = v.parse()?;
        }
        if let Some(v) = get("EB_MONGO_URL") {
            self.mongo.url = v;
        }
        if let Some(v) = get("EB_MONGO_DB") {
            self.mongo.database = v;
        }
        if let Some(v) = get("EB_JWT_SECRET") {
            self.auth.jwt_secret = v;
        }
        if let Some(v) = get("EB_TOKEN_EXPIRY_MINUTES") {
            self.auth.token_expiry_minutes = parse_value("EB_TOKEN_EXPIRY_MINUTES", &v)?;
        }
        if let Some(v) = get("EB_LOG_FORMAT") {
            self.log.format = v.parse()?;
        }
        if let Some(v) = get("EB_DEV_MODE") {
            self.dev.enabled = v == "true" || v == "1";
        }
        if let Some(v) = get("EB_CHAT_PORT") {
            self.chat.port = parse_value("EB_CHAT_PORT", &v)?;
        }
        if let Some(v) = get("OPENAI_API_KEY") {
            self.chat.api_key = v;
        }
        if let Some(v) = get("EB_CHAT_BASE_URL") {
            self.chat.base_url = v;
        }
        if let Some(v) = get("EB_CHAT_MODEL") {
            self.chat.model = v;
        }
        Ok(())
    }

    /// Check the settings the booking API needs.
    pub fn validate_platform(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() && !self.dev.enabled {
            return Err(ConfigError::Missing("auth.jwt_secret (EB_JWT_SECRET)"));
        }
        if !(1..=MAX_TOKEN_EXPIRY_MINUTES).contains(&self.auth.token_expiry_minutes) {
            return Err(ConfigError::InvalidValue {
                key: "auth.token_expiry_minutes".to_string(),
                value: self.auth.token_expiry_minutes.to_string(),
            });
        }
        Ok(())
    }

    /// Check the settings the chat proxy needs.
    pub fn validate_chat(&self) -> Result<()> {
        if self.chat.api_key.is_empty() {
            return Err(ConfigError::Missing("chat.api_key (OPENAI_API_KEY)"));
        }
        Ok(())
    }

    /// Signing secret, falling back to the dev secret in dev mode.
    pub fn jwt_secret(&self) -> &str {
        if self.auth.jwt_secret.is_empty() && self.dev.enabled {
            DEV_JWT_SECRET
        } else {
            &self.auth.jwt_secret
        }
    }

    pub fn chat_bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.chat.port)
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
