//! Event Booking Common
//!
//! Shared pieces for the booking and chat binaries:
//! - Layered configuration (defaults, TOML file, environment)
//! - Logging initialisation

pub mod config;
pub mod logging;

pub use config::{
    AppConfig, AuthSettings, ChatSettings, ConfigError, DevSettings, DevUser, LogFormat,
    LogSettings, MongoSettings, ServerSettings, StorageBackend,
};
pub use logging::init_logging;
