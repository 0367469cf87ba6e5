//! Server settings, read from the environment.

use std::path::PathBuf;

use crate::history::DEFAULT_HISTORY_FILE;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_LOG_FILE: &str = "development.log";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// `PORT`
    pub port: u16,
    /// `LOG_FILE`
    pub log_file: PathBuf,
    /// `HISTORY_PATH`
    pub history_path: PathBuf,
    /// `SENTRY_DSN`; crash reporting is off when unset.
    pub sentry_dsn: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            history_path: PathBuf::from(DEFAULT_HISTORY_FILE),
            sentry_dsn: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; unset or empty keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(port) = get("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| format!("invalid PORT '{port}'"))?;
        }
        if let Some(path) = get("LOG_FILE") {
            config.log_file = PathBuf::from(path);
        }
        if let Some(path) = get("HISTORY_PATH") {
            config.history_path = PathBuf::from(path);
        }
        config.sentry_dsn = get("SENTRY_DSN");

        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
