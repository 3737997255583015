//! Handles settings for the application. Configuration is written in
//! `settings.toml`, any key can be overridden with a `SIKAS__SECTION__KEY`
//! environment variable.
//!
//! See `settings.toml` for the configuration.
use std::collections::HashMap;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_SETTINGS: &str = "settings";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
    pub currency: engine::Currency,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            currency: engine::Currency::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Store {
    pub path: String,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            path: engine::DEFAULT_STORE_PATH.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
}

#[derive(Debug, Default, Deserialize)]
pub struct Auth {
    #[serde(default)]
    pub users: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub store: Store,
    pub server: Server,
    #[serde(default)]
    pub auth: Auth,
}

impl Settings {
    /// Reads `settings.toml`, or the file named by `SIKAS_CONFIG`.
    pub fn new() -> Result<Self, ConfigError> {
        let path = std::env::var("SIKAS_CONFIG").unwrap_or_else(|_| DEFAULT_SETTINGS.to_string());
        let settings = Config::builder()
            .add_source(File::with_name(&path))
            .add_source(Environment::with_prefix("SIKAS").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
