use std::{collections::HashMap, error::Error};

use engine::{Currency, StaticCredentials};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";

/// The part of `settings.toml` the command line needs.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    app: AppSection,
    store: StoreSection,
    auth: AuthSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AppSection {
    currency: Currency,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct StoreSection {
    path: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            path: engine::DEFAULT_STORE_PATH.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AuthSection {
    users: HashMap<String, String>,
}

#[derive(Debug)]
pub struct CliConfig {
    pub data: String,
    pub currency: Currency,
    pub credentials: StaticCredentials,
}

/// Reads the settings file if there is one. `data` overrides the store path.
pub fn load(
    config_path: Option<&str>,
    data: Option<String>,
) -> Result<CliConfig, Box<dyn Error + Send + Sync>> {
    let config_path = config_path.unwrap_or(DEFAULT_CONFIG_PATH);
    let file: FileConfig = config::Config::builder()
        .add_source(config::File::with_name(config_path).required(false))
        .add_source(config::Environment::with_prefix("SIKAS").separator("__"))
        .build()?
        .try_deserialize()?;

    if file.auth.users.is_empty() {
        tracing::warn!("no users configured in [auth.users]");
    }

    Ok(CliConfig {
        data: data.unwrap_or(file.store.path),
        currency: file.app.currency,
        credentials: StaticCredentials::new(file.auth.users),
    })
}
