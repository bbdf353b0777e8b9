use dotenvy::dotenv;
use log::LevelFilter;
use serde::Deserialize;
use std::env;

use anyhow::{anyhow, Result};

const CONFIG_PATH_ENV: &str = "CONFIG_PATH";
const DATABASE_URL_ENV: &str = "DATABASE_URL";

pub const DEFAULT_POOL_MAX_SIZE: u32 = 8;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub pool_max_size: Option<u32>,
    pub http_bind_address: Option<String>,
    pub log_level: Option<String>,
}

impl Config {
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE).max(1)
    }

    pub fn bind_address(&self) -> String {
        self.http_bind_address
            .clone()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string())
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
            .as_deref()
            .and_then(|level| level.parse().ok())
            .unwrap_or(LevelFilter::Info)
    }

    /// `:memory:` databases live and die with a single connection.
    pub fn is_in_memory(&self) -> bool {
        self.database_url == ":memory:"
    }
}

pub fn create_test_config() -> Config {
    Config {
        database_url: ":memory:".to_string(),
        pool_max_size: Some(1),
        http_bind_address: None,
        log_level: Some("off".to_string()),
    }
}

pub fn read_config() -> Result<Config> {
    dotenv().ok();

    let mut config: Config = env::var(CONFIG_PATH_ENV)
        .map_err(|_| anyhow!("{CONFIG_PATH_ENV} .env not set"))
        .and_then(|config_path| std::fs::read(&config_path).map_err(|e| anyhow!("{config_path}: {e}")))
        .and_then(|bytes| toml::from_slice(&bytes).map_err(|e| anyhow!("invalid config: {e}")))?;

    if let Ok(database_url) = env::var(DATABASE_URL_ENV) {
        config.database_url = database_url;
    }

    Ok(config)
}
