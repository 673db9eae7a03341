use serde::Deserialize;

use crate::db::PoolSettings;
use crate::error::{AppError, AppResult};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL database connection URL (required)
    pub database_url: String,

    /// Name reported to PostgreSQL in `pg_stat_activity`
    #[serde(default = "default_application_name")]
    pub application_name: String,

    /// Default tracing filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log output format: "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_application_name() -> String {
    "bizsim-db".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Config = envy::from_iter(vars)
            .map_err(|e| AppError::Configuration(format!("Failed to load config: {}", e)))?;

        if config.database_url.trim().is_empty() {
            return Err(AppError::Configuration(
                "DATABASE_URL must not be empty".to_string(),
            ));
        }

        Ok(config)
    }

    /// Pool settings for the configured database, using the fixed size policy
    pub fn pool_settings(&self) -> AppResult<PoolSettings> {
        Ok(PoolSettings::new(&self.database_url)?.with_application_name(&self.application_name))
    }
}
