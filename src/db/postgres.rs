use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgConnection, PgPool};

use crate::error::{AppError, AppResult};

/// Connections opened as soon as the pool is created
pub const POOL_MIN_SIZE: u32 = 2;

/// Upper bound on pooled connections; past this callers get direct connections
pub const POOL_MAX_SIZE: u32 = 20;

/// How long `acquire` waits on the pool before falling back
pub const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection target and sizing policy for a [`super::PoolManager`]
///
/// Bounds can only be changed through [`PoolSettings::with_bounds`], which
/// validates them.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub(crate) connect_options: PgConnectOptions,
    pub(crate) min_size: u32,
    pub(crate) max_size: u32,
    pub(crate) acquire_timeout: Duration,
}

impl PoolSettings {
    /// Parses a PostgreSQL connection URL and applies the default size policy
    pub fn new(database_url: &str) -> AppResult<Self> {
        if database_url.trim().is_empty() {
            return Err(AppError::Configuration(
                "Database URL must not be empty".to_string(),
            ));
        }

        let connect_options = PgConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Configuration(format!("Invalid database URL: {}", e)))?;

        Ok(Self {
            connect_options,
            min_size: POOL_MIN_SIZE,
            max_size: POOL_MAX_SIZE,
            acquire_timeout: ACQUIRE_TIMEOUT,
        })
    }

    /// Overrides the pool bounds
    pub fn with_bounds(mut self, min_size: u32, max_size: u32) -> AppResult<Self> {
        if max_size == 0 {
            return Err(AppError::Configuration(
                "Pool max size must be at least 1".to_string(),
            ));
        }
        if min_size > max_size {
            return Err(AppError::Configuration(format!(
                "Pool min size {} exceeds max size {}",
                min_size, max_size
            )));
        }

        self.min_size = min_size;
        self.max_size = max_size;
        Ok(self)
    }

    pub fn min_size(&self) -> u32 {
        self.min_size
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    pub fn acquire_timeout(&self) -> Duration {
        self.acquire_timeout
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn with_application_name(mut self, name: &str) -> Self {
        self.connect_options = self.connect_options.application_name(name);
        self
    }

    /// Host and database, for log lines (never includes credentials)
    pub fn target(&self) -> String {
        format!(
            "{}:{}/{}",
            self.connect_options.get_host(),
            self.connect_options.get_port(),
            self.connect_options.get_database().unwrap_or_default()
        )
    }
}

/// Creates a PostgreSQL connection pool
///
/// Opens `min_size` connections up front so the first callers do not pay
/// connection-establishment cost.
pub async fn create_pool(settings: &PoolSettings) -> AppResult<PgPool> {
    let pool = PgPoolOptions::new()
        .min_connections(settings.min_size)
        .max_connections(settings.max_size)
        .acquire_timeout(settings.acquire_timeout)
        .connect_with(settings.connect_options.clone())
        .await
        .map_err(AppError::Connection)?;

    let mut warm = Vec::with_capacity(settings.min_size as usize);
    for _ in 0..settings.min_size {
        warm.push(pool.acquire().await.map_err(AppError::Connection)?);
    }
    drop(warm);

    Ok(pool)
}

/// Opens a single connection outside of any pool
pub async fn connect_direct(settings: &PoolSettings) -> AppResult<PgConnection> {
    settings
        .connect_options
        .connect()
        .await
        .map_err(AppError::Connection)
}
