pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;

pub use config::Config;
pub use db::{CommitPolicy, PoolManager, Scope};
pub use error::{AppError, AppResult};
