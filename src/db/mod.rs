pub mod pool;
pub mod postgres;
pub mod scope;

pub use pool::{DbConnection, PoolManager, PoolStats};
pub use postgres::{PoolSettings, ACQUIRE_TIMEOUT, POOL_MAX_SIZE, POOL_MIN_SIZE};
pub use scope::{CommitPolicy, Scope};
