use std::future::Future;
use std::sync::Arc;

use sqlx::postgres::PgArguments;
use sqlx::query::Query;
use sqlx::{Postgres, Row};
use tokio::sync::Mutex;

use super::pool::{DbConnection, PoolManager};
use crate::error::{AppError, AppResult};
use crate::models::Record;

/// Whether a scope keeps its writes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommitPolicy {
    /// Roll back when the work finishes; for reads
    #[default]
    Never,
    /// Commit when the work returns `Ok`
    OnSuccess,
}

/// Query handle for one unit of work
///
/// All queries run on the scope's single connection inside its
/// transaction. Clones share that connection. Once the unit of work has
/// finished, every method returns [`AppError::ScopeClosed`].
#[derive(Clone)]
pub struct Scope {
    conn: Arc<Mutex<Option<DbConnection>>>,
}

impl Scope {
    /// Runs a statement and returns the number of rows affected
    pub async fn execute(&self, query: Query<'_, Postgres, PgArguments>) -> AppResult<u64> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(AppError::ScopeClosed)?;
        let done = query.execute(conn.executor()?).await?;
        Ok(done.rows_affected())
    }

    pub async fn fetch_all(
        &self,
        query: Query<'_, Postgres, PgArguments>,
    ) -> AppResult<Vec<Record>> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(AppError::ScopeClosed)?;
        let rows = query.fetch_all(conn.executor()?).await?;
        rows.iter().map(Record::from_row).collect()
    }

    pub async fn fetch_optional(
        &self,
        query: Query<'_, Postgres, PgArguments>,
    ) -> AppResult<Option<Record>> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(AppError::ScopeClosed)?;
        let row = query.fetch_optional(conn.executor()?).await?;
        row.as_ref().map(Record::from_row).transpose()
    }

    /// Fetches exactly one row; no row is a database error
    pub async fn fetch_one(&self, query: Query<'_, Postgres, PgArguments>) -> AppResult<Record> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(AppError::ScopeClosed)?;
        let row = query.fetch_one(conn.executor()?).await?;
        Record::from_row(&row)
    }

    /// Reads the first column of the first row as a count
    pub async fn count(&self, query: Query<'_, Postgres, PgArguments>) -> AppResult<i64> {
        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(AppError::ScopeClosed)?;
        let row = query.fetch_one(conn.executor()?).await?;
        Ok(row.try_get::<i64, _>(0)?)
    }

    /// True when a `SELECT COUNT(*)` query reports at least one row
    pub async fn has_rows(&self, query: Query<'_, Postgres, PgArguments>) -> AppResult<bool> {
        Ok(self.count(query).await? > 0)
    }

    /// Whether this handle's connection is a fall-back direct connection
    pub async fn is_direct(&self) -> AppResult<bool> {
        let guard = self.conn.lock().await;
        guard
            .as_ref()
            .map(DbConnection::is_direct)
            .ok_or(AppError::ScopeClosed)
    }
}

impl PoolManager {
    /// Runs `work` inside a transaction on one borrowed connection
    ///
    /// With [`CommitPolicy::OnSuccess`] an `Ok` result is committed; with
    /// [`CommitPolicy::Never`] it is rolled back. An `Err` is always rolled
    /// back and then returned exactly as `work` produced it. The connection
    /// is released on every path.
    pub async fn with_scope<T, E, F, Fut>(&self, policy: CommitPolicy, work: F) -> Result<T, E>
    where
        F: FnOnce(Scope) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<AppError>,
    {
        let mut conn = self.acquire().await?;
        if let Err(e) = conn.begin().await {
            self.release(conn).await;
            return Err(e.into());
        }

        let slot = Arc::new(Mutex::new(Some(conn)));
        let result = work(Scope {
            conn: Arc::clone(&slot),
        })
        .await;

        let taken = slot.lock().await.take();
        let Some(mut conn) = taken else {
            return Err(AppError::ScopeClosed.into());
        };

        let outcome = match result {
            Ok(value) => match policy {
                CommitPolicy::OnSuccess => conn.commit().await.map(|()| value).map_err(E::from),
                CommitPolicy::Never => {
                    if let Err(e) = conn.rollback().await {
                        tracing::warn!(error = %e, "Failed to roll back uncommitted scope");
                    }
                    Ok(value)
                }
            },
            Err(err) => {
                if let Err(e) = conn.rollback().await {
                    tracing::warn!(error = %e, "Failed to roll back after scope error");
                }
                Err(err)
            }
        };

        self.release(conn).await;
        outcome
    }
}
