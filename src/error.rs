/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Connection error: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Scope already closed")]
    ScopeClosed,
}

impl AppError {
    /// Whether the error means the process should not keep running
    ///
    /// Configuration and pool-creation failures leave nothing usable to
    /// operate on; everything else is scoped to a single unit of work.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Configuration(_) | AppError::Connection(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;
