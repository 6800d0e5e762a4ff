use thiserror::Error;

/// Error types for the reporting engine
#[derive(Error, Debug)]
pub enum ReportError {
    /// Malformed caller input (unparseable date, zero limit). Surfaced
    /// directly to the caller and never retried.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Error from the database operations, propagated unchanged. Retry
    /// policy is the calling layer's decision.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

/// Type alias for Result with ReportError
pub type Result<T> = std::result::Result<T, ReportError>;
