//! Data-access error type

use std::time::Duration;

use super::statement::StatementError;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[source] sqlx::Error),

    /// A single-row lookup matched nothing.
    #[error("no rows in result set")]
    NoRows,

    #[error("malformed statement: {0}")]
    Statement(#[from] StatementError),

    #[error("statement exceeded deadline of {0:?}")]
    Timeout(Duration),

    #[error("database pool already closed")]
    Closed,
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => Self::NoRows,
            other => Self::Sqlx(other),
        }
    }
}
