use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

/// Failures surfaced by catalog, submission and ledger operations.
///
/// Validation and authorization reject before any mutation; limit and
/// conflict failures abort the surrounding transaction.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("access denied")]
    AccessDenied,

    #[error("daily limit reached for \"{name}\" on {date}")]
    LimitExceeded {
        chore_type_id: Uuid,
        name: String,
        date: NaiveDate,
        remaining: i64,
    },

    #[error("{0}")]
    Conflict(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Error::Conflict(message.into())
    }
}
