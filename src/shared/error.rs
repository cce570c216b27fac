use thiserror::Error;

/// Error taxonomy surfaced to the UI layer. Each variant renders a distinct
/// message so callers never have to show a generic "something went wrong".
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not authenticated: {0}")]
    Unauthenticated(String),
    #[error("Wrong role: {0}")]
    WrongRole(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already registered: {0}")]
    AlreadyRegistered(String),
    #[error("Feedback already submitted: {0}")]
    DuplicateFeedback(String),
    #[error("Registration closed: {0}")]
    RegistrationClosed(String),
    #[error("Event full: {0}")]
    EventFull(String),
    #[error("Invalid rating: {0}")]
    InvalidRating(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Cascade incomplete: {0}")]
    CascadeIncomplete(String),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True for transient store failures that are safe to retry on reads.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::StoreUnavailable(_))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("row not found".to_string()),
            other => AppError::StoreUnavailable(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::StoreUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
