//! Error types for the Bird Watch application
//!
//! All errors use thiserror for structured error handling.
//! These errors can be serialized to a UI shell as plain messages.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Not signed in to the backend")]
    Unauthenticated,

    #[error("Invalid category registry: {0}")]
    Registry(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Local store error: {0}")]
    LocalStore(String),

    #[error("A sighting is already being submitted")]
    SubmissionInProgress,

    #[error("Session is locked")]
    PanicEngaged,

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error("{0}")]
    Generic(String),
}

/// Failure of a sighting submission.
///
/// Only transport or remote failures end up here. A missing or denied
/// device location never fails a submission.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Could not reach the backend: {0}")]
    Transport(String),

    #[error("Backend rejected the sighting: {0}")]
    Rejected(String),
}

impl SubmitError {
    /// Message shown to the user; details stay in the logs
    pub fn notice(&self) -> &'static str {
        crate::config::SUBMIT_FAILURE_NOTICE
    }
}

impl From<AppError> for SubmitError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Unauthenticated => {
                SubmitError::Rejected("not signed in to the backend".to_string())
            }
            AppError::Submit(inner) => inner,
            other => SubmitError::Transport(other.to_string()),
        }
    }
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
