// Central Error Type for the Application

use crate::domain::{QueueError, QueueErrorKind};
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Kind of the wrapped queue error, if this is one
    pub fn queue_kind(&self) -> Option<QueueErrorKind> {
        match self {
            AppError::Queue(e) => Some(e.kind()),
            _ => None,
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
