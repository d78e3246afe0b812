//! Error types for command handlers.

use thiserror::Error;

use crate::domain::ValidationError;

/// Error type for command handler operations.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// No handler registered for this command name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    /// Payload decode / deserialization failed.
    #[error("invalid payload: {0}")]
    DecodeFailed(String),
    /// Guard rejected the command (a required field is missing).
    #[error("missing required fields for {0}")]
    GuardRejected(String),
    /// A field failed validation.
    #[error("{0}")]
    Invalid(String),
    /// Record not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Missing caller identity.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Caller lacks the required role.
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("rate limit exceeded")]
    RateLimited { retry_after_secs: u64 },
    /// A required collaborator is not configured.
    #[error("service unavailable: {0}")]
    Unavailable(String),
    /// A third-party API failed.
    #[error("upstream error: {0}")]
    Upstream(String),
    /// Unexpected failure. The message is logged, never returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for HandlerError {
    fn from(err: ValidationError) -> Self {
        HandlerError::Invalid(err.to_string())
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::DecodeFailed(err.to_string())
    }
}

impl HandlerError {
    /// Map this error to an HTTP status code.
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::UnknownCommand(_) => 404,
            HandlerError::DecodeFailed(_) => 400,
            HandlerError::GuardRejected(_) => 400,
            HandlerError::Invalid(_) => 400,
            HandlerError::NotFound(_) => 404,
            HandlerError::Unauthorized(_) => 401,
            HandlerError::Forbidden(_) => 403,
            HandlerError::RateLimited { .. } => 429,
            HandlerError::Unavailable(_) => 503,
            HandlerError::Upstream(_) => 502,
            HandlerError::Internal(_) => 500,
        }
    }

    /// Message safe to return to the caller.
    pub fn public_message(&self) -> String {
        match self {
            HandlerError::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}
