use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadRequest,
    NotFound,
    Unprocessable,
    Internal,
    Unexpected,
}

impl ErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            404 => Self::NotFound,
            422 => Self::Unprocessable,
            500..=599 => Self::Internal,
            _ => Self::Unexpected,
        }
    }
}

/// Error body the question store sends with every non-success status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}

#[derive(Debug, Clone, Error)]
#[error("{status} {code:?}: {message}")]
pub struct ApiException {
    pub status: u16,
    pub code: ErrorCode,
    pub message: String,
}

impl ApiException {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            code: ErrorCode::from_status(status),
            message: message.into(),
        }
    }

    /// True for a not-found response carrying exactly `message`, which the
    /// store uses to signal an empty result rather than a failure.
    pub fn is_not_found_with(&self, message: &str) -> bool {
        self.code == ErrorCode::NotFound && self.message == message
    }
}
