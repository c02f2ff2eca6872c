//! Orchestrator API error types

use thiserror::Error;

/// Errors that can occur while talking to the orchestrator
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// Check if this error came back from the orchestrator as a non-success status
    pub fn is_status(&self) -> bool {
        matches!(self, ApiError::Status { .. })
    }

    /// Get the HTTP status code, if the orchestrator answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
