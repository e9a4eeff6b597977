//! Error types and handling for the DayMate service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Main error type for the DayMate service
#[derive(Error, Debug)]
pub enum DayMateError {
    /// A required provider credential or setting is missing
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A provider answered with a non-success status
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// A provider answered, but not with the shape we need
    #[error("Malformed provider response: {message}")]
    MalformedResponse { message: String },

    /// The language model call failed after retries
    #[error("LLM provider error: {message}")]
    Provider { message: String },

    /// Transport failure talking to a provider (connect, timeout, body read)
    #[error("Network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },
}

impl DayMateError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn malformed<S: Into<String>>(message: S) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn provider<S: Into<String>>(message: S) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// HTTP status reported to the caller
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            DayMateError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            DayMateError::Upstream { .. } | DayMateError::MalformedResponse { .. } => {
                StatusCode::BAD_GATEWAY
            }
            DayMateError::Provider { .. } | DayMateError::Network { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get a user-facing error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            DayMateError::Config { message }
            | DayMateError::Upstream { message, .. }
            | DayMateError::MalformedResponse { message } => message.clone(),
            DayMateError::Provider { .. } | DayMateError::Network { .. } => {
                "Internal Server Error".to_string()
            }
        }
    }
}

impl IntoResponse for DayMateError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "detail": self.user_message() }))).into_response()
    }
}
