// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Input that the prediction engine cannot work with (zero distance,
/// terrain outside the allowed set, empty history totals, ...).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Degenerate input: {0}")]
pub struct DegenerateInputError(pub String);

/// Broad failure class of an upstream call. Both classes share the same
/// fallback, but are logged separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorClass {
    ExternalServiceUnavailable,
    MalformedUpstreamResponse,
}

/// Failure talking to Strava or the weather provider.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("{service} request timed out")]
    Timeout { service: &'static str },

    #[error("{service} unreachable: {message}")]
    Unreachable {
        service: &'static str,
        message: String,
    },

    #[error("{service} returned HTTP {status}")]
    Status { service: &'static str, status: u16 },

    #[error("{service} returned a malformed response: {message}")]
    Malformed {
        service: &'static str,
        message: String,
    },

    #[error("{service} request failed: {message}")]
    Unexpected {
        service: &'static str,
        message: String,
    },
}

impl UpstreamError {
    /// Classify a transport-level `reqwest` error.
    pub fn from_reqwest(service: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout { service }
        } else if err.is_connect() {
            UpstreamError::Unreachable {
                service,
                message: err.to_string(),
            }
        } else if err.is_decode() {
            UpstreamError::Malformed {
                service,
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            UpstreamError::Status {
                service,
                status: status.as_u16(),
            }
        } else {
            UpstreamError::Unexpected {
                service,
                message: err.to_string(),
            }
        }
    }

    pub fn class(&self) -> UpstreamErrorClass {
        match self {
            UpstreamError::Malformed { .. } => UpstreamErrorClass::MalformedUpstreamResponse,
            _ => UpstreamErrorClass::ExternalServiceUnavailable,
        }
    }

    /// Timeouts, refused connections, bad statuses and schema drift are
    /// expected in normal operation. Anything else points at a bug.
    pub fn is_expected(&self) -> bool {
        !matches!(self, UpstreamError::Unexpected { .. })
    }

    /// Short label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Timeout { .. } => "timeout",
            UpstreamError::Unreachable { .. } => "unreachable",
            UpstreamError::Status { .. } => "status",
            UpstreamError::Malformed { .. } => "malformed",
            UpstreamError::Unexpected { .. } => "unexpected",
        }
    }

    /// Log a failure that is about to be replaced by a fallback value.
    pub fn log_fallback(&self, fallback: &str) {
        if self.is_expected() {
            tracing::warn!(
                kind = self.kind(),
                class = ?self.class(),
                error = %self,
                fallback,
                "Upstream call failed, using fallback"
            );
        } else {
            tracing::error!(
                kind = self.kind(),
                class = ?self.class(),
                error = %self,
                fallback,
                "Unexpected upstream failure, using fallback"
            );
        }
    }
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    DegenerateInput(#[from] DegenerateInputError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::BadRequest(errors.to_string())
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::DegenerateInput(err) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(err.0.clone()))
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
