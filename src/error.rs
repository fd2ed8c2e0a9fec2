// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types: backend call failures surfaced to views, and local
//! handler failures converted to HTTP responses.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use reqwest::StatusCode as BackendStatus;

/// Failure of a backend call, or of local draft validation.
///
/// Access functions surface these unchanged; views turn them into a
/// message with [`ApiError::user_message`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Unauthorized (HTTP 401)")]
    Unauthorized,

    #[error("Forbidden (HTTP 403)")]
    Forbidden,

    #[error("Server error (HTTP {0})")]
    ServerError(u16),

    #[error("Request rejected (HTTP {0})")]
    ClientError(u16),

    /// Detected locally; never reaches the backend.
    #[error("{0}")]
    Validation(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Classify a non-success status. Returns `None` for 1xx-3xx.
    pub fn from_status(status: BackendStatus) -> Option<Self> {
        match status.as_u16() {
            401 => Some(ApiError::Unauthorized),
            403 => Some(ApiError::Forbidden),
            code @ 400..=499 => Some(ApiError::ClientError(code)),
            code @ 500..=599 => Some(ApiError::ServerError(code)),
            _ => None,
        }
    }

    /// Classify a transport-level failure.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::NetworkUnreachable(err.to_string())
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::ClientError(404))
    }

    /// Message shown in place of the failed view content.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NetworkUnreachable(_) => {
                "Cannot reach the server. Check your connection and try again.".to_string()
            }
            ApiError::Timeout => "The server took too long to respond.".to_string(),
            ApiError::Unauthorized => {
                "Request failed with status code 401 (not signed in or session expired)."
                    .to_string()
            }
            ApiError::Forbidden => {
                "Request failed with status code 403 (permission denied).".to_string()
            }
            ApiError::ServerError(code) | ApiError::ClientError(code) => {
                format!("Request failed with status code {}.", code)
            }
            ApiError::Validation(msg) => msg.clone(),
            ApiError::InvalidResponse(_) => {
                "The server sent a response that could not be read.".to_string()
            }
        }
    }
}

/// Local handler error that converts to an HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong.".to_string(),
                )
            }
        };

        let body = crate::views::layout::error_page(status.as_u16(), &message);
        (status, Html(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
