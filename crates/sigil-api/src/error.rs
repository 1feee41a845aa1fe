// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API error types and handling.
//!
//! Every failure leaves the server as `{"error": {"code", "message"}}` with a
//! status derived from the error kind.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sigil_core::AuthError;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// ApiError
// =============================================================================

/// API error type with HTTP status code mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request (400).
    #[error("Bad request: {message}")]
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Internal server error (500).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message (for logging, not user-facing).
        message: String,
    },

    /// A failure reported by the core.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    /// Creates a bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(err) => match err {
                AuthError::InvalidCredentials
                | AuthError::InvalidToken { .. }
                | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
                AuthError::Unauthorized { .. } => StatusCode::FORBIDDEN,
                AuthError::NotFound { .. } => StatusCode::NOT_FOUND,
                AuthError::DuplicateUsername { .. } => StatusCode::CONFLICT,
                AuthError::Validation { .. } => StatusCode::BAD_REQUEST,
                AuthError::PolicyMisconfigured { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                AuthError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            },
        }
    }

    /// Returns the error code for categorization.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest { .. } => "BAD_REQUEST",
            ApiError::Internal { .. } => "INTERNAL_ERROR",
            ApiError::Auth(err) => err.error_code(),
        }
    }

    /// Returns a message safe to show to clients.
    ///
    /// Server-side failures are not described beyond their kind.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::BadRequest { message } => message.clone(),
            ApiError::Internal { .. } => "Internal server error".to_string(),
            ApiError::Auth(err) => match err {
                AuthError::Unauthorized { .. } => {
                    "User is not authorized to make this request".to_string()
                }
                AuthError::PolicyMisconfigured { .. } => {
                    "Authorization policy is misconfigured".to_string()
                }
                AuthError::Upstream { .. } => "Backing service failure".to_string(),
                other => other.to_string(),
            },
        }
    }

    /// Returns `true` if this error should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

// =============================================================================
// IntoResponse Implementation
// =============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        if self.is_server_error() {
            tracing::error!(
                error = %self,
                error_code = error_code,
                status = %status,
                "Server error occurred"
            );
        } else {
            tracing::debug!(
                error = %self,
                error_code = error_code,
                status = %status,
                "Client error occurred"
            );
        }

        let body = ErrorResponseBody {
            error: ErrorDetails {
                code: error_code.to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Error Response Body
// =============================================================================

/// Error response body structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseBody {
    /// Error details.
    pub error: ErrorDetails,
}

/// Error details within the response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

// =============================================================================
// Tests
// =============================================================================
