// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Liveness and health handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::response::HealthResponse;
use crate::state::AppState;

/// GET /ping
pub async fn ping() -> String {
    format!("OK, {}", crate::VERSION)
}

/// GET /health
///
/// Checks both stores. A failing store answers 424 with the failure in
/// `store_error`.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    match state.accounts().health_check().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::healthy())),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::FAILED_DEPENDENCY,
                Json(HealthResponse::degraded(e.to_string())),
            )
        }
    }
}
