// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Registration, login and profile handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;

use sigil_core::Profile;

use crate::error::ApiResult;
use crate::extractors::{Auth, ValidatedJson};
use crate::response::TokenResponse;
use crate::state::AppState;

// =============================================================================
// Register
// =============================================================================

/// Register request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
    /// Given name.
    #[serde(default, alias = "firstname")]
    pub first_name: String,
    /// Family name.
    #[serde(default, alias = "lastname")]
    pub last_name: String,
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let profile = Profile::new(request.first_name, request.last_name);
    state
        .accounts()
        .register(&request.username, &request.password, profile)
        .await?;

    Ok((StatusCode::CREATED, Json("User Created")))
}

// =============================================================================
// Login
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Password.
    pub password: String,
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let issued = state
        .accounts()
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(TokenResponse {
        token: issued.token,
    }))
}

// =============================================================================
// Profile
// =============================================================================

/// GET /profile
///
/// Returns the identity carried by the caller's token.
pub async fn profile(Auth(identity): Auth) -> impl IntoResponse {
    Json(identity)
}
