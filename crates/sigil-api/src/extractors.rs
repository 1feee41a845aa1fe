// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Custom extractors for API handlers.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use sigil_core::{AuthError, Identity, Role, RoleQuery};

use crate::context::AuthContext;
use crate::error::ApiError;

// =============================================================================
// Auth Extractor
// =============================================================================

/// Extractor for authenticated requests.
///
/// Yields the identity decoded by [`AuthLayer`](crate::middleware::AuthLayer).
/// Returns 401 on anonymous requests.
///
/// ```rust,ignore
/// async fn handler(Auth(identity): Auth) -> impl IntoResponse {
///     format!("Hello, {}", identity.username)
/// }
/// ```
pub struct Auth(pub Identity);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .and_then(|ctx| ctx.identity.clone())
            .map(Auth)
            .ok_or(ApiError::Auth(AuthError::Unauthenticated))
    }
}

// =============================================================================
// Validated JSON Extractor
// =============================================================================

/// JSON body extractor answering malformed input with our error envelope.
pub struct ValidatedJson<T>(pub T);

impl<S, T> axum::extract::FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(
        req: axum::http::Request<axum::body::Body>,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e)))?;

        Ok(ValidatedJson(value))
    }
}

// =============================================================================
// Role Query Extractor
// =============================================================================

/// Extractor for role listing parameters.
///
/// `page`, `count` and `sort` control paging; every other key is an equality
/// filter.
pub struct RoleQueryParams(pub RoleQuery);

impl<S> FromRequestParts<S> for RoleQueryParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid query parameters: {}", e)))?;

        Ok(RoleQueryParams(RoleQuery::from_params(&params)?))
    }
}

// =============================================================================
// Role Path Extractor
// =============================================================================

/// Extractor for a role name in the path.
pub struct RolePath(pub Role);

impl<S> FromRequestParts<S> for RolePath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(name) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid role: {}", e)))?;

        Ok(RolePath(Role::parse(&name)?))
    }
}

// =============================================================================
// Tests
// =============================================================================
