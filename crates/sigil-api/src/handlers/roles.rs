// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role catalog and membership handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;

use sigil_core::Role;

use crate::error::ApiResult;
use crate::extractors::{RolePath, RoleQueryParams, ValidatedJson};
use crate::response::{MembershipResponse, RoleRow};
use crate::state::AppState;

/// Body naming a role.
#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    /// Role name.
    pub name: String,
}

/// Body naming a user.
#[derive(Debug, Deserialize)]
pub struct MembershipRequest {
    /// Username.
    pub username: String,
}

// =============================================================================
// Catalog
// =============================================================================

/// POST /role
pub async fn create_role(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RoleRequest>,
) -> ApiResult<impl IntoResponse> {
    let role = Role::parse(&request.name)?;
    state.accounts().create_role(role).await?;
    Ok((StatusCode::CREATED, Json("Role Created")))
}

/// DELETE /role
pub async fn delete_role(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RoleRequest>,
) -> ApiResult<impl IntoResponse> {
    let role = Role::parse(&request.name)?;
    state.accounts().delete_role(&role).await?;
    Ok(Json("Role Deleted"))
}

/// GET /role
pub async fn list_roles(
    State(state): State<AppState>,
    RoleQueryParams(query): RoleQueryParams,
) -> ApiResult<impl IntoResponse> {
    let rows: Vec<RoleRow> = state
        .accounts()
        .list_roles(&query)
        .await?
        .into_iter()
        .map(RoleRow::from)
        .collect();
    Ok(Json(rows))
}

// =============================================================================
// Membership
// =============================================================================

/// POST /add-role/{role}
pub async fn add_role(
    State(state): State<AppState>,
    RolePath(role): RolePath,
    ValidatedJson(request): ValidatedJson<MembershipRequest>,
) -> ApiResult<impl IntoResponse> {
    let roles = state
        .accounts()
        .assign_role(&request.username, &role)
        .await?;
    Ok(Json(MembershipResponse {
        username: request.username,
        roles,
    }))
}

/// POST /remove-role/{role}
pub async fn remove_role(
    State(state): State<AppState>,
    RolePath(role): RolePath,
    ValidatedJson(request): ValidatedJson<MembershipRequest>,
) -> ApiResult<impl IntoResponse> {
    let roles = state
        .accounts()
        .unassign_role(&request.username, &role)
        .await?;
    Ok(Json(MembershipResponse {
        username: request.username,
        roles,
    }))
}
