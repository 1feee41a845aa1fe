// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API response types.
//!
//! Mutating endpoints answer with a bare JSON string (`"Role Created"`);
//! everything else uses the structures below.

use serde::{Deserialize, Serialize};

use sigil_core::{Role, RoleSet};

/// Response to a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed identity token.
    pub token: String,
}

/// Response for the health endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service version.
    pub version: String,
    /// Store failure, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_error: Option<String>,
}

impl HealthResponse {
    /// Creates a healthy response.
    pub fn healthy() -> Self {
        Self {
            version: crate::VERSION.to_string(),
            store_error: None,
        }
    }

    /// Creates a response reporting a store failure.
    pub fn degraded(error: impl Into<String>) -> Self {
        Self {
            store_error: Some(error.into()),
            ..Self::healthy()
        }
    }

    /// Returns `true` if no store failure was reported.
    pub fn is_healthy(&self) -> bool {
        self.store_error.is_none()
    }
}

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRow {
    /// Role name.
    pub name: Role,
}

impl From<Role> for RoleRow {
    fn from(name: Role) -> Self {
        Self { name }
    }
}

/// A user's roles after a membership change.
#[derive(Debug, Serialize, Deserialize)]
pub struct MembershipResponse {
    /// Affected user.
    pub username: String,
    /// Resulting role set.
    pub roles: RoleSet,
}
