// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role-based authorization decisions.
//!
//! A decision has two steps that must run in order:
//!
//! 1. [`AuthorizationEngine::require_roles`] confirms every required role is
//!    registered in the [`RoleCatalog`]. A missing role is a deployment fault
//!    (`PolicyMisconfigured`), not a denial.
//! 2. [`AuthorizationEngine::authorize`] checks the identity holds every
//!    required role.
//!
//! [`AuthorizationEngine::enforce`] runs both and maps a denial to
//! `Unauthorized`.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{AuthError, AuthResult};
use crate::store::{RoleCatalog, RoleQuery};
use crate::types::{Identity, Role};

/// Decides whether an identity satisfies a required-role set.
#[derive(Clone)]
pub struct AuthorizationEngine {
    catalog: Arc<dyn RoleCatalog>,
}

impl AuthorizationEngine {
    /// Creates an engine consulting `catalog`.
    pub fn new(catalog: Arc<dyn RoleCatalog>) -> Self {
        Self { catalog }
    }

    /// Confirms every role in `required` exists in the catalog.
    ///
    /// A role exists if an exact-name query returns at least one row.
    /// Duplicate rows do not matter.
    ///
    /// # Errors
    ///
    /// - `PolicyMisconfigured` listing every absent role
    /// - `Upstream` if the catalog fails
    pub async fn require_roles(&self, required: &[Role]) -> AuthResult<()> {
        let mut missing = Vec::new();

        for role in required {
            let rows = self.catalog.list(&RoleQuery::by_name(role)).await?;
            if !rows.iter().any(|row| row == role) {
                missing.push(role.clone());
            }
        }

        if missing.is_empty() {
            return Ok(());
        }

        warn!(
            missing = ?missing.iter().map(Role::as_str).collect::<Vec<_>>(),
            "Required roles are not registered in the catalog"
        );
        Err(AuthError::PolicyMisconfigured { missing })
    }

    /// Returns `true` if `identity` holds every role in `required`.
    ///
    /// An empty requirement permits.
    pub fn authorize(&self, identity: &Identity, required: &[Role]) -> bool {
        required.iter().all(|role| identity.roles.contains(role))
    }

    /// Runs [`require_roles`](Self::require_roles) then
    /// [`authorize`](Self::authorize).
    ///
    /// # Errors
    ///
    /// - `PolicyMisconfigured` if a required role is not registered
    /// - `Unauthorized` if the identity lacks a required role
    pub async fn enforce(&self, identity: &Identity, required: &[Role]) -> AuthResult<()> {
        self.require_roles(required).await?;

        if self.authorize(identity, required) {
            debug!(username = %identity.username, "Authorization granted");
            return Ok(());
        }

        let missing = identity.missing_roles(required);
        warn!(
            username = %identity.username,
            missing = ?missing.iter().map(Role::as_str).collect::<Vec<_>>(),
            "Authorization denied"
        );
        Err(AuthError::Unauthorized {
            username: identity.username.clone(),
            missing,
        })
    }
}

impl std::fmt::Debug for AuthorizationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationEngine").finish_non_exhaustive()
    }
}
