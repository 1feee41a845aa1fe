// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Persistence capabilities consumed by the core.
//!
//! [`UserDirectory`] and [`RoleCatalog`] are the only shared mutable state in
//! the system. Implementations are injected into
//! [`AccountService`](crate::service::AccountService) and
//! [`AuthorizationEngine`](crate::authz::AuthorizationEngine) as trait
//! objects; the in-memory implementations in [`memory`] back tests and
//! single-process deployments.
//!
//! Neither trait offers transactions. Callers composing several calls
//! (lookup then insert, read then replace) race with concurrent writers.

mod memory;
mod query;

pub use memory::{InMemoryRoleCatalog, InMemoryUserDirectory};
pub use query::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, RoleQuery};

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{Role, RoleSet, User};

// =============================================================================
// UserDirectory
// =============================================================================

/// Lookup and mutation of user records.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds a user by exact, case-sensitive username.
    ///
    /// Absence is `Ok(None)`; `Err` is reserved for backend failures.
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Inserts a new user.
    ///
    /// # Errors
    ///
    /// `StoreError::DuplicateUsername` if the username is taken.
    async fn insert(&self, user: User) -> StoreResult<()>;

    /// Replaces a user's role set in a single store operation.
    ///
    /// # Errors
    ///
    /// `StoreError::UserNotFound` if the user does not exist.
    async fn replace_roles(&self, username: &str, roles: RoleSet) -> StoreResult<()>;

    /// Replaces a user's stored password hash.
    ///
    /// # Errors
    ///
    /// `StoreError::UserNotFound` if the user does not exist.
    async fn replace_password_hash(&self, username: &str, password_hash: String)
    -> StoreResult<()>;

    /// Checks that the backend is reachable.
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}

// =============================================================================
// RoleCatalog
// =============================================================================

/// The set of registered role names.
///
/// Duplicate rows are permitted. Existence is decided by listing with an
/// exact-name filter.
#[async_trait]
pub trait RoleCatalog: Send + Sync {
    /// Adds a role row.
    async fn create(&self, role: Role) -> StoreResult<()>;

    /// Removes one row named `role`. Returns `false` if none existed.
    async fn delete(&self, role: &Role) -> StoreResult<bool>;

    /// Lists roles matching `query`.
    async fn list(&self, query: &RoleQuery) -> StoreResult<Vec<Role>>;

    /// Checks that the backend is reachable.
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
