// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! Store wrappers that delegate to the in-memory implementations and can be
//! switched into failure at any point. Every call is counted.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use sigil_core::{
    InMemoryRoleCatalog, InMemoryUserDirectory, Role, RoleCatalog, RoleQuery, RoleSet,
    StoreError, StoreResult, User, UserDirectory,
};

fn check(switch: &AtomicBool, what: &str) -> StoreResult<()> {
    if switch.load(Ordering::SeqCst) {
        return Err(StoreError::unavailable(format!("injected {} failure", what)));
    }
    Ok(())
}

// =============================================================================
// Failing User Directory
// =============================================================================

/// A user directory with injectable failures.
#[derive(Debug, Default)]
pub struct FailingUserDirectory {
    inner: InMemoryUserDirectory,

    /// Fail `find_by_username`.
    pub fail_reads: AtomicBool,
    /// Fail `insert`, `replace_roles` and `replace_password_hash`.
    pub fail_writes: AtomicBool,
    /// Fail `health_check`.
    pub fail_health: AtomicBool,

    /// Number of `find_by_username` calls.
    pub find_calls: AtomicUsize,
    /// Number of `insert` calls.
    pub insert_calls: AtomicUsize,
    /// Number of `replace_roles` calls.
    pub replace_roles_calls: AtomicUsize,
    /// Number of `replace_password_hash` calls.
    pub replace_hash_calls: AtomicUsize,
}

impl FailingUserDirectory {
    /// Creates a healthy, empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches read failures on or off.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Switches write failures on or off.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Switches health check failures on or off.
    pub fn set_fail_health(&self, fail: bool) {
        self.fail_health.store(fail, Ordering::SeqCst);
    }

    /// Returns the number of role replacements.
    pub fn replace_roles_count(&self) -> usize {
        self.replace_roles_calls.load(Ordering::SeqCst)
    }

    /// Returns the number of password hash replacements.
    pub fn replace_hash_count(&self) -> usize {
        self.replace_hash_calls.load(Ordering::SeqCst)
    }

    /// Returns the stored record without counting the call.
    pub async fn peek(&self, username: &str) -> Option<User> {
        self.inner.find_by_username(username).await.ok().flatten()
    }
}

#[async_trait]
impl UserDirectory for FailingUserDirectory {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        check(&self.fail_reads, "read")?;
        self.inner.find_by_username(username).await
    }

    async fn insert(&self, user: User) -> StoreResult<()> {
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        check(&self.fail_writes, "write")?;
        self.inner.insert(user).await
    }

    async fn replace_roles(&self, username: &str, roles: RoleSet) -> StoreResult<()> {
        self.replace_roles_calls.fetch_add(1, Ordering::SeqCst);
        check(&self.fail_writes, "write")?;
        self.inner.replace_roles(username, roles).await
    }

    async fn replace_password_hash(
        &self,
        username: &str,
        password_hash: String,
    ) -> StoreResult<()> {
        self.replace_hash_calls.fetch_add(1, Ordering::SeqCst);
        check(&self.fail_writes, "write")?;
        self.inner
            .replace_password_hash(username, password_hash)
            .await
    }

    async fn health_check(&self) -> StoreResult<()> {
        check(&self.fail_health, "health")
    }
}

// =============================================================================
// Failing Role Catalog
// =============================================================================

/// A role catalog with injectable failures.
#[derive(Debug, Default)]
pub struct FailingRoleCatalog {
    inner: InMemoryRoleCatalog,

    /// Fail `list`.
    pub fail_reads: AtomicBool,
    /// Fail `create` and `delete`.
    pub fail_writes: AtomicBool,
    /// Fail `health_check`.
    pub fail_health: AtomicBool,

    /// Number of `list` calls.
    pub list_calls: AtomicUsize,
}

impl FailingRoleCatalog {
    /// Creates a healthy catalog holding `roles`.
    pub fn with_roles<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        Self {
            inner: InMemoryRoleCatalog::with_roles(roles),
            ..Self::default()
        }
    }

    /// Switches read failures on or off.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Switches write failures on or off.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Switches health check failures on or off.
    pub fn set_fail_health(&self, fail: bool) {
        self.fail_health.store(fail, Ordering::SeqCst);
    }

    /// Returns the number of list calls.
    pub fn list_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the catalog holds no rows.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl RoleCatalog for FailingRoleCatalog {
    async fn create(&self, role: Role) -> StoreResult<()> {
        check(&self.fail_writes, "write")?;
        self.inner.create(role).await
    }

    async fn delete(&self, role: &Role) -> StoreResult<bool> {
        check(&self.fail_writes, "write")?;
        self.inner.delete(role).await
    }

    async fn list(&self, query: &RoleQuery) -> StoreResult<Vec<Role>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        check(&self.fail_reads, "read")?;
        self.inner.list(query).await
    }

    async fn health_check(&self) -> StoreResult<()> {
        check(&self.fail_health, "health")
    }
}
