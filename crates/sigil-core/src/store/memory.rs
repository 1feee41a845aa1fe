// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-memory directory and catalog.
//!
//! Both stores guard their contents with a `parking_lot::RwLock`. Locks are
//! never held across an `.await`. Data is lost when the store is dropped.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use super::{RoleCatalog, RoleQuery, UserDirectory};
use crate::error::{StoreError, StoreResult};
use crate::types::{Role, RoleSet, User};

// =============================================================================
// InMemoryUserDirectory
// =============================================================================

/// A [`UserDirectory`] backed by a hash map keyed by username.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored users.
    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    /// Returns `true` if no users are stored.
    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self.users.read().get(username).cloned())
    }

    async fn insert(&self, user: User) -> StoreResult<()> {
        let mut users = self.users.write();
        if users.contains_key(&user.username) {
            return Err(StoreError::DuplicateUsername {
                username: user.username,
            });
        }
        debug!(username = %user.username, "Inserted user");
        users.insert(user.username.clone(), user);
        Ok(())
    }

    async fn replace_roles(&self, username: &str, roles: RoleSet) -> StoreResult<()> {
        let mut users = self.users.write();
        let user = users.get_mut(username).ok_or_else(|| StoreError::UserNotFound {
            username: username.to_string(),
        })?;
        user.roles = roles;
        Ok(())
    }

    async fn replace_password_hash(
        &self,
        username: &str,
        password_hash: String,
    ) -> StoreResult<()> {
        let mut users = self.users.write();
        let user = users.get_mut(username).ok_or_else(|| StoreError::UserNotFound {
            username: username.to_string(),
        })?;
        user.password_hash = password_hash;
        Ok(())
    }
}

// =============================================================================
// InMemoryRoleCatalog
// =============================================================================

/// A [`RoleCatalog`] backed by a vector of rows in insertion order.
///
/// Creating an existing role adds a second row.
#[derive(Debug, Default)]
pub struct InMemoryRoleCatalog {
    rows: RwLock<Vec<Role>>,
}

impl InMemoryRoleCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog seeded with `roles`.
    pub fn with_roles<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        Self {
            rows: RwLock::new(roles.into_iter().map(Role::new).collect()),
        }
    }

    /// Returns the number of rows, duplicates included.
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    /// Returns `true` if the catalog has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

#[async_trait]
impl RoleCatalog for InMemoryRoleCatalog {
    async fn create(&self, role: Role) -> StoreResult<()> {
        self.rows.write().push(role);
        Ok(())
    }

    async fn delete(&self, role: &Role) -> StoreResult<bool> {
        let mut rows = self.rows.write();
        match rows.iter().position(|row| row == role) {
            Some(index) => {
                rows.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self, query: &RoleQuery) -> StoreResult<Vec<Role>> {
        let mut matched: Vec<Role> = self
            .rows
            .read()
            .iter()
            .filter(|role| query.matches(role))
            .cloned()
            .collect();

        if query.sorts_by_name() {
            // Stable, so duplicates keep insertion order.
            matched.sort();
        }

        Ok(matched
            .into_iter()
            .skip(query.skip())
            .take(query.limit())
            .collect())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Profile;

    fn user(name: &str) -> User {
        User::new(name, Profile::default(), "$argon2id$stub".to_string())
    }

    #[tokio::test]
    async fn test_directory_insert_and_find() {
        let directory = InMemoryUserDirectory::new();
        directory.insert(user("alice")).await.unwrap();

        let found = directory.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.username, "alice");
        assert!(directory.find_by_username("Alice").await.unwrap().is_none());
        assert_eq!(directory.len(), 1);
    }

    #[tokio::test]
    async fn test_directory_duplicate_insert() {
        let directory = InMemoryUserDirectory::new();
        directory.insert(user("alice")).await.unwrap();

        let err = directory.insert(user("alice")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUsername { .. }));
    }

    #[tokio::test]
    async fn test_directory_replace_roles() {
        let directory = InMemoryUserDirectory::new();
        directory.insert(user("alice")).await.unwrap();

        let roles: RoleSet = [Role::new("admin")].into_iter().collect();
        directory.replace_roles("alice", roles.clone()).await.unwrap();
        assert_eq!(
            directory.find_by_username("alice").await.unwrap().unwrap().roles,
            roles
        );

        let err = directory.replace_roles("bob", RoleSet::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::UserNotFound { .. }));
    }

    #[tokio::test]
    async fn test_directory_replace_password_hash() {
        let directory = InMemoryUserDirectory::new();
        directory.insert(user("alice")).await.unwrap();

        directory
            .replace_password_hash("alice", "$argon2id$new".to_string())
            .await
            .unwrap();
        let stored = directory.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "$argon2id$new");
    }

    #[tokio::test]
    async fn test_catalog_allows_duplicates() {
        let catalog = InMemoryRoleCatalog::new();
        catalog.create(Role::new("admin")).await.unwrap();
        catalog.create(Role::new("admin")).await.unwrap();

        let found = catalog.list(&RoleQuery::by_name(&Role::new("admin"))).await.unwrap();
        assert_eq!(found.len(), 2);
    }

    #[tokio::test]
    async fn test_catalog_delete_removes_one_row() {
        let catalog = InMemoryRoleCatalog::with_roles(["admin", "admin", "reader"]);

        assert!(catalog.delete(&Role::new("admin")).await.unwrap());
        assert_eq!(catalog.len(), 2);
        assert!(catalog.delete(&Role::new("admin")).await.unwrap());
        assert!(!catalog.delete(&Role::new("admin")).await.unwrap());
        assert_eq!(catalog.len(), 1);
    }

    #[tokio::test]
    async fn test_catalog_list_sort_and_page() {
        let catalog = InMemoryRoleCatalog::with_roles(["editor", "admin", "reader", "auditor"]);

        let all = catalog.list(&RoleQuery::new()).await.unwrap();
        assert_eq!(all[0].as_str(), "editor");

        let page = catalog
            .list(&RoleQuery::new().sort_by("name").page(2).page_size(2))
            .await
            .unwrap();
        assert_eq!(page, vec![Role::new("editor"), Role::new("reader")]);

        let beyond = catalog
            .list(&RoleQuery::new().page(5).page_size(2))
            .await
            .unwrap();
        assert!(beyond.is_empty());
    }
}
