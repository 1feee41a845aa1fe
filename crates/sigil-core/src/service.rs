// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Registration, login and role-membership orchestration.
//!
//! # Concurrency
//!
//! Every operation here is a sequence of independent store calls with no
//! lock or transaction around them:
//!
//! - `register` looks the username up, then inserts. Two concurrent
//!   registrations of one name both pass the lookup; the directory's
//!   duplicate check decides which insert wins.
//! - `assign_role` and `unassign_role` read the user's roles, modify them,
//!   and write the whole set back. Concurrent changes to the same user race
//!   and the last write wins.
//!
//! Role-membership operations are not gated here. Callers must enforce an
//! admin-class requirement through the [`AuthorizationEngine`] first.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::authz::AuthorizationEngine;
use crate::error::{AuthError, AuthResult};
use crate::password::{Argon2Hasher, PasswordHasher};
use crate::store::{
    InMemoryRoleCatalog, InMemoryUserDirectory, RoleCatalog, RoleQuery, UserDirectory,
};
use crate::token::TokenCodec;
use crate::types::{Identity, Profile, Role, RoleSet, User};

// =============================================================================
// IssuedToken
// =============================================================================

/// A successful login.
#[derive(Clone)]
pub struct IssuedToken {
    /// Signed bearer token.
    pub token: String,
    /// The identity the token carries.
    pub identity: Identity,
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// AccountService
// =============================================================================

/// Credential and membership operations over injected stores.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserDirectory>,
    roles: Arc<dyn RoleCatalog>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: TokenCodec,
    engine: AuthorizationEngine,
}

impl AccountService {
    /// Returns a builder.
    pub fn builder() -> AccountServiceBuilder {
        AccountServiceBuilder::default()
    }

    /// Returns the token codec.
    pub fn tokens(&self) -> &TokenCodec {
        &self.tokens
    }

    /// Returns the authorization engine sharing this service's catalog.
    pub fn authorization(&self) -> &AuthorizationEngine {
        &self.engine
    }

    // =========================================================================
    // Credentials
    // =========================================================================

    /// Registers a user with an empty role set.
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty username or password
    /// - `DuplicateUsername` if the username is taken
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        profile: Profile,
    ) -> AuthResult<Identity> {
        validate_username(username)?;
        if password.is_empty() {
            return Err(AuthError::validation("password", "must not be empty"));
        }

        if self.users.find_by_username(username).await?.is_some() {
            warn!(username = %username, "Registration rejected: username taken");
            return Err(AuthError::duplicate_username(username));
        }

        let hash = self.hash_password(password.to_string()).await?;
        let user = User::new(username, profile, hash);
        let identity = user.identity();

        self.users.insert(user).await?;

        info!(username = %username, "User registered");
        Ok(identity)
    }

    /// Verifies credentials and issues a token carrying the user's current
    /// roles.
    ///
    /// A legacy password hash is replaced with a fresh one on success.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the user does not exist
    /// - `InvalidCredentials` if the password does not match
    pub async fn login(&self, username: &str, password: &str) -> AuthResult<IssuedToken> {
        let Some(user) = self.users.find_by_username(username).await? else {
            warn!(username = %username, "Login failed: unknown user");
            return Err(AuthError::user_not_found(username));
        };

        let matches = self
            .verify_password(password.to_string(), user.password_hash.clone())
            .await
            .inspect_err(|e| error!(username = %username, error = %e, "Password verification failed"))?;

        if !matches {
            warn!(username = %username, "Login failed: invalid credentials");
            return Err(AuthError::InvalidCredentials);
        }

        if self.hasher.needs_rehash(&user.password_hash) {
            self.upgrade_hash(username, password).await;
        }

        let identity = user.identity();
        let token = self.tokens.issue(&identity)?;

        info!(username = %username, roles = identity.roles.len(), "User logged in");
        Ok(IssuedToken { token, identity })
    }

    async fn upgrade_hash(&self, username: &str, password: &str) {
        let result = match self.hash_password(password.to_string()).await {
            Ok(hash) => self
                .users
                .replace_password_hash(username, hash)
                .await
                .map_err(AuthError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => info!(username = %username, "Upgraded legacy password hash"),
            Err(e) => warn!(username = %username, error = %e, "Failed to upgrade password hash"),
        }
    }

    async fn hash_password(&self, password: String) -> AuthResult<String> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::upstream(format!("hashing task failed: {}", e)))?
            .map_err(AuthError::from)
    }

    async fn verify_password(&self, password: String, hash: String) -> AuthResult<bool> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::upstream(format!("verification task failed: {}", e)))?
            .map_err(AuthError::from)
    }

    // =========================================================================
    // Role membership
    // =========================================================================

    /// Adds `role` to a user's roles. Returns the resulting set.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the role is not registered or the user does not exist
    pub async fn assign_role(&self, username: &str, role: &Role) -> AuthResult<RoleSet> {
        if self.roles.list(&RoleQuery::by_name(role)).await?.is_empty() {
            return Err(AuthError::role_not_found(role.as_str()));
        }

        let mut roles = self.current_roles(username).await?;
        if roles.insert(role.clone()) {
            self.users.replace_roles(username, roles.clone()).await?;
            info!(username = %username, role = %role, "Role assigned");
        } else {
            debug!(username = %username, role = %role, "Role already assigned");
        }
        Ok(roles)
    }

    /// Removes `role` from a user's roles. Returns the resulting set.
    ///
    /// Removing a role the user does not hold is a no-op. The role need not
    /// be registered.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the user does not exist
    pub async fn unassign_role(&self, username: &str, role: &Role) -> AuthResult<RoleSet> {
        let mut roles = self.current_roles(username).await?;
        if roles.remove(role) {
            self.users.replace_roles(username, roles.clone()).await?;
            info!(username = %username, role = %role, "Role unassigned");
        } else {
            debug!(username = %username, role = %role, "Role was not assigned");
        }
        Ok(roles)
    }

    async fn current_roles(&self, username: &str) -> AuthResult<RoleSet> {
        self.users
            .find_by_username(username)
            .await?
            .map(|user| user.roles)
            .ok_or_else(|| AuthError::user_not_found(username))
    }

    // =========================================================================
    // Role catalog
    // =========================================================================

    /// Registers a role. An existing name gains a second row.
    pub async fn create_role(&self, role: Role) -> AuthResult<()> {
        let name = role.to_string();
        self.roles.create(role).await?;
        info!(role = %name, "Role created");
        Ok(())
    }

    /// Removes one catalog row for `role`.
    ///
    /// Users keep the role in their memberships.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no row exists
    pub async fn delete_role(&self, role: &Role) -> AuthResult<()> {
        if !self.roles.delete(role).await? {
            return Err(AuthError::role_not_found(role.as_str()));
        }
        info!(role = %role, "Role deleted");
        Ok(())
    }

    /// Lists catalog rows.
    pub async fn list_roles(&self, query: &RoleQuery) -> AuthResult<Vec<Role>> {
        Ok(self.roles.list(query).await?)
    }

    /// Returns the user record, if any.
    pub async fn find_user(&self, username: &str) -> AuthResult<Option<User>> {
        Ok(self.users.find_by_username(username).await?)
    }

    /// Checks both stores.
    pub async fn health_check(&self) -> AuthResult<()> {
        self.users.health_check().await?;
        self.roles.health_check().await?;
        Ok(())
    }
}

impl fmt::Debug for AccountService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountService")
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

fn validate_username(username: &str) -> AuthResult<()> {
    if username.trim().is_empty() {
        return Err(AuthError::validation("username", "must not be empty"));
    }
    Ok(())
}

// =============================================================================
// AccountServiceBuilder
// =============================================================================

/// Builder for [`AccountService`].
///
/// Stores default to the in-memory implementations and the hasher to
/// [`Argon2Hasher::new`]. A token codec is required.
#[derive(Default)]
pub struct AccountServiceBuilder {
    users: Option<Arc<dyn UserDirectory>>,
    roles: Option<Arc<dyn RoleCatalog>>,
    hasher: Option<Arc<dyn PasswordHasher>>,
    tokens: Option<TokenCodec>,
}

impl AccountServiceBuilder {
    /// Sets the user directory.
    pub fn users(mut self, users: Arc<dyn UserDirectory>) -> Self {
        self.users = Some(users);
        self
    }

    /// Sets the role catalog.
    pub fn roles(mut self, roles: Arc<dyn RoleCatalog>) -> Self {
        self.roles = Some(roles);
        self
    }

    /// Sets the password hasher.
    pub fn hasher(mut self, hasher: Arc<dyn PasswordHasher>) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// Sets the token codec.
    pub fn tokens(mut self, tokens: TokenCodec) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Builds the service.
    pub fn build(self) -> AuthResult<AccountService> {
        let tokens = self
            .tokens
            .ok_or_else(|| AuthError::validation("tokens", "token codec is required"))?;
        let users = self
            .users
            .unwrap_or_else(|| Arc::new(InMemoryUserDirectory::new()));
        let roles = self
            .roles
            .unwrap_or_else(|| Arc::new(InMemoryRoleCatalog::new()));
        let hasher = self
            .hasher
            .unwrap_or_else(|| Arc::new(Argon2Hasher::new()));

        Ok(AccountService {
            engine: AuthorizationEngine::new(Arc::clone(&roles)),
            users,
            roles,
            hasher,
            tokens,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenConfig;

    fn service_with(users: Arc<InMemoryUserDirectory>, roles: &[&str]) -> AccountService {
        AccountService::builder()
            .users(users)
            .roles(Arc::new(InMemoryRoleCatalog::with_roles(roles.iter().copied())))
            .hasher(Arc::new(Argon2Hasher::for_testing()))
            .tokens(TokenCodec::new(TokenConfig::new("service-test-secret-0123456789abcdef")).unwrap())
            .build()
            .unwrap()
    }

    fn service(roles: &[&str]) -> AccountService {
        service_with(Arc::new(InMemoryUserDirectory::new()), roles)
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let service = service(&[]);
        let identity = service
            .register("alice", "secret1", Profile::new("Alice", "Liddell"))
            .await
            .unwrap();
        assert!(identity.roles.is_empty());

        let issued = service.login("alice", "secret1").await.unwrap();
        let decoded = service.tokens().verify(&issued.token).unwrap();
        assert_eq!(decoded.username, "alice");
        assert_eq!(decoded.first_name, "Alice");
        assert!(!issued.token.contains("secret1"));
    }

    #[tokio::test]
    async fn test_register_duplicate() {
        let service = service(&[]);
        service.register("alice", "secret1", Profile::default()).await.unwrap();

        let err = service
            .register("alice", "other", Profile::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUsername { .. }));
    }

    #[tokio::test]
    async fn test_register_validates_input() {
        let service = service(&[]);
        for (username, password) in [("", "pw"), ("   ", "pw"), ("alice", "")] {
            let err = service
                .register(username, password, Profile::default())
                .await
                .unwrap_err();
            assert!(matches!(err, AuthError::Validation { .. }));
        }
    }

    #[tokio::test]
    async fn test_login_failures() {
        let service = service(&[]);
        service.register("alice", "secret1", Profile::default()).await.unwrap();

        let err = service.login("alice", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let err = service.login("bob", "secret1").await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound { resource: "user", .. }));
    }

    #[tokio::test]
    async fn test_login_upgrades_bcrypt_hash() {
        let users = Arc::new(InMemoryUserDirectory::new());
        let legacy = bcrypt::hash("secret1", 4).unwrap();
        users
            .insert(User::new("legacy", Profile::default(), legacy))
            .await
            .unwrap();

        let service = service_with(Arc::clone(&users), &[]);
        service.login("legacy", "secret1").await.unwrap();

        let stored = users.find_by_username("legacy").await.unwrap().unwrap();
        assert!(stored.password_hash.starts_with("$argon2id$"));
        service.login("legacy", "secret1").await.unwrap();
    }

    #[tokio::test]
    async fn test_assign_and_unassign() {
        let service = service(&["admin", "reader"]);
        service.register("alice", "secret1", Profile::default()).await.unwrap();

        let roles = service.assign_role("alice", &Role::new("admin")).await.unwrap();
        assert!(roles.contains("admin"));

        let roles = service.assign_role("alice", &Role::new("admin")).await.unwrap();
        assert_eq!(roles.len(), 1);

        service.assign_role("alice", &Role::new("reader")).await.unwrap();
        let roles = service.unassign_role("alice", &Role::new("admin")).await.unwrap();
        assert_eq!(roles.into_iter().collect::<Vec<_>>(), vec![Role::new("reader")]);

        let roles = service.unassign_role("alice", &Role::new("ghost")).await.unwrap();
        assert_eq!(roles.len(), 1);
    }

    #[tokio::test]
    async fn test_assign_requires_registered_role_and_user() {
        let service = service(&["admin"]);
        service.register("alice", "secret1", Profile::default()).await.unwrap();

        let err = service.assign_role("alice", &Role::new("ghost")).await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound { resource: "role", .. }));

        let err = service.assign_role("bob", &Role::new("admin")).await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound { resource: "user", .. }));
    }

    #[tokio::test]
    async fn test_token_reflects_roles_at_login() {
        let service = service(&["admin"]);
        service.register("alice", "secret1", Profile::default()).await.unwrap();
        let before = service.login("alice", "secret1").await.unwrap();

        service.assign_role("alice", &Role::new("admin")).await.unwrap();
        let after = service.login("alice", "secret1").await.unwrap();

        assert!(!before.identity.has_role("admin"));
        assert!(service.tokens().verify(&after.token).unwrap().has_role("admin"));
    }

    #[tokio::test]
    async fn test_delete_role() {
        let service = service(&["admin"]);
        service.delete_role(&Role::new("admin")).await.unwrap();

        let err = service.delete_role(&Role::new("admin")).await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound { resource: "role", .. }));
        assert!(service.list_roles(&RoleQuery::new()).await.unwrap().is_empty());
    }

    #[test]
    fn test_builder_requires_tokens() {
        let result = AccountService::builder().build();
        assert!(matches!(result, Err(AuthError::Validation { .. })));
    }
}
