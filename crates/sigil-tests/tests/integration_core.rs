// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Core Integration Tests
//!
//! Credential, token and authorization scenarios run against the account
//! service with in-memory stores.
//!
//! - `test_credentials_*`: registration and login
//! - `test_token_*`: issuance and verification
//! - `test_authz_*`: the two-step role check
//! - `test_membership_*`: role assignment
//! - `test_store_*`: backend failures

use std::sync::Arc;

use sigil_core::{
    AuthError, AuthorizationEngine, Identity, InMemoryRoleCatalog, PasswordHasher, Role,
    RoleCatalog, RoleQuery, UserDirectory,
};
use sigil_tests::prelude::*;

// =============================================================================
// Credentials
// =============================================================================

#[tokio::test]
async fn test_credentials_register_then_duplicate() {
    let harness = TestHarness::new();

    let identity = harness
        .service
        .register("alice", "secret1", profile_for("alice"))
        .await
        .unwrap();
    assert_eq!(identity.username, "alice");
    assert!(identity.roles.is_empty());

    let err = harness
        .service
        .register("alice", "other", profile_for("alice"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::DuplicateUsername { .. }));
}

#[tokio::test]
async fn test_credentials_login() {
    let harness = TestHarness::new();
    harness
        .service
        .register("alice", "secret1", profile_for("alice"))
        .await
        .unwrap();

    let err = harness.service.login("alice", "wrong").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));

    let issued = harness.service.login("alice", "secret1").await.unwrap();
    let decoded = harness.service.tokens().verify(&issued.token).unwrap();
    assert_eq!(decoded.username, "alice");
    assert_eq!(decoded.first_name, "Alice");
}

#[tokio::test]
async fn test_credentials_unknown_user() {
    let harness = TestHarness::new();
    let err = harness.service.login("ghost", "x").await.unwrap_err();
    assert!(matches!(err, AuthError::NotFound { .. }));
}

#[tokio::test]
async fn test_credentials_stored_hash_is_not_plaintext() {
    let harness = TestHarness::new();
    harness.register("alice").await;

    let stored = harness.users.peek("alice").await.unwrap();
    assert_ne!(stored.password_hash, TEST_PASSWORD);
    assert!(stored.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn test_credentials_legacy_hash_upgraded_on_login() {
    let harness = TestHarness::new();
    harness
        .users
        .insert(legacy_bcrypt_user("legacy", "hunter2"))
        .await
        .unwrap();

    harness.service.login("legacy", "hunter2").await.unwrap();

    let stored = harness.users.peek("legacy").await.unwrap();
    assert!(stored.password_hash.starts_with("$argon2id$"));
    assert_eq!(harness.users.replace_hash_count(), 1);

    // Second login finds a current hash and leaves it alone.
    harness.service.login("legacy", "hunter2").await.unwrap();
    assert_eq!(harness.users.replace_hash_count(), 1);
}

#[tokio::test]
async fn test_credentials_failed_upgrade_does_not_fail_login() {
    let harness = TestHarness::new();
    harness
        .users
        .insert(legacy_bcrypt_user("legacy", "hunter2"))
        .await
        .unwrap();
    harness.users.set_fail_writes(true);

    let issued = harness.service.login("legacy", "hunter2").await.unwrap();
    assert_eq!(issued.identity.username, "legacy");

    let stored = harness.users.peek("legacy").await.unwrap();
    assert!(stored.password_hash.starts_with("$2"));
}

#[tokio::test]
async fn test_credentials_hasher_properties() {
    let hasher = sigil_core::Argon2Hasher::for_testing();
    let hash = hasher.hash("p1").unwrap();

    assert!(hasher.verify("p1", &hash).unwrap());
    assert!(!hasher.verify("p2", &hash).unwrap());
    assert!(!hasher.needs_rehash(&hash));
}

// =============================================================================
// Tokens
// =============================================================================

#[tokio::test]
async fn test_token_carries_roles_at_login() {
    let harness = TestHarness::new();
    let token = harness.token_with_roles("alice", &["admin", "reader"]).await;

    let identity = test_codec().verify(&token).unwrap();
    assert!(identity.has_role("admin"));
    assert!(identity.has_role("reader"));
}

#[tokio::test]
async fn test_token_foreign_secret_rejected() {
    let token = foreign_codec()
        .issue(&Identity::new("mallory", profile_for("mallory")).with_roles(["admin"]))
        .unwrap();

    let err = test_codec().verify(&token).unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken { .. }));
}

#[tokio::test]
async fn test_token_roles_are_stale_until_next_login() {
    let harness = TestHarness::new();
    harness.register("alice").await;
    let before = harness.login("alice").await;

    harness
        .service
        .assign_role("alice", &Role::new("admin"))
        .await
        .unwrap();

    assert!(!test_codec().verify(&before).unwrap().has_role("admin"));
    let after = harness.login("alice").await;
    assert!(test_codec().verify(&after).unwrap().has_role("admin"));
}

// =============================================================================
// Authorization
// =============================================================================

#[tokio::test]
async fn test_authz_empty_requirement_permits() {
    let harness = TestHarness::new();
    let identity = Identity::new("alice", profile_for("alice"));

    assert!(harness.service.authorization().authorize(&identity, &[]));
    harness
        .service
        .authorization()
        .enforce(&identity, &[])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_authz_require_roles_ignores_duplicates() {
    let catalog = Arc::new(InMemoryRoleCatalog::with_roles(["admin", "admin"]));
    let engine = AuthorizationEngine::new(catalog.clone());

    engine.require_roles(&[Role::new("admin")]).await.unwrap();

    let err = engine
        .require_roles(&[Role::new("admin"), Role::new("auditor")])
        .await
        .unwrap_err();
    match err {
        AuthError::PolicyMisconfigured { missing } => {
            assert_eq!(missing, vec![Role::new("auditor")]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_authz_assign_then_enforce() {
    let harness = TestHarness::with_catalog(Vec::<String>::new());
    harness.register("alice").await;
    let admin = Role::new("admin");

    // The catalog lacks admin: assignment is refused and enforcement is a
    // policy fault.
    let err = harness.service.assign_role("alice", &admin).await.unwrap_err();
    assert!(matches!(err, AuthError::NotFound { .. }));

    let identity = Identity::new("alice", profile_for("alice")).with_roles(["admin"]);
    let err = harness
        .service
        .authorization()
        .enforce(&identity, &[admin.clone()])
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::PolicyMisconfigured { .. }));

    harness.service.create_role(admin.clone()).await.unwrap();
    harness.service.assign_role("alice", &admin).await.unwrap();

    let token = harness.login("alice").await;
    let identity = harness.service.tokens().verify(&token).unwrap();
    harness
        .service
        .authorization()
        .enforce(&identity, &[admin])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_authz_denial_names_missing_roles() {
    let harness = TestHarness::with_catalog(["admin", "auditor"]);
    let identity = Identity::new("alice", profile_for("alice")).with_roles(["admin"]);

    let err = harness
        .service
        .authorization()
        .enforce(&identity, &[Role::new("admin"), Role::new("auditor")])
        .await
        .unwrap_err();
    match err {
        AuthError::Unauthorized { username, missing } => {
            assert_eq!(username, "alice");
            assert_eq!(missing, vec![Role::new("auditor")]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// =============================================================================
// Membership
// =============================================================================

#[tokio::test]
async fn test_membership_assign_is_idempotent() {
    let harness = TestHarness::new();
    harness.register("alice").await;
    let admin = Role::new("admin");

    harness.service.assign_role("alice", &admin).await.unwrap();
    let roles = harness.service.assign_role("alice", &admin).await.unwrap();

    assert_eq!(roles.len(), 1);
    assert_eq!(harness.users.replace_roles_count(), 1);
}

#[tokio::test]
async fn test_membership_unassign_removes_exactly_one() {
    let harness = TestHarness::with_catalog(["admin", "reader"]);
    harness.register("alice").await;
    harness
        .service
        .assign_role("alice", &Role::new("admin"))
        .await
        .unwrap();
    harness
        .service
        .assign_role("alice", &Role::new("reader"))
        .await
        .unwrap();

    let roles = harness
        .service
        .unassign_role("alice", &Role::new("admin"))
        .await
        .unwrap();
    assert_eq!(roles.into_iter().collect::<Vec<_>>(), vec![Role::new("reader")]);

    // Absent role: no-op, no write.
    let writes = harness.users.replace_roles_count();
    harness
        .service
        .unassign_role("alice", &Role::new("ghost"))
        .await
        .unwrap();
    assert_eq!(harness.users.replace_roles_count(), writes);
}

#[tokio::test]
async fn test_membership_unknown_user() {
    let harness = TestHarness::new();
    let err = harness
        .service
        .assign_role("ghost", &Role::new("admin"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::NotFound { resource: "user", .. }));
}

#[tokio::test]
async fn test_membership_role_deletion_keeps_memberships() {
    let harness = TestHarness::new();
    harness.register("alice").await;
    harness
        .service
        .assign_role("alice", &Role::new("admin"))
        .await
        .unwrap();

    harness.service.delete_role(&Role::new("admin")).await.unwrap();

    let user = harness.service.find_user("alice").await.unwrap().unwrap();
    assert!(user.roles.contains(&Role::new("admin")));
    assert!(harness.roles.is_empty());
}

// =============================================================================
// Store Failures
// =============================================================================

#[tokio::test]
async fn test_store_read_failure_is_upstream() {
    let harness = TestHarness::new();
    harness.users.set_fail_reads(true);

    let err = harness.service.login("alice", "secret1").await.unwrap_err();
    assert!(matches!(err, AuthError::Upstream { .. }));
}

#[tokio::test]
async fn test_store_catalog_failure_during_enforce() {
    let harness = TestHarness::new();
    harness.roles.set_fail_reads(true);
    let identity = Identity::new("alice", profile_for("alice")).with_roles(["admin"]);

    let err = harness
        .service
        .authorization()
        .enforce(&identity, &[Role::new("admin")])
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Upstream { .. }));
}

#[tokio::test]
async fn test_store_list_roles_paging() {
    let harness = TestHarness::with_catalog(["delta", "alpha", "charlie", "bravo"]);

    let first = harness
        .service
        .list_roles(&RoleQuery::new().sort_by("name").page_size(2))
        .await
        .unwrap();
    assert_eq!(first, vec![Role::new("alpha"), Role::new("bravo")]);

    let second = harness
        .service
        .list_roles(&RoleQuery::new().sort_by("name").page_size(2).page(2))
        .await
        .unwrap();
    assert_eq!(second, vec![Role::new("charlie"), Role::new("delta")]);

    assert!(
        harness
            .roles
            .list(&RoleQuery::new().filter("color", "red"))
            .await
            .unwrap()
            .is_empty()
    );
}
