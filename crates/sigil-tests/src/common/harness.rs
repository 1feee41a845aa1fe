// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Harness
//!
//! Wires an [`AccountService`] over the failure-injecting stores and exposes
//! its router together with helpers for issuing requests.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use sigil_api::{ApiConfig, ApiServer};
use sigil_core::{AccountService, Argon2Hasher, Role};

use super::fixtures::{TEST_PASSWORD, profile_for, test_codec};
use super::mocks::{FailingRoleCatalog, FailingUserDirectory};

/// Username of the administrator created by [`TestHarness::admin_token`].
pub const ADMIN_USERNAME: &str = "root";

// =============================================================================
// TestHarness
// =============================================================================

/// A service, its stores and an API configuration.
pub struct TestHarness {
    /// The wired service.
    pub service: AccountService,
    /// The directory behind the service.
    pub users: Arc<FailingUserDirectory>,
    /// The catalog behind the service.
    pub roles: Arc<FailingRoleCatalog>,
    /// API configuration used by [`router`](Self::router).
    pub config: ApiConfig,
}

impl TestHarness {
    /// Creates a harness whose catalog holds `admin`.
    pub fn new() -> Self {
        Self::with_catalog(["admin"])
    }

    /// Creates a harness whose catalog holds `roles`.
    pub fn with_catalog<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        super::init_test_logging();

        let users = Arc::new(FailingUserDirectory::new());
        let roles = Arc::new(FailingRoleCatalog::with_roles(roles));
        let service = AccountService::builder()
            .users(users.clone())
            .roles(roles.clone())
            .hasher(Arc::new(Argon2Hasher::for_testing()))
            .tokens(test_codec())
            .build()
            .expect("harness service builds");

        Self {
            service,
            users,
            roles,
            config: ApiConfig::default(),
        }
    }

    /// Serves `/register` without the admin gate.
    pub fn open_registration(mut self) -> Self {
        self.config = self.config.with_open_registration(true);
        self
    }

    /// Returns the full router.
    pub fn router(&self) -> Router {
        ApiServer::builder()
            .config(self.config.clone())
            .service(self.service.clone())
            .build()
            .expect("harness server builds")
            .router()
    }

    /// Registers `username` with [`TEST_PASSWORD`].
    pub async fn register(&self, username: &str) {
        self.service
            .register(username, TEST_PASSWORD, profile_for(username))
            .await
            .expect("fixture registration succeeds");
    }

    /// Registers `username`, grants `roles` and returns a fresh token.
    ///
    /// Roles missing from the catalog are granted by writing the directory
    /// directly.
    pub async fn token_with_roles(&self, username: &str, roles: &[&str]) -> String {
        self.register(username).await;
        if !roles.is_empty() {
            use sigil_core::UserDirectory;
            let set = roles.iter().copied().map(Role::new).collect();
            self.users
                .replace_roles(username, set)
                .await
                .expect("fixture role grant succeeds");
        }
        self.login(username).await
    }

    /// Logs `username` in with [`TEST_PASSWORD`].
    pub async fn login(&self, username: &str) -> String {
        self.service
            .login(username, TEST_PASSWORD)
            .await
            .expect("fixture login succeeds")
            .token
    }

    /// Creates [`ADMIN_USERNAME`] holding the admin role and returns its token.
    pub async fn admin_token(&self) -> String {
        let role = self.config.admin_role.as_str().to_string();
        self.token_with_roles(ADMIN_USERNAME, &[role.as_str()]).await
    }

    /// Sends `request` through a fresh router and decodes the response.
    ///
    /// Bodies that are not JSON come back as a JSON string.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body is readable");

        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, body)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Request Helpers
// =============================================================================

/// Builds a request with an optional bearer token and JSON body.
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    builder.body(body).expect("request is well formed")
}

/// Returns the `error.code` of an error body.
pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}
