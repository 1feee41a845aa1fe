// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Per-request authentication context.

use std::net::IpAddr;

use uuid::Uuid;

use sigil_core::Identity;

/// Attached to every request by [`AuthLayer`](crate::middleware::AuthLayer).
///
/// Requests to public paths carry an anonymous context; all others carry the
/// identity decoded from their bearer token.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Decoded identity, absent on public paths.
    pub identity: Option<Identity>,
    /// Request ID for tracing.
    pub request_id: Uuid,
    /// Client IP address.
    pub client_ip: Option<IpAddr>,
}

impl AuthContext {
    /// Creates an anonymous context.
    pub fn anonymous() -> Self {
        Self {
            identity: None,
            request_id: Uuid::now_v7(),
            client_ip: None,
        }
    }

    /// Creates a context for an authenticated identity.
    pub fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            ..Self::anonymous()
        }
    }

    /// Sets the request ID.
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    /// Sets the client IP address.
    pub fn with_client_ip(mut self, ip: Option<IpAddr>) -> Self {
        self.client_ip = ip;
        self
    }

    /// Returns `true` if no identity is attached.
    pub fn is_anonymous(&self) -> bool {
        self.identity.is_none()
    }

    /// Returns the username, or `anonymous`.
    pub fn username(&self) -> &str {
        self.identity
            .as_ref()
            .map(|identity| identity.username.as_str())
            .unwrap_or("anonymous")
    }
}
