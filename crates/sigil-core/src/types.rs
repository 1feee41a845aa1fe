// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Domain types: roles, user records and the identity carried in tokens.

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AuthError, AuthResult};

// =============================================================================
// Role
// =============================================================================

/// A named role.
///
/// Serialized as a bare string. Deserialization also accepts the object form
/// `{"name": "admin"}` used by older token issuers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Creates a role without validating the name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Parses a role name supplied by a caller.
    ///
    /// Names are case-sensitive and kept verbatim; only empty or
    /// whitespace-only names are rejected.
    pub fn parse(name: &str) -> AuthResult<Self> {
        if name.trim().is_empty() {
            return Err(AuthError::validation("role", "role name must not be empty"));
        }
        Ok(Self(name.to_string()))
    }

    /// Returns the role name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Role {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Role {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RoleRepr {
            Name(String),
            Object { name: String },
        }

        match RoleRepr::deserialize(deserializer)? {
            RoleRepr::Name(name) | RoleRepr::Object { name } => Ok(Role(name)),
        }
    }
}

/// A user's role memberships. Ordered, no duplicates.
pub type RoleSet = BTreeSet<Role>;

// =============================================================================
// Profile
// =============================================================================

/// Display names supplied at registration. Not used for any decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl Profile {
    /// Creates a profile.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// A stored user record.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Primary key, case-sensitive.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Password hash in PHC or bcrypt format.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Role memberships.
    pub roles: RoleSet,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a freshly registered user with no roles.
    pub fn new(username: impl Into<String>, profile: Profile, password_hash: String) -> Self {
        Self {
            username: username.into(),
            first_name: profile.first_name,
            last_name: profile.last_name,
            password_hash,
            roles: RoleSet::new(),
            created_at: Utc::now(),
        }
    }

    /// Returns the identity embedded in this user's tokens.
    pub fn identity(&self) -> Identity {
        Identity {
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            roles: self.roles.clone(),
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("roles", &self.roles)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Identity
// =============================================================================

/// The claim set carried in a token.
///
/// Wire names are `username`, `firstname`, `lastname` and `roles`; no
/// registered claims (`exp`, `nbf`, `iss`) are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Username.
    pub username: String,
    /// Given name.
    #[serde(rename = "firstname", default)]
    pub first_name: String,
    /// Family name.
    #[serde(rename = "lastname", default)]
    pub last_name: String,
    /// Role memberships at issue time.
    #[serde(default)]
    pub roles: RoleSet,
}

impl Identity {
    /// Creates an identity with no roles.
    pub fn new(username: impl Into<String>, profile: Profile) -> Self {
        Self {
            username: username.into(),
            first_name: profile.first_name,
            last_name: profile.last_name,
            roles: RoleSet::new(),
        }
    }

    /// Adds roles.
    pub fn with_roles<I, R>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        self.roles.extend(roles.into_iter().map(Role::new));
        self
    }

    /// Returns `true` if the identity holds the named role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Returns the required roles this identity does not hold.
    pub fn missing_roles(&self, required: &[Role]) -> Vec<Role> {
        required
            .iter()
            .filter(|role| !self.roles.contains(*role))
            .cloned()
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================
