// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for sigil-core.
//!
//! # Error Hierarchy
//!
//! ```text
//! AuthError       - every failure a caller of the core can observe
//! ├── StoreError  - reported by UserDirectory / RoleCatalog backends
//! └── PasswordError - reported by a PasswordHasher
//! ```
//!
//! Store and hasher errors are folded into [`AuthError`] before they cross the
//! core boundary; library errors (`jsonwebtoken`, `argon2`, `bcrypt`) never do.

use thiserror::Error;

use crate::types::Role;

/// Result type alias for core operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Result type alias for directory and catalog operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// AuthError
// =============================================================================

/// Failure kinds surfaced by the core.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The password did not match the stored hash.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// A user or role does not exist.
    #[error("{resource} not found: {name}")]
    NotFound {
        /// Kind of resource (`user` or `role`).
        resource: &'static str,
        /// Name that was looked up.
        name: String,
    },

    /// Registration collided with an existing username.
    #[error("Username already exists: {username}")]
    DuplicateUsername {
        /// The colliding username.
        username: String,
    },

    /// The token failed signature, structure or algorithm checks.
    #[error("Invalid token: {reason}")]
    InvalidToken {
        /// Short, non-sensitive reason.
        reason: String,
    },

    /// No bearer credential was presented.
    #[error("Missing bearer credential")]
    Unauthenticated,

    /// A required role has never been registered in the catalog.
    #[error("Required roles are not registered: {}", join_roles(.missing))]
    PolicyMisconfigured {
        /// Required roles absent from the catalog.
        missing: Vec<Role>,
    },

    /// The identity does not hold every required role.
    #[error("User '{username}' lacks required roles: {}", join_roles(.missing))]
    Unauthorized {
        /// The denied username.
        username: String,
        /// Required roles the identity does not hold.
        missing: Vec<Role>,
    },

    /// Caller supplied malformed input.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Offending field.
        field: String,
        /// Error message.
        message: String,
    },

    /// Persistence or hashing failure not otherwise classified.
    #[error("Upstream failure: {message}")]
    Upstream {
        /// Error message (for logging).
        message: String,
    },
}

impl AuthError {
    /// Creates a not found error for a user.
    pub fn user_not_found(username: impl Into<String>) -> Self {
        Self::NotFound {
            resource: "user",
            name: username.into(),
        }
    }

    /// Creates a not found error for a role.
    pub fn role_not_found(role: impl Into<String>) -> Self {
        Self::NotFound {
            resource: "role",
            name: role.into(),
        }
    }

    /// Creates a duplicate username error.
    pub fn duplicate_username(username: impl Into<String>) -> Self {
        Self::DuplicateUsername {
            username: username.into(),
        }
    }

    /// Creates an invalid token error.
    pub fn invalid_token(reason: impl Into<String>) -> Self {
        Self::InvalidToken {
            reason: reason.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an upstream error.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Returns a stable error code for programmatic handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::NotFound { .. } => "NOT_FOUND",
            AuthError::DuplicateUsername { .. } => "DUPLICATE_USERNAME",
            AuthError::InvalidToken { .. } => "INVALID_TOKEN",
            AuthError::Unauthenticated => "UNAUTHENTICATED",
            AuthError::PolicyMisconfigured { .. } => "POLICY_MISCONFIGURED",
            AuthError::Unauthorized { .. } => "UNAUTHORIZED",
            AuthError::Validation { .. } => "VALIDATION_ERROR",
            AuthError::Upstream { .. } => "UPSTREAM_ERROR",
        }
    }

    /// Returns `true` if the caller caused the failure.
    ///
    /// `PolicyMisconfigured` and `Upstream` are deployment or backend faults.
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            AuthError::PolicyMisconfigured { .. } | AuthError::Upstream { .. }
        )
    }
}

fn join_roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// StoreError
// =============================================================================

/// Errors reported by directory and catalog implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// No user with this username.
    #[error("User not found: {username}")]
    UserNotFound {
        /// The missing username.
        username: String,
    },

    /// A user with this username already exists.
    #[error("Username already exists: {username}")]
    DuplicateUsername {
        /// The colliding username.
        username: String,
    },

    /// The backing store could not serve the request.
    #[error("Store unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },
}

impl StoreError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UserNotFound { username } => AuthError::user_not_found(username),
            StoreError::DuplicateUsername { username } => AuthError::duplicate_username(username),
            StoreError::Unavailable { message } => AuthError::upstream(message),
        }
    }
}

// =============================================================================
// PasswordError
// =============================================================================

/// Errors reported by a password hasher.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// The stored hash is not in any supported scheme.
    #[error("Unrecognized password hash format")]
    UnsupportedFormat,

    /// Hash computation failed.
    #[error("Password hashing failed: {message}")]
    HashFailed {
        /// Error message.
        message: String,
    },
}

impl PasswordError {
    /// Creates a hash failure.
    pub fn hash_failed(message: impl Into<String>) -> Self {
        Self::HashFailed {
            message: message.into(),
        }
    }
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        AuthError::upstream(err.to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AuthError::InvalidCredentials.error_code(), "INVALID_CREDENTIALS");
        assert_eq!(AuthError::user_not_found("x").error_code(), "NOT_FOUND");
        assert_eq!(AuthError::Unauthenticated.error_code(), "UNAUTHENTICATED");
        assert_eq!(
            AuthError::PolicyMisconfigured { missing: vec![] }.error_code(),
            "POLICY_MISCONFIGURED"
        );
    }

    #[test]
    fn test_policy_and_authorization_stay_distinct() {
        let misconfigured = AuthError::PolicyMisconfigured {
            missing: vec![Role::new("admin")],
        };
        let unauthorized = AuthError::Unauthorized {
            username: "alice".to_string(),
            missing: vec![Role::new("admin")],
        };

        assert!(!misconfigured.is_client_error());
        assert!(unauthorized.is_client_error());
        assert_ne!(misconfigured.error_code(), unauthorized.error_code());
        assert_eq!(
            misconfigured.to_string(),
            "Required roles are not registered: admin"
        );
    }

    #[test]
    fn test_store_error_conversion() {
        let err: AuthError = StoreError::DuplicateUsername {
            username: "alice".to_string(),
        }
        .into();
        assert!(matches!(err, AuthError::DuplicateUsername { ref username } if username == "alice"));

        let err: AuthError = StoreError::unavailable("connection refused").into();
        assert!(matches!(err, AuthError::Upstream { .. }));

        let err: AuthError = StoreError::UserNotFound {
            username: "bob".to_string(),
        }
        .into();
        assert!(matches!(err, AuthError::NotFound { resource: "user", .. }));
    }

    #[test]
    fn test_password_error_is_upstream() {
        let err: AuthError = PasswordError::UnsupportedFormat.into();
        assert_eq!(err.error_code(), "UPSTREAM_ERROR");
    }
}
