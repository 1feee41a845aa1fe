// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # sigil-core
//!
//! Credential verification, token lifecycle and role-based authorization
//! for Sigil.
//!
//! - **Password**: Argon2id hashing with legacy bcrypt verification
//! - **Token**: HMAC-signed identity tokens and bearer framing
//! - **Store**: `UserDirectory` and `RoleCatalog` capabilities with
//!   in-memory implementations
//! - **Authz**: the two-step role requirement check
//! - **Service**: registration, login and role membership
//!
//! This crate has no HTTP, configuration or storage-driver dependencies.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sigil_core::prelude::*;
//!
//! let service = AccountService::builder()
//!     .tokens(TokenCodec::new(TokenConfig::new(secret))?)
//!     .build()?;
//!
//! service.register("alice", "secret1", Profile::default()).await?;
//! let issued = service.login("alice", "secret1").await?;
//!
//! let identity = service.tokens().verify(&issued.token)?;
//! service.authorization().enforce(&identity, &[Role::new("admin")]).await?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod authz;
pub mod error;
pub mod password;
pub mod service;
pub mod store;
pub mod token;
pub mod types;

pub use authz::AuthorizationEngine;
pub use error::{AuthError, AuthResult, PasswordError, StoreError, StoreResult};
pub use password::{Argon2Hasher, HashScheme, PasswordHasher};
pub use service::{AccountService, AccountServiceBuilder, IssuedToken};
pub use store::{
    InMemoryRoleCatalog, InMemoryUserDirectory, RoleCatalog, RoleQuery, UserDirectory,
};
pub use token::{SigningAlgorithm, TokenCodec, TokenConfig, extract_bearer};
pub use types::{Identity, Profile, Role, RoleSet, User};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commonly used types.
pub mod prelude {
    pub use crate::authz::AuthorizationEngine;
    pub use crate::error::{AuthError, AuthResult};
    pub use crate::password::{Argon2Hasher, PasswordHasher};
    pub use crate::service::{AccountService, IssuedToken};
    pub use crate::store::{RoleCatalog, RoleQuery, UserDirectory};
    pub use crate::token::{TokenCodec, TokenConfig};
    pub use crate::types::{Identity, Profile, Role, RoleSet};
}
