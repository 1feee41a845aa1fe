// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Pre-built secrets, profiles and configuration documents.

use sigil_core::{Profile, TokenCodec, TokenConfig, User};

/// Signing secret shared by the suites.
pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// A different secret, for foreign-token scenarios.
pub const FOREIGN_SECRET: &str = "some-other-deployment-secret-0123456789";

/// Password used for fixture accounts.
pub const TEST_PASSWORD: &str = "secret1";

/// Returns a codec signing with [`TEST_SECRET`].
pub fn test_codec() -> TokenCodec {
    TokenCodec::new(TokenConfig::new(TEST_SECRET)).expect("test secret is valid")
}

/// Returns a codec signing with [`FOREIGN_SECRET`].
pub fn foreign_codec() -> TokenCodec {
    TokenCodec::new(TokenConfig::new(FOREIGN_SECRET)).expect("foreign secret is valid")
}

/// Returns a profile for `username`.
pub fn profile_for(username: &str) -> Profile {
    let mut chars = username.chars();
    let first = chars
        .next()
        .map(|c| c.to_uppercase().chain(chars).collect::<String>())
        .unwrap_or_default();
    Profile::new(first, "Tester")
}

/// Builds a user whose password is stored as a legacy bcrypt hash.
pub fn legacy_bcrypt_user(username: &str, password: &str) -> User {
    let hash = bcrypt::hash(password, 4).expect("bcrypt hashing succeeds");
    User::new(username, profile_for(username), hash)
}

// =============================================================================
// Configuration Documents
// =============================================================================

/// A complete YAML configuration.
pub const SAMPLE_YAML: &str = r#"
server:
  host: 127.0.0.1
  port: 8088
  request_timeout: 5s
  shutdown_timeout: 2s
token:
  secret: "yaml-secret-0123456789abcdef0123456789"
  algorithm: HS384
access:
  admin_role: superuser
  open_registration: true
bootstrap:
  roles: [superuser, reader]
  admin:
    username: root
    password: change-me
    first_name: Root
logging:
  level: debug
  format: json
"#;

/// A minimal TOML configuration.
pub const SAMPLE_TOML: &str = r#"
[server]
port = 9090

[token]
secret = "toml-secret-0123456789abcdef0123456789"
"#;

/// A minimal JSON configuration.
pub const SAMPLE_JSON: &str = r#"
{
  "server": { "port": 7070 },
  "token": { "secret": "json-secret-0123456789abcdef0123456789", "algorithm": "HS512" }
}
"#;
