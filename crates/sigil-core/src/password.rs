// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Password hashing.
//!
//! New hashes are Argon2id in PHC string format with a fixed work factor:
//!
//! | Parameter   | Value  |
//! |-------------|--------|
//! | memory      | 19 MiB |
//! | iterations  | 2      |
//! | parallelism | 1      |
//!
//! bcrypt hashes (`$2a$`, `$2b$`, `$2y$`) written by the previous store are
//! still verified. [`PasswordHasher::needs_rehash`] reports them so a caller
//! can upgrade the stored hash after a successful login.
//!
//! Hashing is CPU-bound. Async callers should run it on the blocking pool.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString, rand_core::OsRng,
    },
};

use crate::error::PasswordError;

// =============================================================================
// PasswordHasher
// =============================================================================

/// One-way hashing and verification of credentials.
pub trait PasswordHasher: Send + Sync {
    /// Produces a salted hash of `plaintext`.
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError>;

    /// Checks `plaintext` against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch, including corrupted hashes of a known
    /// scheme and empty hashes. Errors only when the scheme is unrecognized.
    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, PasswordError>;

    /// Returns `true` if `hash` should be replaced by a fresh hash.
    fn needs_rehash(&self, hash: &str) -> bool;
}

// =============================================================================
// HashScheme
// =============================================================================

/// Hash schemes recognized by [`Argon2Hasher::verify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashScheme {
    /// PHC-formatted Argon2 (`$argon2id$...`).
    Argon2,
    /// Legacy bcrypt (`$2b$...`).
    Bcrypt,
}

impl HashScheme {
    /// Detects the scheme from the hash prefix.
    pub fn detect(hash: &str) -> Option<Self> {
        if hash.starts_with("$argon2") {
            Some(HashScheme::Argon2)
        } else if ["$2a$", "$2b$", "$2x$", "$2y$"]
            .iter()
            .any(|prefix| hash.starts_with(prefix))
        {
            Some(HashScheme::Bcrypt)
        } else {
            None
        }
    }
}

// =============================================================================
// Argon2Hasher
// =============================================================================

/// Argon2id hasher with bcrypt verification for legacy records.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Creates a hasher with the production work factor.
    pub fn new() -> Self {
        Self {
            params: Params::DEFAULT,
        }
    }

    /// Creates a hasher with the minimum work factor.
    ///
    /// For tests only: hashes are cheap to brute-force.
    pub fn for_testing() -> Self {
        let params = Params::new(
            Params::MIN_M_COST,
            Params::MIN_T_COST,
            Params::MIN_P_COST,
            None,
        )
        .unwrap_or_default();
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::hash_failed(e.to_string()))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, PasswordError> {
        if hash.is_empty() {
            return Ok(false);
        }

        match HashScheme::detect(hash) {
            Some(HashScheme::Argon2) => match PasswordHash::new(hash) {
                // Parameters are read from the hash itself.
                Ok(parsed) => Ok(self
                    .argon2()
                    .verify_password(plaintext.as_bytes(), &parsed)
                    .is_ok()),
                Err(e) => {
                    tracing::debug!(error = %e, "Stored argon2 hash is corrupted");
                    Ok(false)
                }
            },
            Some(HashScheme::Bcrypt) => match bcrypt::verify(plaintext, hash) {
                Ok(matches) => Ok(matches),
                Err(e) => {
                    tracing::debug!(error = %e, "Stored bcrypt hash is corrupted");
                    Ok(false)
                }
            },
            None => Err(PasswordError::UnsupportedFormat),
        }
    }

    fn needs_rehash(&self, hash: &str) -> bool {
        !hash.starts_with("$argon2id$")
    }
}

// =============================================================================
// Tests
// =============================================================================
