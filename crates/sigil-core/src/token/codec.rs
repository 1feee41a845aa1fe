// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! JWT signing and verification.

use std::fmt;
use std::sync::Arc;

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use super::bearer::extract_bearer;
use crate::error::{AuthError, AuthResult};
use crate::types::Identity;

/// Secrets shorter than this are accepted with a warning.
const RECOMMENDED_SECRET_LEN: usize = 32;

// =============================================================================
// SigningAlgorithm
// =============================================================================

/// HMAC algorithms accepted for signing.
///
/// Verification accepts exactly the configured algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SigningAlgorithm {
    /// HMAC using SHA-256.
    #[default]
    HS256,
    /// HMAC using SHA-384.
    HS384,
    /// HMAC using SHA-512.
    HS512,
}

impl SigningAlgorithm {
    /// Returns the JOSE name of the algorithm.
    pub fn as_str(&self) -> &'static str {
        match self {
            SigningAlgorithm::HS256 => "HS256",
            SigningAlgorithm::HS384 => "HS384",
            SigningAlgorithm::HS512 => "HS512",
        }
    }

    fn jwt_algorithm(self) -> Algorithm {
        match self {
            SigningAlgorithm::HS256 => Algorithm::HS256,
            SigningAlgorithm::HS384 => Algorithm::HS384,
            SigningAlgorithm::HS512 => Algorithm::HS512,
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// TokenConfig
// =============================================================================

/// Signing key material, fixed for the lifetime of a [`TokenCodec`].
#[derive(Clone)]
pub struct TokenConfig {
    /// Shared HMAC secret.
    pub secret: String,
    /// Signing algorithm.
    pub algorithm: SigningAlgorithm,
}

impl TokenConfig {
    /// Creates a configuration with the given secret and HS256.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            algorithm: SigningAlgorithm::default(),
        }
    }

    /// Sets the signing algorithm.
    pub fn with_algorithm(mut self, algorithm: SigningAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AuthResult<()> {
        if self.secret.is_empty() {
            return Err(AuthError::validation(
                "token.secret",
                "signing secret is not configured",
            ));
        }
        if self.secret.len() < RECOMMENDED_SECRET_LEN {
            tracing::warn!(
                "Token signing secret is shorter than recommended ({} bytes)",
                RECOMMENDED_SECRET_LEN
            );
        }
        Ok(())
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"***")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

// =============================================================================
// TokenCodec
// =============================================================================

/// Issues and verifies signed identity tokens.
///
/// Tokens carry no expiry: a token verifies for as long as the signing
/// secret is unchanged.
#[derive(Clone)]
pub struct TokenCodec {
    algorithm: SigningAlgorithm,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl TokenCodec {
    /// Creates a codec from validated key material.
    pub fn new(config: TokenConfig) -> AuthResult<Self> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(config.algorithm.jwt_algorithm());
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Ok(Self {
            algorithm: config.algorithm,
            encoding_key: Arc::new(encoding_key),
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(validation),
        })
    }

    /// Returns the signing algorithm.
    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    /// Signs a token carrying `identity`.
    pub fn issue(&self, identity: &Identity) -> AuthResult<String> {
        let header = Header::new(self.algorithm.jwt_algorithm());

        encode(&header, identity, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign token");
            AuthError::upstream("failed to sign token")
        })
    }

    /// Verifies a token and returns the identity it carries.
    ///
    /// Any algorithm other than the configured one is rejected, including
    /// `none`.
    pub fn verify(&self, token: &str) -> AuthResult<Identity> {
        decode::<Identity>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let reason = match e.kind() {
                    ErrorKind::InvalidSignature => "signature does not verify",
                    ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                        "unexpected signing algorithm"
                    }
                    ErrorKind::InvalidToken
                    | ErrorKind::Base64(_)
                    | ErrorKind::Json(_)
                    | ErrorKind::Utf8(_) => "malformed token",
                    _ => "token rejected",
                };
                tracing::debug!(error = %e, reason, "Token verification failed");
                AuthError::invalid_token(reason)
            })
    }

    /// Verifies the credential in an `Authorization` header value.
    pub fn verify_bearer(&self, header: Option<&str>) -> AuthResult<Identity> {
        let token = extract_bearer(header)?;
        self.verify(token)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Profile;
    use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

    const SECRET: &str = "test-secret-key-that-is-long-enough-for-testing";

    fn codec() -> TokenCodec {
        TokenCodec::new(TokenConfig::new(SECRET)).unwrap()
    }

    fn alice() -> Identity {
        Identity::new("alice", Profile::new("Alice", "Liddell")).with_roles(["admin", "reader"])
    }

    #[test]
    fn test_issue_and_verify() {
        let codec = codec();
        let token = codec.issue(&alice()).unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(codec.verify(&token).unwrap(), alice());
    }

    #[test]
    fn test_identity_without_roles_round_trips() {
        let codec = codec();
        let identity = Identity::new("bob", Profile::default());
        let token = codec.issue(&identity).unwrap();

        assert_eq!(codec.verify(&token).unwrap(), identity);
    }

    #[test]
    fn test_no_registered_claims() {
        let token = codec().issue(&alice()).unwrap();
        let payload = token.split('.').nth(1).unwrap();
        let claims: serde_json::Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap();

        assert_eq!(claims["username"], "alice");
        assert_eq!(claims["firstname"], "Alice");
        assert!(claims.get("exp").is_none());
        assert!(claims.get("nbf").is_none());
    }

    #[test]
    fn test_wrong_secret() {
        let other = TokenCodec::new(TokenConfig::new("another-secret-key-that-is-long-enough")).unwrap();
        let token = other.issue(&alice()).unwrap();

        let err = codec().verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken { .. }));
    }

    #[test]
    fn test_tampered_payload() {
        let codec = codec();
        let token = codec.issue(&alice()).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let forged_claims = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&Identity::new("mallory", Profile::default()).with_roles(["admin"]))
                .unwrap(),
        );
        let forged = format!("{}.{}.{}", parts[0], forged_claims, parts[2]);

        assert!(matches!(codec.verify(&forged), Err(AuthError::InvalidToken { .. })));
    }

    #[test]
    fn test_spliced_signature() {
        let codec = codec();
        let token = codec.issue(&alice()).unwrap();
        let other = codec.issue(&Identity::new("bob", Profile::default())).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let other_sig = other.split('.').nth(2).unwrap();
        let spliced = format!("{}.{}.{}", parts[0], parts[1], other_sig);

        assert!(matches!(codec.verify(&spliced), Err(AuthError::InvalidToken { .. })));
    }

    #[test]
    fn test_rejects_other_algorithm() {
        let hs512 = TokenCodec::new(TokenConfig::new(SECRET).with_algorithm(SigningAlgorithm::HS512))
            .unwrap();
        let token = hs512.issue(&alice()).unwrap();

        let err = codec().verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken { ref reason } if reason == "unexpected signing algorithm"));
    }

    #[test]
    fn test_rejects_none_algorithm() {
        let token = codec().issue(&alice()).unwrap();
        let payload = token.split('.').nth(1).unwrap();
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);

        for unsigned in [format!("{}.{}.", header, payload), format!("{}.{}", header, payload)] {
            assert!(matches!(codec().verify(&unsigned), Err(AuthError::InvalidToken { .. })));
        }
    }

    #[test]
    fn test_malformed_token() {
        for token in ["", "not-a-token", "a.b.c", "invalid.token.here"] {
            assert!(matches!(codec().verify(token), Err(AuthError::InvalidToken { .. })));
        }
    }

    #[test]
    fn test_verify_bearer() {
        let codec = codec();
        let token = codec.issue(&alice()).unwrap();

        let identity = codec.verify_bearer(Some(&format!("Bearer {}", token))).unwrap();
        assert_eq!(identity.username, "alice");

        assert!(matches!(codec.verify_bearer(None), Err(AuthError::Unauthenticated)));
        assert!(matches!(
            codec.verify_bearer(Some("Bearer  ")),
            Err(AuthError::Unauthenticated)
        ));
    }

    #[test]
    fn test_empty_secret_rejected() {
        let result = TokenCodec::new(TokenConfig::new(""));
        assert!(matches!(result, Err(AuthError::Validation { .. })));
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = TokenConfig::new(SECRET);
        assert!(!format!("{:?}", config).contains(SECRET));
        assert!(!format!("{:?}", codec()).contains(SECRET));
    }
}
