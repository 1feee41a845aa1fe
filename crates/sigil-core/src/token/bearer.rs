// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bearer credential framing.

use crate::error::{AuthError, AuthResult};

/// The `Authorization` scheme carrying identity tokens.
pub const BEARER_SCHEME: &str = "Bearer";

/// Extracts the credential from an `Authorization` header value.
///
/// The scheme (matched case-insensitively) and surrounding whitespace are
/// stripped. A value without the scheme is taken as the raw token. An absent
/// or empty credential fails with [`AuthError::Unauthenticated`].
pub fn extract_bearer(header: Option<&str>) -> AuthResult<&str> {
    let value = header.map(str::trim).unwrap_or_default();
    let credential = strip_scheme(value).trim();

    if credential.is_empty() {
        return Err(AuthError::Unauthenticated);
    }
    Ok(credential)
}

fn strip_scheme(value: &str) -> &str {
    match value.get(..BEARER_SCHEME.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(BEARER_SCHEME) => {
            let rest = &value[BEARER_SCHEME.len()..];
            // "Bearerabc" is a token that happens to start with the scheme.
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                rest
            } else {
                value
            }
        }
        _ => value,
    }
}
