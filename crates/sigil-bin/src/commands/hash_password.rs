// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `hash-password` command.

use std::io::Read;

use anyhow::Context;

use sigil_core::{Argon2Hasher, PasswordHasher};

use crate::cli::{Cli, HashPasswordArgs};
use crate::error::{BinError, BinResult};

/// Prints the Argon2id hash of a password.
pub async fn hash_password(_cli: &Cli, args: HashPasswordArgs) -> BinResult<()> {
    let password = match args.password {
        Some(password) if !args.stdin => password,
        _ => read_stdin()?,
    };

    if password.is_empty() {
        return Err(BinError::config("Password cannot be empty"));
    }

    let hash = tokio::task::spawn_blocking(move || Argon2Hasher::new().hash(&password))
        .await
        .context("hashing task failed")?
        .map_err(sigil_core::AuthError::from)?;

    println!("{}", hash);
    Ok(())
}

/// Reads one password from stdin, dropping the trailing newline.
fn read_stdin() -> anyhow::Result<String> {
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("reading password from stdin")?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}
