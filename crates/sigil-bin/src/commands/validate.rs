// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use sigil_config::SigilConfig;

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};

/// Secrets shorter than this draw a warning.
const MIN_SECRET_LEN: usize = 32;

/// Loads and validates the configuration, then prints a summary.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let config = super::load_configuration(cli)?;
    let source = cli
        .config
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "environment".to_string());

    // Resolves secret_file too, so a missing file fails here.
    let token = config.token.to_codec_config()?;
    let warnings = collect_warnings(&config, token.secret.len());

    match args.format {
        OutputFormat::Text => {
            println!("Configuration is valid: {}", source);
            println!();
            println!("Summary:");
            println!("  Listen:            {}", config.server.socket_addr());
            println!("  Algorithm:         {}", config.token.algorithm);
            println!("  Admin role:        {}", config.access.admin_role);
            println!("  Open registration: {}", config.access.open_registration);
            println!("  Bootstrap roles:   {}", config.bootstrap.roles.len());
            println!(
                "  Bootstrap admin:   {}",
                config
                    .bootstrap
                    .admin
                    .as_ref()
                    .map(|a| a.username.as_str())
                    .unwrap_or("none")
            );

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  - {}", warning);
                }
            }

            if args.show_config {
                println!();
                println!("Parsed configuration:");
                println!("{}", serde_json::to_string_pretty(&config).map_err(|e| BinError::runtime(e.to_string()))?);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "source": source,
                "summary": {
                    "listen": config.server.socket_addr().to_string(),
                    "algorithm": config.token.algorithm.as_str(),
                    "admin_role": config.access.admin_role,
                    "open_registration": config.access.open_registration,
                    "bootstrap_roles": config.bootstrap.roles.len(),
                    "bootstrap_admin": config.bootstrap.admin.as_ref().map(|a| a.username.as_str()),
                },
                "warnings": warnings,
                "config": if args.show_config { Some(&config) } else { None },
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&output).map_err(|e| BinError::runtime(e.to_string()))?
            );
        }
    }

    if args.strict && !warnings.is_empty() {
        return Err(BinError::config(format!(
            "Strict mode: {} warning(s) found",
            warnings.len()
        )));
    }

    Ok(())
}

fn collect_warnings(config: &SigilConfig, secret_len: usize) -> Vec<String> {
    let mut warnings = Vec::new();

    if secret_len < MIN_SECRET_LEN {
        warnings.push(format!(
            "Token secret is {} bytes; use at least {}",
            secret_len, MIN_SECRET_LEN
        ));
    }

    if !config.access.open_registration && config.bootstrap.admin.is_none() {
        warnings.push(
            "Registration is closed and no bootstrap admin is configured; \
             no account can reach admin endpoints"
                .to_string(),
        );
    }

    if config.access.open_registration {
        warnings.push("Open registration lets anyone create an account".to_string());
    }

    warnings
}
