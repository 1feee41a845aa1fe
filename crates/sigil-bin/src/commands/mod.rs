// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.
//!
//! - `serve`: run the HTTP service
//! - `validate`: validate a configuration file
//! - `hash-password`: print a password hash
//! - `version`: show version information

mod hash_password;
mod serve;
mod validate;
mod version;

pub use hash_password::hash_password;
pub use serve::serve;
pub use validate::validate;
pub use version::version;

use sigil_config::{ConfigLoader, SigilConfig};

use crate::cli::{Cli, Commands};
use crate::error::BinResult;
use crate::logging::init_logging;

/// Executes the appropriate command based on CLI arguments.
pub async fn execute(cli: Cli) -> BinResult<()> {
    match cli.effective_command() {
        Commands::Serve(args) => serve::serve(&cli, args).await,
        Commands::Validate(args) => {
            init_cli_logging(&cli);
            validate::validate(&cli, args)
        }
        Commands::HashPassword(args) => {
            init_cli_logging(&cli);
            hash_password::hash_password(&cli, args).await
        }
        Commands::Version => version::version(&cli),
    }
}

/// Loads the configuration file named on the command line, or builds one
/// from `SIGIL_*` variables when none is given.
pub(crate) fn load_configuration(cli: &Cli) -> BinResult<SigilConfig> {
    let loader = ConfigLoader::new();
    let config = match &cli.config {
        Some(path) => loader.load(path)?,
        None => loader.load_from_env()?,
    };
    Ok(config)
}

/// Logging for commands that do not read the configuration's logging section.
fn init_cli_logging(cli: &Cli) {
    let level = cli.effective_log_level("warn");
    init_logging(level, cli.effective_log_format(Default::default()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_configuration_from_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            "[server]\nport = 4100\n\n[token]\nsecret = \"file-secret-0123456789abcdef0123456789\""
        )
        .unwrap();

        let cli = Cli::try_parse_from(["sigil", "-c", file.path().to_str().unwrap(), "validate"])
            .unwrap();
        let config = load_configuration(&cli).unwrap();
        assert_eq!(config.server.port, 4100);
    }

    #[test]
    fn test_load_configuration_missing_file() {
        let cli = Cli::try_parse_from(["sigil", "-c", "/nonexistent/sigil.yaml"]).unwrap();
        let err = load_configuration(&cli).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }
}
