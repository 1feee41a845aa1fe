// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `serve`: run the HTTP service (default)
//! - `validate`: validate a configuration file
//! - `hash-password`: print a password hash for seeding
//! - `version`: show version information

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Sigil - credential and role service
#[derive(Parser, Debug)]
#[command(
    name = "sigil",
    author = "Sylvex <contact@sylvex.io>",
    version = sigil_core::VERSION,
    about = "Credential verification, token issuance and role administration",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path; without one, settings come from SIGIL_* variables
    #[arg(short, long, env = "SIGIL_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the configuration
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Log format; overrides the configuration
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    /// Enable quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the HTTP service
    ///
    /// This is the default command when no subcommand is specified.
    Serve(ServeArgs),

    /// Validate the configuration file
    Validate(ValidateArgs),

    /// Hash a password for use in seed data
    #[command(name = "hash-password")]
    HashPassword(HashPasswordArgs),

    /// Show version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `serve` command.
#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Override the configured port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Skip seeding bootstrap roles and admin
    #[arg(long)]
    pub skip_bootstrap: bool,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Default, Clone)]
pub struct ValidateArgs {
    /// Show parsed configuration after validation
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Strict mode: treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `hash-password` command.
#[derive(Args, Debug, Clone)]
pub struct HashPasswordArgs {
    /// Password to hash
    #[arg(required_unless_present = "stdin")]
    pub password: Option<String>,

    /// Read the password from stdin
    #[arg(long)]
    pub stdin: bool,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

impl From<LogFormat> for sigil_config::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Text => sigil_config::LogFormat::Text,
            LogFormat::Json => sigil_config::LogFormat::Json,
            LogFormat::Compact => sigil_config::LogFormat::Compact,
        }
    }
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective command, defaulting to `Serve` if none specified.
    pub fn effective_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Serve(ServeArgs::default()))
    }

    /// Check if verbose logging is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Resolves the log level: `--quiet`, `--verbose`, `--log-level`, then
    /// `configured`.
    pub fn effective_log_level<'a>(&'a self, configured: &'a str) -> &'a str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            self.log_level.as_deref().unwrap_or(configured)
        }
    }

    /// Resolves the log format: `--log-format`, then `configured`.
    pub fn effective_log_format(
        &self,
        configured: sigil_config::LogFormat,
    ) -> sigil_config::LogFormat {
        self.log_format.map(Into::into).unwrap_or(configured)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_serve() {
        let cli = Cli::try_parse_from(["sigil"]).unwrap();
        assert!(matches!(cli.effective_command(), Commands::Serve(_)));
        assert_eq!(cli.effective_log_level("info"), "info");
    }

    #[test]
    fn test_global_flags() {
        let cli =
            Cli::try_parse_from(["sigil", "validate", "-c", "sigil.toml", "--log-format", "json"])
                .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("sigil.toml")));
        assert_eq!(
            cli.effective_log_format(sigil_config::LogFormat::Text),
            sigil_config::LogFormat::Json
        );
        assert!(matches!(cli.command, Some(Commands::Validate(_))));
    }

    #[test]
    fn test_quiet_wins_over_level() {
        let cli = Cli::try_parse_from(["sigil", "--quiet", "--log-level", "trace"]).unwrap();
        assert_eq!(cli.effective_log_level("info"), "warn");
        assert!(!cli.is_verbose());
    }

    #[test]
    fn test_hash_password_requires_input() {
        assert!(Cli::try_parse_from(["sigil", "hash-password"]).is_err());

        let cli = Cli::try_parse_from(["sigil", "hash-password", "--stdin"]).unwrap();
        if let Some(Commands::HashPassword(args)) = cli.command {
            assert!(args.stdin);
            assert!(args.password.is_none());
        } else {
            panic!("Expected HashPassword command");
        }
    }

    #[test]
    fn test_serve_port_override() {
        let cli = Cli::try_parse_from(["sigil", "serve", "--port", "9000"]).unwrap();
        if let Some(Commands::Serve(args)) = cli.command {
            assert_eq!(args.port, Some(9000));
        } else {
            panic!("Expected Serve command");
        }
    }
}
