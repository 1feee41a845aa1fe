// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # sigil-bin
//!
//! Command-line entry point for Sigil.
//!
//! ```text
//!   main.rs ──► cli.rs ──► commands ──► runtime ──► sigil-api
//!                 │                        │
//!                 └──► logging             └──► shutdown
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Serve using SIGIL_* variables only
//! SIGIL_TOKEN_SECRET=... sigil
//!
//! # Serve with a configuration file
//! sigil -c /etc/sigil/sigil.yaml serve
//!
//! # Check a configuration file
//! sigil -c sigil.yaml validate --strict
//!
//! # Hash a seed password
//! echo -n 'change-me' | sigil hash-password --stdin
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod shutdown;

// =============================================================================
// Re-exports
// =============================================================================

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;
pub use runtime::{ServiceRuntime, build_service};
pub use shutdown::shutdown_signal;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
