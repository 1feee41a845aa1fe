// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # sigil-config
//!
//! Configuration management for Sigil.
//!
//! ## Features
//!
//! - **Schema Definition**: server, token, access, bootstrap and logging
//!   sections with defaults and validation
//! - **Multi-Format Support**: YAML, TOML, and JSON configuration files
//! - **Environment Overrides**: `SIGIL_*` variables and `${VAR:default}`
//!   placeholders
//!
//! ## Quick Start
//!
//! ```no_run
//! use sigil_config::loader::load_config;
//!
//! let config = load_config("sigil.yaml").unwrap();
//! println!("Listening on {}", config.server.socket_addr());
//! ```
//!
//! ## Example File
//!
//! ```yaml
//! server:
//!   port: 3000
//!   request_timeout: 30s
//! token:
//!   secret: "${SIGIL_SECRET}"
//!   algorithm: HS256
//! access:
//!   admin_role: admin
//!   open_registration: false
//! bootstrap:
//!   roles: [admin]
//!   admin:
//!     username: root
//!     password: "${SIGIL_ADMIN_PASSWORD}"
//! logging:
//!   level: info
//!   format: json
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigFormat, ConfigLoader, EnvSource, load_config, load_config_str};
pub use schema::{
    AccessConfig, BootstrapAdmin, BootstrapConfig, LogFormat, LogLevel, LoggingConfig,
    SecretValue, ServerConfig, SigilConfig, TokenSettings,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convenience re-exports for common use cases.
pub mod prelude {
    pub use crate::error::{ConfigError, ConfigResult};
    pub use crate::loader::{ConfigLoader, load_config};
    pub use crate::schema::{SecretValue, SigilConfig};
}
