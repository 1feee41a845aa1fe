// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # sigil-api
//!
//! HTTP surface for Sigil.
//!
//! | Method | Path | Gate |
//! |---|---|---|
//! | GET | `/ping`, `/health` | none |
//! | POST | `/login` | none |
//! | GET | `/profile` | bearer |
//! | POST | `/register` | admin role, unless registration is open |
//! | GET, POST, DELETE | `/role` | admin role |
//! | POST | `/add-role/{role}`, `/remove-role/{role}` | admin role |
//!
//! Failures answer `{"error": {"code", "message"}}`.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod bootstrap;
pub mod config;
pub mod context;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;

pub use bootstrap::{BootstrapReport, seed};
pub use config::ApiConfig;
pub use context::AuthContext;
pub use error::{ApiError, ApiResult};
pub use server::{ApiServer, ApiServerBuilder};
pub use state::{AppState, AppStateBuilder};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convenience re-exports.
pub mod prelude {
    pub use crate::config::ApiConfig;
    pub use crate::error::{ApiError, ApiResult};
    pub use crate::server::ApiServer;
    pub use crate::state::AppState;
}
