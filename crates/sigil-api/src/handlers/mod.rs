// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API handlers.
//!
//! - [`health`]: liveness and store health
//! - [`auth`]: registration, login and profile
//! - [`roles`]: role catalog and membership

mod auth;
mod health;
mod roles;

pub use auth::*;
pub use health::*;
pub use roles::*;
