// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Middleware implementations for the API server.
//!
//! - [`AuthLayer`]: bearer token authentication
//! - [`RoleGateLayer`]: required-role enforcement

mod auth;
mod rbac;

pub use auth::{AuthLayer, AuthMiddleware};
pub use rbac::{RoleGateLayer, RoleGateMiddleware};
