// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use sigil_core::{AccountService, AuthorizationEngine, Role, TokenCodec};

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};

// =============================================================================
// AppState
// =============================================================================

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// Account operations.
    pub service: AccountService,
}

impl AppState {
    /// Creates a new app state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Returns the account service.
    pub fn accounts(&self) -> &AccountService {
        &self.service
    }

    /// Returns the token codec.
    pub fn tokens(&self) -> &TokenCodec {
        self.service.tokens()
    }

    /// Returns the authorization engine.
    pub fn authorization(&self) -> &AuthorizationEngine {
        self.service.authorization()
    }

    /// Returns the role required by administrative endpoints.
    pub fn admin_role(&self) -> &Role {
        &self.config.admin_role
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for constructing AppState.
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<ApiConfig>,
    service: Option<AccountService>,
}

impl AppStateBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the account service.
    pub fn service(mut self, service: AccountService) -> Self {
        self.service = Some(service);
        self
    }

    /// Builds the AppState.
    ///
    /// The configuration defaults; the service is required.
    pub fn build(self) -> ApiResult<AppState> {
        let service = self
            .service
            .ok_or_else(|| ApiError::internal("account service is required"))?;

        Ok(AppState {
            config: Arc::new(self.config.unwrap_or_default()),
            service,
        })
    }
}
