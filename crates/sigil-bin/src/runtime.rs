// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Service runtime orchestration.
//!
//! Wires the account service from configuration, seeds bootstrap data and
//! runs the API server until shutdown.

use std::future::Future;
use std::sync::Arc;

use tracing::{info, warn};

use sigil_api::{ApiConfig, ApiServer};
use sigil_config::SigilConfig;
use sigil_core::{AccountService, TokenCodec};

use crate::error::{BinError, BinResult};

// =============================================================================
// ServiceRuntime
// =============================================================================

/// A configured service ready to run.
pub struct ServiceRuntime {
    config: Arc<SigilConfig>,
    service: AccountService,
    skip_bootstrap: bool,
}

impl ServiceRuntime {
    /// Builds the account service described by `config`.
    pub fn new(config: SigilConfig) -> BinResult<Self> {
        let service = build_service(&config)?;
        Ok(Self {
            config: Arc::new(config),
            service,
            skip_bootstrap: false,
        })
    }

    /// Skips seeding bootstrap roles and admin.
    pub fn with_skip_bootstrap(mut self, skip: bool) -> Self {
        self.skip_bootstrap = skip;
        self
    }

    /// Returns the account service.
    pub fn service(&self) -> &AccountService {
        &self.service
    }

    /// Seeds bootstrap data, then serves until `shutdown` resolves.
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send + 'static) -> BinResult<()> {
        info!(version = sigil_core::VERSION, "Starting Sigil");

        self.bootstrap().await?;

        let api_config = ApiConfig::from_config(&self.config);
        if !api_config.open_registration && self.config.bootstrap.admin.is_none() {
            warn!(
                admin_role = %api_config.admin_role,
                "Registration is closed and no bootstrap admin is configured"
            );
        }

        let server = ApiServer::builder()
            .config(api_config)
            .service(self.service)
            .build()?;

        info!(addr = %server.addr(), "Listening");
        server
            .run_with_shutdown(shutdown)
            .await
            .map_err(|e| BinError::from(e).with_context("API server failed"))?;

        info!("Sigil shutdown complete");
        Ok(())
    }

    async fn bootstrap(&self) -> BinResult<()> {
        if self.skip_bootstrap || self.config.bootstrap.is_empty() {
            return Ok(());
        }

        let admin_role = self.config.access.admin_role();
        sigil_api::seed(&self.service, &self.config.bootstrap, &admin_role)
            .await
            .map_err(|e| BinError::from(e).with_context("Bootstrap failed"))?;
        Ok(())
    }
}

/// Creates the account service with in-memory stores and the configured
/// signing key.
pub fn build_service(config: &SigilConfig) -> BinResult<AccountService> {
    let token_config = config.token.to_codec_config()?;
    let tokens = TokenCodec::new(token_config)
        .map_err(|e| BinError::from(e).with_context("Invalid token settings"))?;

    Ok(AccountService::builder().tokens(tokens).build()?)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use sigil_config::SecretValue;

    fn config() -> SigilConfig {
        let mut config = SigilConfig::default();
        config.token.secret = Some(SecretValue::new("runtime-test-secret-0123456789abcdef"));
        config.bootstrap.roles = vec!["auditor".to_string()];
        config
    }

    #[test]
    fn test_build_service_requires_secret() {
        assert!(build_service(&SigilConfig::default()).is_err());
        assert!(build_service(&config()).is_ok());
    }

    #[tokio::test]
    async fn test_bootstrap_seeds_roles() {
        let runtime = ServiceRuntime::new(config()).unwrap();
        runtime.bootstrap().await.unwrap();

        let roles = runtime
            .service()
            .list_roles(&sigil_core::RoleQuery::new())
            .await
            .unwrap();
        assert_eq!(roles, vec![sigil_core::Role::new("auditor")]);
    }

    #[tokio::test]
    async fn test_skip_bootstrap() {
        let runtime = ServiceRuntime::new(config())
            .unwrap()
            .with_skip_bootstrap(true);
        runtime.bootstrap().await.unwrap();

        let roles = runtime
            .service()
            .list_roles(&sigil_core::RoleQuery::new())
            .await
            .unwrap();
        assert!(roles.is_empty());
    }
}
