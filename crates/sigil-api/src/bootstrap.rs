// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Start-up seeding of catalog roles and the first administrator.

use tracing::{debug, info};

use sigil_config::BootstrapConfig;
use sigil_core::{AccountService, AuthResult, Profile, Role, RoleQuery};

/// What a bootstrap run changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Roles added to the catalog.
    pub roles_created: Vec<Role>,
    /// Whether the admin account was registered.
    pub admin_created: bool,
}

/// Seeds the configured roles and admin account.
///
/// Roles already in the catalog are left alone, as is an existing admin
/// account apart from gaining `admin_role`. Running twice changes nothing
/// the second time.
pub async fn seed(
    service: &AccountService,
    config: &BootstrapConfig,
    admin_role: &Role,
) -> AuthResult<BootstrapReport> {
    let mut report = BootstrapReport::default();

    let mut wanted = config
        .roles
        .iter()
        .map(|name| Role::parse(name))
        .collect::<AuthResult<Vec<_>>>()?;
    if config.admin.is_some() && !wanted.contains(admin_role) {
        wanted.push(admin_role.clone());
    }

    for role in wanted {
        if service.list_roles(&RoleQuery::by_name(&role)).await?.is_empty() {
            service.create_role(role.clone()).await?;
            report.roles_created.push(role);
        } else {
            debug!(role = %role, "Bootstrap role already registered");
        }
    }

    if let Some(admin) = &config.admin {
        if service.find_user(&admin.username).await?.is_none() {
            let profile = Profile::new(&admin.first_name, &admin.last_name);
            service
                .register(&admin.username, admin.password.expose(), profile)
                .await?;
            report.admin_created = true;
        }
        service.assign_role(&admin.username, admin_role).await?;
    }

    info!(
        roles_created = report.roles_created.len(),
        admin_created = report.admin_created,
        "Bootstrap complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigil_config::{BootstrapAdmin, SecretValue};
    use sigil_core::{Argon2Hasher, TokenCodec, TokenConfig};
    use std::sync::Arc;

    fn service() -> AccountService {
        AccountService::builder()
            .hasher(Arc::new(Argon2Hasher::for_testing()))
            .tokens(TokenCodec::new(TokenConfig::new("bootstrap-test-secret-0123456789abcd")).unwrap())
            .build()
            .unwrap()
    }

    fn config() -> BootstrapConfig {
        BootstrapConfig {
            roles: vec!["reader".to_string()],
            admin: Some(BootstrapAdmin {
                username: "root".to_string(),
                password: SecretValue::new("change-me"),
                first_name: "Root".to_string(),
                last_name: String::new(),
            }),
        }
    }

    #[tokio::test]
    async fn test_seed_creates_roles_and_admin() {
        let service = service();
        let admin = Role::new("admin");

        let report = seed(&service, &config(), &admin).await.unwrap();
        assert_eq!(report.roles_created, vec![Role::new("reader"), admin.clone()]);
        assert!(report.admin_created);

        let issued = service.login("root", "change-me").await.unwrap();
        assert!(issued.identity.has_role("admin"));
    }

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let service = service();
        let admin = Role::new("admin");

        seed(&service, &config(), &admin).await.unwrap();
        let second = seed(&service, &config(), &admin).await.unwrap();

        assert_eq!(second, BootstrapReport::default());
        assert_eq!(service.list_roles(&RoleQuery::new()).await.unwrap().len(), 2);
    }
}
