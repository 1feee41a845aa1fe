// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use sigil_config::SigilConfig;
use sigil_core::Role;

/// Paths served without a bearer token.
pub const PUBLIC_PATHS: &[&str] = &["/ping", "/health", "/login"];

/// Configuration for the API server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host address.
    pub host: IpAddr,
    /// Server port.
    pub port: u16,
    /// Request timeout.
    pub request_timeout: Duration,
    /// Graceful shutdown timeout.
    pub shutdown_timeout: Duration,
    /// Role required by administrative endpoints.
    pub admin_role: Role,
    /// Serve `/register` without the admin role.
    pub open_registration: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: sigil_config::schema::DEFAULT_PORT,
            request_timeout: sigil_config::schema::DEFAULT_REQUEST_TIMEOUT,
            shutdown_timeout: sigil_config::schema::DEFAULT_SHUTDOWN_TIMEOUT,
            admin_role: Role::new(sigil_config::schema::DEFAULT_ADMIN_ROLE),
            open_registration: false,
        }
    }
}

impl ApiConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the API configuration from the service configuration.
    pub fn from_config(config: &SigilConfig) -> Self {
        Self {
            host: config.server.host,
            port: config.server.port,
            request_timeout: config.server.request_timeout,
            shutdown_timeout: config.server.shutdown_timeout,
            admin_role: config.access.admin_role(),
            open_registration: config.access.open_registration,
        }
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the admin role.
    pub fn with_admin_role(mut self, role: impl Into<String>) -> Self {
        self.admin_role = Role::new(role);
        self
    }

    /// Enables or disables open registration.
    pub fn with_open_registration(mut self, enabled: bool) -> Self {
        self.open_registration = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let mut config = SigilConfig::default();
        config.server.port = 9100;
        config.access.admin_role = "root".to_string();
        config.access.open_registration = true;

        let api = ApiConfig::from_config(&config);
        assert_eq!(api.socket_addr().port(), 9100);
        assert_eq!(api.admin_role.as_str(), "root");
        assert!(api.open_registration);
    }

    #[test]
    fn test_defaults_match_schema() {
        let api = ApiConfig::default();
        let from_schema = ApiConfig::from_config(&SigilConfig::default());

        assert_eq!(api.socket_addr(), from_schema.socket_addr());
        assert_eq!(api.admin_role, from_schema.admin_role);
    }
}
