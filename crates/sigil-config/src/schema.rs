// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema for Sigil.
//!
//! Every section is optional and defaulted except the token secret, which
//! must come from `token.secret`, `token.secret_file` or the
//! `SIGIL_TOKEN_SECRET` environment variable.

use std::fmt;
use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use sigil_core::{Role, SigningAlgorithm, TokenConfig};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Constants
// =============================================================================

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default graceful shutdown timeout.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Default administrator role name.
pub const DEFAULT_ADMIN_ROLE: &str = "admin";

// =============================================================================
// SigilConfig
// =============================================================================

/// The root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SigilConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Token signing settings.
    #[serde(default)]
    pub token: TokenSettings,

    /// Access policy settings.
    #[serde(default)]
    pub access: AccessConfig,

    /// Data seeded at start-up.
    #[serde(default)]
    pub bootstrap: BootstrapConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SigilConfig {
    /// Validates the entire configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.server.validate()?;
        self.token.validate()?;
        self.access.validate()?;
        self.bootstrap.validate()?;
        Ok(())
    }
}

// =============================================================================
// Server Configuration
// =============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Deadline applied to each request.
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Time allowed for in-flight requests after a shutdown signal.
    #[serde(default = "default_shutdown_timeout", with = "humantime_serde")]
    pub shutdown_timeout: Duration,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_request_timeout() -> Duration {
    DEFAULT_REQUEST_TIMEOUT
}

fn default_shutdown_timeout() -> Duration {
    DEFAULT_SHUTDOWN_TIMEOUT
}

impl ServerConfig {
    /// Validates the server configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.request_timeout.is_zero() {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "cannot be zero",
            ));
        }
        Ok(())
    }

    /// Returns the socket address.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: DEFAULT_PORT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

// =============================================================================
// Token Settings
// =============================================================================

/// Token signing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenSettings {
    /// Inline HMAC secret.
    #[serde(default, skip_serializing)]
    pub secret: Option<SecretValue>,

    /// File holding the HMAC secret. Takes precedence over `secret`.
    #[serde(default)]
    pub secret_file: Option<PathBuf>,

    /// Signing algorithm (`HS256`, `HS384` or `HS512`).
    #[serde(default)]
    pub algorithm: SigningAlgorithm,
}

impl TokenSettings {
    /// Validates that a secret source is configured.
    pub fn validate(&self) -> ConfigResult<()> {
        match (&self.secret, &self.secret_file) {
            (_, Some(path)) if path.as_os_str().is_empty() => Err(ConfigError::validation(
                "token.secret_file",
                "path cannot be empty",
            )),
            (_, Some(_)) => Ok(()),
            (Some(secret), None) if secret.expose().is_empty() => Err(ConfigError::validation(
                "token.secret",
                "cannot be empty",
            )),
            (Some(_), None) => Ok(()),
            (None, None) => Err(ConfigError::missing_field("token.secret")),
        }
    }

    /// Resolves the secret and builds the codec configuration.
    ///
    /// Reads `secret_file` if set. Trailing newlines in the file are ignored.
    pub fn to_codec_config(&self) -> ConfigResult<TokenConfig> {
        let secret = match (&self.secret_file, &self.secret) {
            (Some(path), _) => {
                if !path.exists() {
                    return Err(ConfigError::file_not_found(path));
                }
                let content = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
                content.trim_end_matches(['\r', '\n']).to_string()
            }
            (None, Some(secret)) => secret.expose().to_string(),
            (None, None) => return Err(ConfigError::missing_field("token.secret")),
        };

        if secret.is_empty() {
            return Err(ConfigError::validation("token.secret", "cannot be empty"));
        }

        Ok(TokenConfig::new(secret).with_algorithm(self.algorithm))
    }
}

// =============================================================================
// Access Configuration
// =============================================================================

/// Access policy for the HTTP surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessConfig {
    /// Role required for administrative endpoints.
    #[serde(default = "default_admin_role")]
    pub admin_role: String,

    /// Allow registration without the admin role.
    #[serde(default)]
    pub open_registration: bool,
}

fn default_admin_role() -> String {
    DEFAULT_ADMIN_ROLE.to_string()
}

impl AccessConfig {
    /// Validates the access configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.admin_role.trim().is_empty() {
            return Err(ConfigError::validation("access.admin_role", "cannot be empty"));
        }
        Ok(())
    }

    /// Returns the admin role.
    pub fn admin_role(&self) -> Role {
        Role::new(self.admin_role.clone())
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            admin_role: default_admin_role(),
            open_registration: false,
        }
    }
}

// =============================================================================
// Bootstrap Configuration
// =============================================================================

/// Roles and an administrator created at start-up if absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BootstrapConfig {
    /// Roles registered in the catalog.
    #[serde(default)]
    pub roles: Vec<String>,

    /// Administrator account.
    #[serde(default)]
    pub admin: Option<BootstrapAdmin>,
}

impl BootstrapConfig {
    /// Validates the bootstrap configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(index) = self.roles.iter().position(|r| r.trim().is_empty()) {
            return Err(ConfigError::validation(
                format!("bootstrap.roles[{}]", index),
                "cannot be empty",
            ));
        }
        if let Some(admin) = &self.admin {
            admin.validate()?;
        }
        Ok(())
    }

    /// Returns `true` if nothing is seeded.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty() && self.admin.is_none()
    }
}

/// Administrator account seeded at start-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BootstrapAdmin {
    /// Username.
    pub username: String,

    /// Initial password.
    #[serde(skip_serializing)]
    pub password: SecretValue,

    /// Given name.
    #[serde(default)]
    pub first_name: String,

    /// Family name.
    #[serde(default)]
    pub last_name: String,
}

impl BootstrapAdmin {
    /// Validates the account.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.username.trim().is_empty() {
            return Err(ConfigError::validation(
                "bootstrap.admin.username",
                "cannot be empty",
            ));
        }
        if self.password.expose().is_empty() {
            return Err(ConfigError::validation(
                "bootstrap.admin.password",
                "cannot be empty",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the filter directive name.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(ConfigError::validation(
                "logging.level",
                format!("unknown level '{}'", other),
            )),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Single-line compact text.
    Compact,
    /// JSON lines.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::validation(
                "logging.format",
                format!("unknown format '{}'", other),
            )),
        }
    }
}

// =============================================================================
// Secret Value
// =============================================================================

/// A secret string that never appears in `Debug` or `Display` output.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SecretValue(String);

impl SecretValue {
    /// Creates a new secret value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretValue(***)")
    }
}

impl fmt::Display for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn with_secret(secret: &str) -> TokenSettings {
        TokenSettings {
            secret: Some(SecretValue::new(secret)),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = SigilConfig::default();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.socket_addr().to_string(), "0.0.0.0:3000");
        assert_eq!(config.server.request_timeout, Duration::from_secs(30));
        assert_eq!(config.access.admin_role, "admin");
        assert!(!config.access.open_registration);
        assert_eq!(config.token.algorithm, SigningAlgorithm::HS256);
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(config.bootstrap.is_empty());
    }

    #[test]
    fn test_secret_required() {
        let config = SigilConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::MissingField { .. })));

        assert!(with_secret("").validate().is_err());
        assert!(with_secret("s3cret").validate().is_ok());
    }

    #[test]
    fn test_secret_file_takes_precedence() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "file-secret-0123456789abcdef0123456789").unwrap();

        let settings = TokenSettings {
            secret: Some(SecretValue::new("inline")),
            secret_file: Some(file.path().to_path_buf()),
            algorithm: SigningAlgorithm::HS384,
        };
        let codec_config = settings.to_codec_config().unwrap();

        assert_eq!(codec_config.secret, "file-secret-0123456789abcdef0123456789");
        assert_eq!(codec_config.algorithm, SigningAlgorithm::HS384);
    }

    #[test]
    fn test_missing_secret_file() {
        let settings = TokenSettings {
            secret_file: Some(PathBuf::from("/nonexistent/sigil/secret")),
            ..Default::default()
        };
        assert!(matches!(
            settings.to_codec_config(),
            Err(ConfigError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_secret_never_serialized() {
        let config = SigilConfig {
            token: with_secret("do-not-print"),
            ..Default::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("do-not-print"));
        assert!(!format!("{:?}", config).contains("do-not-print"));
    }

    #[test]
    fn test_bootstrap_validation() {
        let mut bootstrap = BootstrapConfig {
            roles: vec!["admin".to_string(), " ".to_string()],
            admin: None,
        };
        assert!(bootstrap.validate().is_err());

        bootstrap.roles.pop();
        bootstrap.admin = Some(BootstrapAdmin {
            username: "root".to_string(),
            password: SecretValue::new(""),
            first_name: String::new(),
            last_name: String::new(),
        });
        assert!(bootstrap.validate().is_err());
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("loud".parse::<LogLevel>().is_err());
    }
}
