// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading.
//!
//! # Loading Pipeline
//!
//! 1. Read the file and substitute `${VAR}` / `${VAR:default}` placeholders;
//!    an unset variable without a default is an error
//! 2. Parse YAML, TOML or JSON by file extension
//! 3. Apply `SIGIL_*` environment overrides
//! 4. Resolve a relative `token.secret_file` against the config directory
//! 5. Validate
//!
//! # Environment Variable Override
//!
//! ```text
//! SIGIL_SERVER_HOST=127.0.0.1
//! SIGIL_SERVER_PORT=8080
//! SIGIL_TOKEN_SECRET=...
//! SIGIL_TOKEN_SECRET_FILE=/run/secrets/sigil
//! SIGIL_LOG_LEVEL=debug
//! SIGIL_LOG_FORMAT=json
//! SIGIL_OPEN_REGISTRATION=true
//! ```
//!
//! # Placeholder Substitution
//!
//! Placeholders are replaced as raw text before parsing, so `port: ${PORT}`
//! yields a number. A value that may contain YAML or TOML syntax (`: `,
//! ` #`, a leading `{`, `*` or `&`) must be quoted in the document:
//!
//! ```text
//! token:
//!   secret: "${SIGIL_SECRET}"
//! ```
//!
//! Secrets are better supplied through `SIGIL_TOKEN_SECRET` or
//! `token.secret_file`, which bypass parsing altogether.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{LogFormat, LogLevel, SecretValue, SigilConfig};

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "SIGIL";

// =============================================================================
// EnvSource
// =============================================================================

/// Where environment variables are read from.
#[derive(Debug, Clone, Default)]
pub enum EnvSource {
    /// The process environment.
    #[default]
    Process,
    /// A fixed map, for tests and embedding.
    Map(HashMap<String, String>),
}

impl EnvSource {
    fn get(&self, name: &str) -> Option<String> {
        match self {
            EnvSource::Process => env::var(name).ok(),
            EnvSource::Map(map) => map.get(name).cloned(),
        }
    }
}

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader for Sigil.
///
/// # Examples
///
/// ```no_run
/// use sigil_config::loader::ConfigLoader;
///
/// let config = ConfigLoader::new().load("sigil.yaml").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    env_prefix: String,
    resolve_env_vars: bool,
    env: EnvSource,
}

impl ConfigLoader {
    /// Creates a loader reading the process environment.
    pub fn new() -> Self {
        Self {
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            resolve_env_vars: true,
            env: EnvSource::Process,
        }
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables placeholders and overrides.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Reads environment variables from `map` instead of the process.
    pub fn with_env_map(mut self, map: HashMap<String, String>) -> Self {
        self.env = EnvSource::Map(map);
        self
    }

    /// Loads configuration from a file.
    ///
    /// The format is determined by the extension: `.yaml`/`.yml`, `.toml` or
    /// `.json`.
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<SigilConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let base_path = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let content = self.read_file(path)?;
        let format = ConfigFormat::from_path(path)?;

        let content = if self.resolve_env_vars {
            self.resolve_env_placeholders(&content)?
        } else {
            content
        };

        let mut config: SigilConfig = parse_str(&content, format).map_err(|e| match e {
            ConfigError::Serialization { message } => ConfigError::parse(path, message),
            other => other,
        })?;

        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config)?;
        }

        if let Some(secret_file) = config.token.secret_file.as_mut() {
            if secret_file.is_relative() {
                *secret_file = base_path.join(&*secret_file);
            }
        }

        config.validate()?;

        info!("Configuration loaded successfully");
        debug!(
            addr = %config.server.socket_addr(),
            algorithm = %config.token.algorithm,
            bootstrap_roles = config.bootstrap.roles.len(),
            "Configuration summary"
        );

        Ok(config)
    }

    /// Loads configuration from a string.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<SigilConfig> {
        let content = if self.resolve_env_vars {
            self.resolve_env_placeholders(content)?
        } else {
            content.to_string()
        };

        let mut config: SigilConfig = parse_str(&content, format)?;

        if self.resolve_env_vars {
            self.apply_env_overrides(&mut config)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Builds configuration from defaults and environment overrides alone.
    pub fn load_from_env(&self) -> ConfigResult<SigilConfig> {
        let mut config = SigilConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(&self, path: &Path) -> ConfigResult<String> {
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))
    }

    /// Substitutes `${VAR}` and `${VAR:default}` placeholders.
    ///
    /// An unset variable without a default fails with
    /// [`ConfigError::InvalidEnvVar`] naming the variable.
    fn resolve_env_placeholders(&self, content: &str) -> ConfigResult<String> {
        let mut result = String::with_capacity(content.len());
        let mut chars = content.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '$' || chars.peek() != Some(&'{') {
                result.push(c);
                continue;
            }
            chars.next();

            let mut inner = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '}' {
                    closed = true;
                    break;
                }
                inner.push(c);
            }

            if !closed {
                result.push_str("${");
                result.push_str(&inner);
                continue;
            }

            let (name, default) = match inner.split_once(':') {
                Some((name, default)) => (name, Some(default)),
                None => (inner.as_str(), None),
            };

            match (self.env.get(name), default) {
                (Some(value), _) => result.push_str(&value),
                (None, Some(default)) => result.push_str(default),
                (None, None) => {
                    return Err(ConfigError::invalid_env_var(
                        name,
                        "not set and no default given",
                    ));
                }
            }
        }

        Ok(result)
    }

    /// Applies `<prefix>_*` environment overrides.
    fn apply_env_overrides(&self, config: &mut SigilConfig) -> ConfigResult<()> {
        let var = |suffix: &str| format!("{}_{}", self.env_prefix, suffix);

        if let Some(value) = self.env.get(&var("SERVER_HOST")) {
            config.server.host = value.parse().map_err(|_| {
                ConfigError::invalid_env_var(var("SERVER_HOST"), "expected an IP address")
            })?;
        }
        if let Some(value) = self.env.get(&var("SERVER_PORT")) {
            config.server.port = value.parse().map_err(|_| {
                ConfigError::invalid_env_var(var("SERVER_PORT"), "expected valid port number")
            })?;
        }

        if let Some(value) = self.env.get(&var("TOKEN_SECRET")) {
            config.token.secret = Some(SecretValue::new(value));
        }
        if let Some(value) = self.env.get(&var("TOKEN_SECRET_FILE")) {
            config.token.secret_file = Some(PathBuf::from(value));
        }

        if let Some(value) = self.env.get(&var("LOG_LEVEL")) {
            config.logging.level = value
                .parse::<LogLevel>()
                .map_err(|_| ConfigError::invalid_env_var(var("LOG_LEVEL"), "unknown log level"))?;
        }
        if let Some(value) = self.env.get(&var("LOG_FORMAT")) {
            config.logging.format = value
                .parse::<LogFormat>()
                .map_err(|_| ConfigError::invalid_env_var(var("LOG_FORMAT"), "unknown log format"))?;
        }

        if let Some(value) = self.env.get(&var("OPEN_REGISTRATION")) {
            config.access.open_registration = parse_bool(&value);
        }

        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_str<T: DeserializeOwned>(content: &str, format: ConfigFormat) -> ConfigResult<T> {
    match format {
        ConfigFormat::Yaml => yaml_parse(content),
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
    }
}

/// Parses YAML through the `config` crate.
fn yaml_parse<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(content, config::FileFormat::Yaml))
        .build()
        .map_err(|e| ConfigError::serialization(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| ConfigError::serialization(e.to_string()))
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "true" | "1" | "yes" | "on" | "enabled"
    )
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Loads configuration from a file with default settings.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<SigilConfig> {
    ConfigLoader::new().load(path)
}

/// Loads configuration from a string with default settings.
pub fn load_config_str(content: &str, format: ConfigFormat) -> ConfigResult<SigilConfig> {
    ConfigLoader::new().load_from_str(content, format)
}

// =============================================================================
// Tests
// =============================================================================
