//! Configuration management for nsq-auth-vault
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//! The resulting [`Config`] is built once at startup and never mutated
//! afterwards.

use crate::cli::Cli;
use crate::error::{NsqAuthError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for nsq-auth-vault
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Vault backend settings
    #[serde(default)]
    pub vault: VaultConfig,
    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host or IP address to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to bind
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string handed to the TCP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Vault backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Vault address; a missing scheme means `http://`
    #[serde(default = "default_vault_address")]
    pub address: String,

    /// Timeout for a single lookup-self call (seconds)
    #[serde(default = "default_vault_timeout")]
    pub timeout_seconds: u64,
}

fn default_vault_address() -> String {
    "localhost:8200".to_string()
}

fn default_vault_timeout() -> u64 {
    30
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            address: default_vault_address(),
            timeout_seconds: default_vault_timeout(),
        }
    }
}

/// Log output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "nsq_auth_vault=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Config {
    /// Load configuration with environment and CLI overrides
    ///
    /// Precedence from lowest to highest: built-in defaults, the YAML file
    /// named by `cli.config`, `NSQ_AUTH_VAULT_*` environment variables, CLI
    /// flags.
    ///
    /// # Errors
    ///
    /// Returns error if the named file cannot be read or parsed, or if a
    /// numeric environment variable does not parse
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_env_vars()?;
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(NsqAuthError::from)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_yaml::from_str(&contents)
            .map_err(NsqAuthError::from)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    fn apply_env_vars(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("NSQ_AUTH_VAULT_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("NSQ_AUTH_VAULT_PORT") {
            self.server.port = port.parse::<u16>().map_err(|e| {
                NsqAuthError::Config(format!("Invalid NSQ_AUTH_VAULT_PORT {:?}: {}", port, e))
            })?;
        }

        if let Ok(address) = std::env::var("NSQ_AUTH_VAULT_ADDR") {
            self.vault.address = address;
        }

        if let Ok(timeout) = std::env::var("NSQ_AUTH_VAULT_TIMEOUT_SECONDS") {
            self.vault.timeout_seconds = timeout.parse::<u64>().map_err(|e| {
                NsqAuthError::Config(format!(
                    "Invalid NSQ_AUTH_VAULT_TIMEOUT_SECONDS {:?}: {}",
                    timeout, e
                ))
            })?;
        }

        Ok(())
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(vault) = &cli.vault {
            self.vault.address = vault.clone();
        }
        if let Some(timeout) = cli.vault_timeout {
            self.vault.timeout_seconds = timeout;
        }
        if cli.json_logs {
            self.logging.json = true;
        }
        if cli.verbose {
            self.logging.level = "nsq_auth_vault=debug".to_string();
        }
    }

    /// Validate the configuration
    ///
    /// The Vault address is not checked here; a malformed address is
    /// reported per request as `500`.
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            return Err(NsqAuthError::Config("server.host cannot be empty".to_string()).into());
        }

        if self.vault.address.is_empty() {
            return Err(NsqAuthError::Config("vault.address cannot be empty".to_string()).into());
        }

        if self.vault.timeout_seconds == 0 {
            return Err(NsqAuthError::Config(
                "vault.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
