//! Configuration management
//!
//! This module handles loading and parsing configuration for startuporg.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Admin access configuration
    #[serde(default)]
    pub admin: AdminConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin for the admin frontend
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path or `:memory:`
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/startuporg.db".to_string()
}

/// Admin access configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Bearer token required on all /admin routes
    #[serde(default = "default_admin_token")]
    pub token: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            token: default_admin_token(),
        }
    }
}

fn default_admin_token() -> String {
    "change-me".to_string()
}

impl Config {
    /// Load configuration from a YAML file, falling back to defaults when the
    /// file does not exist, then apply environment variable overrides.
    ///
    /// Recognized environment variables:
    /// - `STARTUPORG_HOST`, `STARTUPORG_PORT`
    /// - `STARTUPORG_DATABASE_URL`
    /// - `STARTUPORG_ADMIN_TOKEN`
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_yaml::from_str(&raw)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Config::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("STARTUPORG_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("STARTUPORG_PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("Invalid STARTUPORG_PORT value: {}", port))?;
        }
        if let Ok(url) = std::env::var("STARTUPORG_DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(token) = std::env::var("STARTUPORG_ADMIN_TOKEN") {
            self.admin.token = token;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url, "data/startuporg.db");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = Config::load(Path::new("does/not/exist.yml")).expect("load should succeed");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = "server:\n  port: 9000\n";
        let config: Config = serde_yaml::from_str(yaml).expect("parse should succeed");
        assert_eq!(config.server.port, 9000);
        // Unspecified sections fall back to defaults
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.url, "data/startuporg.db");
    }
}
