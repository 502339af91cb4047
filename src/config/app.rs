//! Application configuration loading from config.toml
//!
//! This module provides the application settings: database location, HTTP
//! bind address, the configured rent minimum, the upload directory backing
//! the blob store, and an optional bootstrap owner seeded on first run.
//! Every field has a sensible default so a missing config.toml still yields
//! a runnable configuration; `DATABASE_URL` and `KOSHUB_BIND_ADDR`
//! environment variables override the file.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// SQLite connection string
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Lowest monthly rent a room may be created with, in whole rupiah
    #[serde(default = "default_min_monthly_rent")]
    pub min_monthly_rent: i64,
    /// Directory uploaded images are written to
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    /// URL prefix under which uploaded images are served back
    #[serde(default = "default_upload_base_url")]
    pub upload_base_url: String,
    /// Owner account registered on first run if no users exist yet
    #[serde(default)]
    pub bootstrap: Option<BootstrapOwner>,
}

/// Owner account seeded when the database is empty
#[derive(Debug, Clone, Deserialize)]
pub struct BootstrapOwner {
    /// Login email for the owner account
    pub email: String,
    /// Display name of the boarding house
    pub name: String,
    /// Street address of the property
    pub address: String,
    /// Contact phone number
    pub phone: String,
}

fn default_database_url() -> String {
    "sqlite://koshub.sqlite?mode=rwc".to_string()
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".to_string()
}

const fn default_min_monthly_rent() -> i64 {
    // 100k rupiah, the floor the room form has always enforced
    100_000
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_upload_base_url() -> String {
    "/files".to_string()
}

/// Loads application configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the application configuration from ./config.toml if present,
/// falling back to defaults, then applies environment overrides.
pub fn load_app_configuration() -> Result<AppConfig> {
    let mut config = if Path::new("config.toml").exists() {
        load_config("config.toml")?
    } else {
        // An empty document deserializes to all defaults
        toml::from_str("").map_err(|e| Error::Config {
            message: format!("Failed to build default configuration: {e}"),
        })?
    };

    if let Ok(url) = std::env::var("DATABASE_URL") {
        config.database_url = url;
    }
    if let Ok(addr) = std::env::var("KOSHUB_BIND_ADDR") {
        config.bind_addr = addr;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            database_url = "sqlite::memory:"
            bind_addr = "0.0.0.0:3000"
            min_monthly_rent = 250000
            upload_dir = "/tmp/uploads"

            [bootstrap]
            email = "owner@example.com"
            name = "Kos Melati"
            address = "Jl. Melati No. 5"
            phone = "081234567890"
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.min_monthly_rent, 250_000);
        assert_eq!(config.upload_dir, "/tmp/uploads");

        let bootstrap = config.bootstrap.unwrap();
        assert_eq!(bootstrap.email, "owner@example.com");
        assert_eq!(bootstrap.name, "Kos Melati");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.min_monthly_rent, 100_000);
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.upload_base_url, "/files");
        assert!(config.bootstrap.is_none());
    }
}
