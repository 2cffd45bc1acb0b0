//! Project configuration and database URL resolution

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const CONFIG_FILE: &str = "config.toml";
const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Subset of a RustF `config.toml` needed for generation
#[derive(Debug, Default, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    #[serde(default)]
    pub connections: HashMap<String, ConnectionConfig>,
}

#[derive(Debug, Deserialize)]
pub struct ConnectionConfig {
    pub url: String,
}

impl ProjectConfig {
    /// Load `<project>/config.toml`, or an empty config when the file is absent
    pub fn load(project_path: &Path) -> Result<Self> {
        let config_file = project_path.join(CONFIG_FILE);
        if !config_file.exists() {
            log::debug!("No {} in {}", CONFIG_FILE, project_path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_file)
            .with_context(|| format!("Failed to read {}", config_file.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid {}", config_file.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Pick the database URL for this run
///
/// Order: explicit URL, named connection from config, `DATABASE_URL`,
/// then `[database] url` from config.
pub fn resolve_database_url(
    explicit: Option<&str>,
    connection: Option<&str>,
    config: &ProjectConfig,
    env_url: Option<String>,
) -> Result<String> {
    if let Some(url) = explicit.filter(|u| !u.trim().is_empty()) {
        return Ok(url.trim().to_string());
    }

    if let Some(name) = connection {
        match config.database.connections.get(name) {
            Some(conn) => return Ok(conn.url.clone()),
            None => log::warn!(
                "Connection '{}' is not configured in {}, falling back",
                name,
                CONFIG_FILE
            ),
        }
    }

    env_url
        .filter(|u| !u.trim().is_empty())
        .or_else(|| config.database.url.clone())
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "No database URL found. Pass --database-url, set {} or configure [database] in {}",
                DATABASE_URL_ENV,
                CONFIG_FILE
            )
        })
}

/// `DATABASE_URL` from the environment
pub fn env_database_url() -> Option<String> {
    std::env::var(DATABASE_URL_ENV).ok()
}

/// Hide the password of a database URL for display
pub fn redact_url(database_url: &str) -> String {
    match url::Url::parse(database_url) {
        Ok(mut parsed) if parsed.password().is_some() => {
            if parsed.set_password(Some("****")).is_err() {
                return database_url.to_string();
            }
            parsed.to_string()
        }
        _ => database_url.to_string(),
    }
}
