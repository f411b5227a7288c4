//! Database connection configuration.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Connection settings for the target Postgres database.
///
/// Field names are mapped from the keys of the on-disk `config.json` so the
/// file deserializes directly. The struct is passed explicitly to every
/// component that needs a connection; there is no process-wide engine.
#[derive(Clone, Debug, Deserialize)]
pub struct DbConfig {
    #[serde(rename = "PG_HOST")]
    pub host: String,
    #[serde(rename = "PG_PORT")]
    pub port: u16,
    #[serde(rename = "PG_USERNAME")]
    pub username: String,
    #[serde(rename = "PG_PASSWORD")]
    pub password: String,
    #[serde(rename = "PG_DB")]
    pub database: String,
}

impl DbConfig {
    /// Load connection settings from a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_json() {
        let raw = r#"{
            "PG_HOST": "localhost",
            "PG_PORT": 5432,
            "PG_USERNAME": "drugbank",
            "PG_PASSWORD": "secret",
            "PG_DB": "drugbank"
        }"#;
        let config: DbConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert_eq!(config.username, "drugbank");
        assert_eq!(config.password, "secret");
        assert_eq!(config.database, "drugbank");
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let raw = r#"{"PG_HOST": "localhost"}"#;
        assert!(serde_json::from_str::<DbConfig>(raw).is_err());
    }
}
