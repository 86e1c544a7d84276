//! # Configuration File Parser
//!
//! Reads and parses `tablegen.toml`, the optional configuration file that
//! customizes generation without CLI flags. Supports:
//!
//! - `[database]` — default connection URL and schema name
//! - `[output]` — default output root
//! - `[types]` — SQL type to target type overrides
//! - `[naming]` — extra reserved words that get escaped
//!
//! Example `tablegen.toml`:
//!
//! ```toml
//! [database]
//! url = "postgres://localhost/myapp"
//! schema = "public"
//!
//! [output]
//! dir = "./src/db"
//!
//! [types]
//! jsonb = "Record<string, unknown>"
//! numeric = "string"
//!
//! [naming]
//! reserved = ["order", "index"]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::codegen::naming::is_identifier;
use crate::error::{Result, TableGenError};

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "tablegen.toml";

/// Top-level tablegen.toml structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TableGenConfig {
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Output location settings.
    pub output: OutputConfig,
    /// Type overrides keyed by SQL type name.
    pub types: BTreeMap<String, String>,
    /// Identifier escaping settings.
    pub naming: NamingConfig,

    /// Absolute path to the directory containing tablegen.toml.
    #[serde(skip)]
    pub config_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "postgres://localhost/myapp").
    pub url: Option<String>,
    /// Schema to read tables from (PostgreSQL only, default "public").
    pub schema: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output root; `generated/tables` is created beneath it.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Words escaped in addition to the built-in set.
    pub reserved: Vec<String>,
}

/// Read and parse a tablegen.toml file from the given directory.
///
/// Returns `None` if the file doesn't exist (config is optional).
/// Returns an error if the file exists but can't be parsed or validated.
pub fn read_config(dir: &Path) -> Result<Option<TableGenConfig>> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| TableGenError::Config {
        message: format!("Failed to read {}: {}", path.display(), e),
    })?;

    let mut config: TableGenConfig =
        toml::from_str(&content).map_err(|e| TableGenError::Config {
            message: format!("Failed to parse {}: {}", path.display(), e),
        })?;

    config.config_dir = Some(std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf()));
    config.validate()?;

    Ok(Some(config))
}

impl TableGenConfig {
    /// Validate constraints serde cannot enforce.
    pub fn validate(&self) -> Result<()> {
        for (sql, ts) in &self.types {
            if sql.trim().is_empty() {
                return Err(TableGenError::Config {
                    message: "[types] contains an entry with an empty SQL type name".to_string(),
                });
            }
            if ts.trim().is_empty() {
                return Err(TableGenError::Config {
                    message: format!("[types] entry '{}' maps to an empty type", sql),
                });
            }
        }

        for word in &self.naming.reserved {
            if !is_identifier(word) {
                return Err(TableGenError::Config {
                    message: format!(
                        "[naming] reserved entry '{}' is not a plain identifier",
                        word
                    ),
                });
            }
        }

        Ok(())
    }

    /// Output root relative to the config file, if one is configured.
    pub fn output_dir(&self) -> Option<PathBuf> {
        let dir = self.output.dir.as_ref()?;
        match (&self.config_dir, dir.is_relative()) {
            (Some(base), true) => Some(base.join(dir)),
            _ => Some(dir.clone()),
        }
    }
}
