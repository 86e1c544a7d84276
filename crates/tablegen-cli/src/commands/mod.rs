pub mod generate;
pub mod inspect;

use std::path::Path;

use anyhow::{Context, Result};

use tablegen_core::config::{read_config, TableGenConfig};
use tablegen_core::schema::introspect::{connect, DatabaseSource};
use tablegen_core::TableGenError;

/// Load `tablegen.toml` from the working directory, if present.
pub fn load_config() -> Result<Option<TableGenConfig>> {
    read_config(Path::new(".")).context("Failed to load tablegen.toml")
}

/// Resolve the database URL: --db flag (or DATABASE_URL), then tablegen.toml.
pub fn resolve_db_url(flag: Option<&str>, config: Option<&TableGenConfig>) -> Result<String> {
    if let Some(url) = flag {
        return Ok(url.to_string());
    }
    if let Some(url) = config.and_then(|c| c.database.url.as_deref()) {
        return Ok(url.to_string());
    }
    Err(TableGenError::NoDatabaseUrl.into())
}

/// Connect using the flag/config precedence for both URL and schema name.
pub async fn open_source(
    db_flag: Option<&str>,
    schema_flag: Option<&str>,
    config: Option<&TableGenConfig>,
) -> Result<DatabaseSource> {
    let db_url = resolve_db_url(db_flag, config)?;
    let schema = schema_flag.or_else(|| config.and_then(|c| c.database.schema.as_deref()));
    let source = connect(&db_url, schema).await?;
    tracing::debug!("Connected to {}", source.database_type());
    Ok(source)
}
