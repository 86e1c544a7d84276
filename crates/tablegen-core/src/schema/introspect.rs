use crate::error::{redact_url, Result, TableGenError};
use crate::schema::postgres::PostgresSource;
use crate::schema::sqlite::SqliteSource;
use crate::schema::types::{Column, DatabaseType, ForeignKey, TableRef};

/// Read-only view of a database catalog.
///
/// Each backend answers the three questions the generator asks, one table at
/// a time. Results are snapshots valid for a single run.
pub trait SchemaSource: Send + Sync {
    /// List the tables of the configured schema.
    fn list_public_tables(&self) -> impl std::future::Future<Output = Result<Vec<TableRef>>> + Send;

    /// List the columns of `table` in catalog order.
    fn list_columns(
        &self,
        table: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Column>>> + Send;

    /// List the foreign keys owned by `table`.
    fn list_foreign_keys(
        &self,
        table: &str,
    ) -> impl std::future::Future<Output = Result<Vec<ForeignKey>>> + Send;
}

/// Determine the database type from a connection URL.
pub fn database_type_from_url(url: &str) -> Result<DatabaseType> {
    let scheme = url.split(':').next().unwrap_or("");
    match scheme {
        "postgres" | "postgresql" => Ok(DatabaseType::PostgreSQL),
        "sqlite" => Ok(DatabaseType::SQLite),
        other => Err(TableGenError::UnsupportedDatabase {
            scheme: other.to_string(),
        }),
    }
}

/// A live database connection picked from the URL scheme.
pub enum DatabaseSource {
    Postgres(PostgresSource),
    Sqlite(SqliteSource),
}

impl DatabaseSource {
    pub fn database_type(&self) -> DatabaseType {
        match self {
            DatabaseSource::Postgres(_) => DatabaseType::PostgreSQL,
            DatabaseSource::Sqlite(_) => DatabaseType::SQLite,
        }
    }
}

/// Connect to the database behind `url`.
///
/// `schema` only applies to PostgreSQL; SQLite has a single namespace.
pub async fn connect(url: &str, schema: Option<&str>) -> Result<DatabaseSource> {
    match database_type_from_url(url)? {
        DatabaseType::PostgreSQL => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(1)
                .connect(url)
                .await
                .map_err(|e| TableGenError::Connection {
                    message: "Failed to connect to PostgreSQL".to_string(),
                    connection_hint: redact_url(url),
                    source: e,
                })?;
            let source = match schema {
                Some(name) => PostgresSource::with_schema(pool, name.to_string()),
                None => PostgresSource::new(pool),
            };
            Ok(DatabaseSource::Postgres(source))
        }
        DatabaseType::SQLite => {
            let pool = sqlx::sqlite::SqlitePoolOptions::new()
                .max_connections(1)
                .connect(url)
                .await
                .map_err(|e| TableGenError::Connection {
                    message: "Failed to connect to SQLite".to_string(),
                    connection_hint: redact_url(url),
                    source: e,
                })?;
            Ok(DatabaseSource::Sqlite(SqliteSource::new(pool)))
        }
    }
}

impl SchemaSource for DatabaseSource {
    async fn list_public_tables(&self) -> Result<Vec<TableRef>> {
        match self {
            DatabaseSource::Postgres(source) => source.list_public_tables().await,
            DatabaseSource::Sqlite(source) => source.list_public_tables().await,
        }
    }

    async fn list_columns(&self, table: &str) -> Result<Vec<Column>> {
        match self {
            DatabaseSource::Postgres(source) => source.list_columns(table).await,
            DatabaseSource::Sqlite(source) => source.list_columns(table).await,
        }
    }

    async fn list_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKey>> {
        match self {
            DatabaseSource::Postgres(source) => source.list_foreign_keys(table).await,
            DatabaseSource::Sqlite(source) => source.list_foreign_keys(table).await,
        }
    }
}
