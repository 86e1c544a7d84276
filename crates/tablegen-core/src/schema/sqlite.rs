use sqlx::sqlite::SqlitePool;
use sqlx::Row;

use crate::error::{Result, TableGenError};
use crate::schema::introspect::SchemaSource;
use crate::schema::types::*;

pub struct SqliteSource {
    pool: SqlitePool,
}

impl SqliteSource {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Quote an identifier for use inside a PRAGMA call.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

impl SchemaSource for SqliteSource {
    async fn list_public_tables(&self) -> Result<Vec<TableRef>> {
        let query = "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name";
        let rows = sqlx::query(query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| TableGenError::Introspection {
                query: "fetch tables".to_string(),
                source: e,
            })?;

        Ok(rows
            .iter()
            .map(|row| TableRef::new(row.get::<String, _>("name")))
            .collect())
    }

    async fn list_columns(&self, table: &str) -> Result<Vec<Column>> {
        let query = format!("PRAGMA table_info({})", quote_ident(table));
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| TableGenError::Introspection {
                query: format!("PRAGMA table_info({})", table),
                source: e,
            })?;

        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row.get("name");
            let type_str: String = row.get("type");
            let notnull: i32 = row.get("notnull");
            columns.push(Column::new(name, type_str, notnull == 0));
        }

        Ok(columns)
    }

    async fn list_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKey>> {
        let query = format!("PRAGMA foreign_key_list({})", quote_ident(table));
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| TableGenError::Introspection {
                query: format!("PRAGMA foreign_key_list({})", table),
                source: e,
            })?;

        // `to` is NULL when the constraint names only the parent table, so
        // only the owning column and the parent table are read.
        Ok(rows
            .iter()
            .map(|row| {
                ForeignKey::new(
                    row.get::<String, _>("from"),
                    row.get::<String, _>("table"),
                )
            })
            .collect())
    }
}
