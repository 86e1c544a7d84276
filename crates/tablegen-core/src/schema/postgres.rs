use sqlx::postgres::PgPool;
use sqlx::Row;

use crate::error::{Result, TableGenError};
use crate::schema::introspect::SchemaSource;
use crate::schema::types::*;

pub struct PostgresSource {
    pool: PgPool,
    schema_name: String,
}

impl PostgresSource {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            schema_name: "public".to_string(),
        }
    }

    pub fn with_schema(pool: PgPool, schema_name: String) -> Self {
        Self { pool, schema_name }
    }
}

impl SchemaSource for PostgresSource {
    async fn list_public_tables(&self) -> Result<Vec<TableRef>> {
        let query = "SELECT tablename::text AS tablename FROM pg_catalog.pg_tables WHERE schemaname = $1 ORDER BY tablename";
        let rows = sqlx::query(query)
            .bind(&self.schema_name)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| TableGenError::Introspection {
                query: "fetch tables".to_string(),
                source: e,
            })?;

        Ok(rows
            .iter()
            .map(|row| TableRef::new(row.get::<String, _>("tablename")))
            .collect())
    }

    async fn list_columns(&self, table: &str) -> Result<Vec<Column>> {
        let query = r#"
            SELECT
                c.column_name::text AS column_name,
                c.data_type::text AS data_type,
                c.udt_name::text AS udt_name,
                c.is_nullable::text AS is_nullable
            FROM information_schema.columns c
            WHERE c.table_schema = $1
                AND c.table_name = $2
            ORDER BY c.ordinal_position
        "#;

        let rows = sqlx::query(query)
            .bind(&self.schema_name)
            .bind(table)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| TableGenError::Introspection {
                query: format!("fetch columns of {}", table),
                source: e,
            })?;

        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            let column_name: String = row.get("column_name");
            let data_type: String = row.get("data_type");
            let udt_name: String = row.get("udt_name");
            let is_nullable: String = row.get("is_nullable");

            // PostgreSQL arrays: data_type is "ARRAY", udt_name is the element
            // type with a leading underscore.
            let sql_type = if data_type == "ARRAY" {
                let element = udt_name.strip_prefix('_').unwrap_or(&udt_name);
                format!("{}[]", element)
            } else {
                data_type
            };

            columns.push(Column::new(column_name, sql_type, is_nullable == "YES"));
        }

        Ok(columns)
    }

    async fn list_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKey>> {
        let query = r#"
            SELECT
                kcu.column_name::text AS column_name,
                ccu.table_name::text AS foreign_table
            FROM information_schema.table_constraints tc
            JOIN information_schema.key_column_usage kcu
                ON tc.constraint_name = kcu.constraint_name
                AND tc.table_schema = kcu.table_schema
            JOIN information_schema.constraint_column_usage ccu
                ON tc.constraint_name = ccu.constraint_name
                AND tc.table_schema = ccu.table_schema
            WHERE tc.table_schema = $1
                AND tc.table_name = $2
                AND tc.constraint_type = 'FOREIGN KEY'
            ORDER BY tc.constraint_name, kcu.ordinal_position
        "#;

        let rows = sqlx::query(query)
            .bind(&self.schema_name)
            .bind(table)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| TableGenError::Introspection {
                query: format!("fetch foreign keys of {}", table),
                source: e,
            })?;

        Ok(rows
            .iter()
            .map(|row| {
                ForeignKey::new(
                    row.get::<String, _>("column_name"),
                    row.get::<String, _>("foreign_table"),
                )
            })
            .collect())
    }
}
