//! In-process schema source.
//!
//! Holds a catalog built in code. Foreign keys may reference tables the
//! source never lists, which is how a dangling reference is reproduced
//! without a database.

use indexmap::IndexMap;

use crate::error::Result;
use crate::schema::introspect::SchemaSource;
use crate::schema::types::{Column, ForeignKey, TableRef};

#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: IndexMap<String, Vec<Column>>,
    foreign_keys: IndexMap<String, Vec<ForeignKey>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table. Listing order follows insertion order.
    pub fn table(mut self, name: &str, columns: Vec<Column>) -> Self {
        self.tables.insert(name.to_string(), columns);
        self
    }

    /// Add a foreign key `owner.column -> referenced`.
    pub fn foreign_key(mut self, owner: &str, column: &str, referenced: &str) -> Self {
        self.foreign_keys
            .entry(owner.to_string())
            .or_default()
            .push(ForeignKey::new(column, referenced));
        self
    }
}

impl SchemaSource for MemorySource {
    async fn list_public_tables(&self) -> Result<Vec<TableRef>> {
        Ok(self.tables.keys().map(TableRef::new).collect())
    }

    async fn list_columns(&self, table: &str) -> Result<Vec<Column>> {
        Ok(self.tables.get(table).cloned().unwrap_or_default())
    }

    async fn list_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKey>> {
        Ok(self.foreign_keys.get(table).cloned().unwrap_or_default())
    }
}
