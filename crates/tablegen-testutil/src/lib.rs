use std::collections::BTreeMap;
use std::path::Path;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tablegen_core::schema::memory::MemorySource;
use tablegen_core::schema::types::Column;

/// The two-table blog schema: `posts.user_id -> users`.
pub fn blog_source() -> MemorySource {
    MemorySource::new()
        .table(
            "users",
            vec![
                Column::new("id", "integer", false),
                Column::new("name", "character varying", true),
            ],
        )
        .table(
            "posts",
            vec![
                Column::new("id", "integer", false),
                Column::new("title", "text", true),
                Column::new("user_id", "integer", false),
            ],
        )
        .foreign_key("posts", "user_id", "users")
}

/// A shop schema with fan-in, fan-out, a self reference and two foreign
/// keys from one table to the same parent.
pub fn ecommerce_source() -> MemorySource {
    MemorySource::new()
        .table(
            "users",
            vec![
                Column::new("id", "integer", false),
                Column::new("email", "character varying", false),
                Column::new("created_at", "timestamp with time zone", false),
            ],
        )
        .table(
            "categories",
            vec![
                Column::new("id", "integer", false),
                Column::new("name", "text", false),
                Column::new("parent_id", "integer", true),
            ],
        )
        .table(
            "products",
            vec![
                Column::new("id", "integer", false),
                Column::new("category_id", "integer", false),
                Column::new("price", "numeric", false),
                Column::new("tags", "text[]", true),
                Column::new("attributes", "jsonb", true),
            ],
        )
        .table(
            "orders",
            vec![
                Column::new("id", "integer", false),
                Column::new("user_id", "integer", false),
                Column::new("referrer_id", "integer", true),
                Column::new("status", "USER-DEFINED", false),
            ],
        )
        .table(
            "order_items",
            vec![
                Column::new("id", "integer", false),
                Column::new("order_id", "integer", false),
                Column::new("product_id", "integer", false),
                Column::new("quantity", "smallint", false),
            ],
        )
        .foreign_key("categories", "parent_id", "categories")
        .foreign_key("products", "category_id", "categories")
        .foreign_key("orders", "user_id", "users")
        .foreign_key("orders", "referrer_id", "users")
        .foreign_key("order_items", "order_id", "orders")
        .foreign_key("order_items", "product_id", "products")
}

/// Tables and columns named after reserved words.
pub fn reserved_words_source() -> MemorySource {
    MemorySource::new()
        .table(
            "class",
            vec![
                Column::new("id", "integer", false),
                Column::new("default", "boolean", true),
            ],
        )
        .table(
            "students",
            vec![
                Column::new("id", "integer", false),
                Column::new("class_id", "integer", false),
                Column::new("type", "text", true),
            ],
        )
        .foreign_key("students", "class_id", "class")
}

/// `employees.manager_id -> employees`.
pub fn self_referential_source() -> MemorySource {
    MemorySource::new()
        .table(
            "employees",
            vec![
                Column::new("id", "integer", false),
                Column::new("manager_id", "integer", true),
            ],
        )
        .foreign_key("employees", "manager_id", "employees")
}

/// `posts.user_id -> users`, where `users` is not a listed table.
pub fn dangling_reference_source() -> MemorySource {
    MemorySource::new()
        .table(
            "posts",
            vec![
                Column::new("id", "integer", false),
                Column::new("user_id", "integer", false),
            ],
        )
        .foreign_key("posts", "user_id", "users")
}

/// Table and column names that are not plain identifiers:
/// `order-items.order_id -> orders` and `order-items.line_id -> line-items`,
/// where `line-items` is not a listed table.
pub fn unusual_names_source() -> MemorySource {
    MemorySource::new()
        .table("orders", vec![Column::new("id", "integer", false)])
        .table(
            "order-items",
            vec![
                Column::new("id", "integer", false),
                Column::new("order_id", "integer", false),
                Column::new("line_id", "integer", true),
                Column::new("first name", "text", true),
            ],
        )
        .foreign_key("order-items", "order_id", "orders")
        .foreign_key("order-items", "line_id", "line-items")
}

/// DDL for the blog schema in SQLite.
pub const SQLITE_BLOG_DDL: &[&str] = &[
    "CREATE TABLE users (id INTEGER PRIMARY KEY NOT NULL, name TEXT, email VARCHAR(255) NOT NULL)",
    "CREATE TABLE posts (id INTEGER PRIMARY KEY NOT NULL, title TEXT NOT NULL, body TEXT, user_id INTEGER NOT NULL REFERENCES users(id))",
    "CREATE TABLE comments (id INTEGER PRIMARY KEY NOT NULL, post_id INTEGER NOT NULL REFERENCES posts(id), parent_id INTEGER REFERENCES comments, created_at DATETIME)",
];

/// An in-memory SQLite database with `statements` applied.
pub async fn sqlite_pool(statements: &[&str]) -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    for statement in statements {
        sqlx::query(statement).execute(&pool).await?;
    }
    Ok(pool)
}

/// Every file in `dir`, keyed by file name.
pub fn snapshot_dir(dir: &Path) -> BTreeMap<String, String> {
    let mut files = BTreeMap::new();
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return files,
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        files.insert(name, content);
    }
    files
}
