pub mod codegen;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod schema;

// Re-export key types for convenience
pub use error::{Result, TableGenError};
pub use pipeline::{generate_types, GenerateOptions, GenerationReport};
pub use schema::introspect::SchemaSource;
pub use schema::types::{Column, DatabaseType, ForeignKey, TableRef};
