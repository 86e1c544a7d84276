pub mod introspect;
pub mod memory;
pub mod postgres;
pub mod sqlite;
pub mod types;
