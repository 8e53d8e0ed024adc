//! sg-db - Storage boundary for Seedgraph
//!
//! This crate provides the connection-level `Database` trait with a DuckDB
//! implementation, and the `Adapter` trait the loader writes fixtures
//! through, with a schema-driven SQL implementation.

pub mod adapter;
pub mod duckdb;
pub mod error;
pub mod sql;
pub mod sql_adapter;
pub mod traits;

pub use adapter::Adapter;
pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use sql_adapter::SqlAdapter;
pub use traits::Database;
