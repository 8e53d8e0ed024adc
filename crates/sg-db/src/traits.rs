//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;
use serde_json::Value;
use sg_core::FieldMap;

/// Connection-level database abstraction.
///
/// One value is one connection: transaction statements issued through it
/// apply to every later statement on the same value.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute a statement with bound parameters, returns affected rows
    async fn execute(&self, sql: &str, params: &[Value]) -> DbResult<usize>;

    /// Execute one or more parameterless statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Run a query (or `... RETURNING`) and return every row by column name
    async fn query_rows(&self, sql: &str, params: &[Value]) -> DbResult<Vec<FieldMap>>;

    /// Count the rows a query returns
    async fn query_count(&self, sql: &str) -> DbResult<usize>;

    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
