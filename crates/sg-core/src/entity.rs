//! Handles to persisted rows.

use crate::names::ModelName;
use crate::value::FieldMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A row as it exists after insert.
///
/// The engine never interprets `id`; it only copies it into foreign keys
/// and attach payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityHandle {
    /// Model the row belongs to
    pub model: ModelName,

    /// Opaque identity value
    pub id: Value,

    /// Persisted column values, including the id and any foreign keys
    #[serde(default)]
    pub row: FieldMap,
}

impl EntityHandle {
    /// Create a handle from a persisted row and its identity
    pub fn new(model: ModelName, id: Value, row: FieldMap) -> Self {
        Self { model, id, row }
    }

    /// Identity value used for foreign keys and join rows
    pub fn identity(&self) -> &Value {
        &self.id
    }

    /// Persisted value of a column, if present
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.row.get(column)
    }
}
