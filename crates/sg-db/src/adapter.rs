//! Storage adapter boundary used by the fixture loader

use crate::error::DbResult;
use crate::traits::Database;
use async_trait::async_trait;
use sg_core::{Association, AssociationSource, AttachPayload, EntityHandle, FieldMap, ModelName};

/// Writes fixture rows and their associations to storage.
///
/// Every operation takes the connection explicitly; an adapter holds model
/// metadata only, never a connection.
#[async_trait]
pub trait Adapter: AssociationSource + Send + Sync {
    /// Every model this adapter can write, in name order
    fn models(&self) -> Vec<ModelName>;

    /// Remove every row of the given models, including their join rows
    async fn truncate(&self, db: &dyn Database, models: &[ModelName]) -> DbResult<()>;

    /// Open a transaction on the connection
    async fn begin_transaction(&self, db: &dyn Database) -> DbResult<()>;

    /// Roll back the connection's open transaction
    async fn rollback_transaction(&self, db: &dyn Database) -> DbResult<()>;

    /// Insert one row and return its persisted handle.
    ///
    /// `data` holds only plain columns and belongsTo foreign keys.
    async fn create(
        &self,
        db: &dyn Database,
        model: &ModelName,
        data: &FieldMap,
    ) -> DbResult<EntityHandle>;

    /// Apply a belongsToMany/hasMany/hasOne association of a created row
    async fn associate(
        &self,
        db: &dyn Database,
        base: &EntityHandle,
        association: &Association,
        payload: AttachPayload,
    ) -> DbResult<()>;
}
