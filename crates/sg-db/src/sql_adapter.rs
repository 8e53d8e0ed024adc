//! Adapter writing fixtures through plain SQL, driven by a [`Schema`].

use crate::adapter::Adapter;
use crate::error::{DbError, DbResult};
use crate::sql;
use crate::traits::Database;
use async_trait::async_trait;
use serde_json::Value;
use sg_core::{
    Association, AssociationKind, AssociationLookup, AssociationSource, AttachPayload, CoreResult,
    EntityHandle, FieldMap, JoinTable, ModelDef, ModelName, Schema,
};

/// SQL adapter over a schema registry
#[derive(Debug, Clone)]
pub struct SqlAdapter {
    schema: Schema,
}

impl SqlAdapter {
    /// Create an adapter for the given schema
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    /// The schema this adapter writes
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Commit the open transaction.
    ///
    /// The rollback clear strategy leaves a transaction open; a caller that
    /// owns the connection only briefly commits it to keep the loaded rows.
    pub async fn commit_transaction(&self, db: &dyn Database) -> DbResult<()> {
        db.execute_batch("COMMIT").await.map_err(transaction_error)
    }

    fn model_def(&self, model: &str) -> DbResult<&ModelDef> {
        self.schema
            .models
            .get(model)
            .ok_or_else(|| DbError::UnknownModel(model.to_string()))
    }

    /// belongsToMany: one join row per attached entry
    async fn link_through(
        &self,
        db: &dyn Database,
        base: &EntityHandle,
        association: &Association,
        payload: AttachPayload,
    ) -> DbResult<()> {
        let through = association
            .through
            .as_ref()
            .ok_or_else(|| unsupported(association, "no join table declared"))?;

        let entries = match payload {
            AttachPayload::Handles(handles) => handles
                .into_iter()
                .map(|h| {
                    let mut entry = FieldMap::new();
                    entry.insert(through.target_key.clone(), h.id);
                    entry
                })
                .collect(),
            AttachPayload::Structured(value) => join_entries(association, through, value)?,
        };

        for entry in entries {
            let mut columns = vec![through.source_key.as_str()];
            let mut params = vec![base.id.clone()];
            for (column, value) in &entry {
                columns.push(column);
                params.push(value.clone());
            }
            db.execute(&sql::insert(&through.table, &columns), &params)
                .await?;
        }

        log::debug!(
            "Linked {} {} row(s) through {}",
            base.model,
            association.name,
            through.table
        );
        Ok(())
    }

    /// hasMany/hasOne: point the targets' foreign key at the base row
    async fn set_foreign_key(
        &self,
        db: &dyn Database,
        base: &EntityHandle,
        association: &Association,
        payload: AttachPayload,
    ) -> DbResult<()> {
        let foreign_key = association
            .foreign_key
            .as_deref()
            .ok_or_else(|| unsupported(association, "no foreign_key declared"))?;
        let target = self.model_def(&association.target)?;

        let ids: Vec<Value> = match payload {
            AttachPayload::Handles(handles) => handles.into_iter().map(|h| h.id).collect(),
            AttachPayload::Structured(Value::Array(items)) => items,
            AttachPayload::Structured(value) => vec![value],
        };
        if ids.iter().any(|id| id.is_object() || id.is_array()) {
            return Err(unsupported(association, "targets must be plain row references"));
        }
        if association.kind == AssociationKind::HasOne && ids.len() > 1 {
            return Err(unsupported(association, "hasOne takes a single row"));
        }
        if ids.is_empty() {
            return Ok(());
        }

        let sql = sql::update_where_in(&target.table, foreign_key, &target.primary_key, ids.len());
        let mut params = Vec::with_capacity(ids.len() + 1);
        params.push(base.id.clone());
        params.extend(ids);
        db.execute(&sql, &params).await?;
        Ok(())
    }
}

fn unsupported(association: &Association, reason: &str) -> DbError {
    DbError::UnsupportedAssociation {
        association: association.name.clone(),
        reason: reason.to_string(),
    }
}

fn transaction_error(err: DbError) -> DbError {
    match err {
        DbError::ExecutionError(msg) => DbError::TransactionError(msg),
        other => other,
    }
}

/// Join rows for a structured belongsToMany payload.
///
/// An object entry names the attached row under `target_key` (or `id`);
/// its other keys are extra join-table columns. Any other entry is the
/// attached row's id itself.
fn join_entries(
    association: &Association,
    through: &JoinTable,
    value: Value,
) -> DbResult<Vec<FieldMap>> {
    let items = match value {
        Value::Array(items) => items,
        other => vec![other],
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(mut entry) => {
                let id = entry
                    .remove(&through.target_key)
                    .or_else(|| entry.remove("id"))
                    .ok_or_else(|| {
                        unsupported(
                            association,
                            &format!("entry has neither '{}' nor 'id'", through.target_key),
                        )
                    })?;
                entry.insert(through.target_key.clone(), id);
                Ok(entry)
            }
            id => {
                let mut entry = FieldMap::new();
                entry.insert(through.target_key.clone(), id);
                Ok(entry)
            }
        })
        .collect()
}

impl AssociationSource for SqlAdapter {
    fn associations(&self, model: &ModelName) -> CoreResult<&dyn AssociationLookup> {
        self.schema.associations(model)
    }
}

#[async_trait]
impl Adapter for SqlAdapter {
    fn models(&self) -> Vec<ModelName> {
        self.schema.model_names()
    }

    async fn truncate(&self, db: &dyn Database, models: &[ModelName]) -> DbResult<()> {
        let mut tables: Vec<String> = Vec::new();
        for model in models {
            for table in self.model_def(model)?.tables() {
                if !tables.contains(&table) {
                    tables.push(table);
                }
            }
        }
        if tables.is_empty() {
            return Ok(());
        }

        log::debug!("Truncating {}", tables.join(", "));
        db.execute_batch(&sql::delete_all(&tables)).await
    }

    async fn begin_transaction(&self, db: &dyn Database) -> DbResult<()> {
        db.execute_batch("BEGIN TRANSACTION")
            .await
            .map_err(transaction_error)
    }

    async fn rollback_transaction(&self, db: &dyn Database) -> DbResult<()> {
        db.execute_batch("ROLLBACK").await.map_err(transaction_error)
    }

    async fn create(
        &self,
        db: &dyn Database,
        model: &ModelName,
        data: &FieldMap,
    ) -> DbResult<EntityHandle> {
        let def = self.model_def(model)?;
        let columns: Vec<&str> = data.keys().map(String::as_str).collect();
        let params: Vec<Value> = data.values().cloned().collect();

        let missing_identity = || DbError::MissingIdentity {
            table: def.table.clone(),
            column: def.primary_key.clone(),
        };
        let row = db
            .query_rows(&sql::insert_returning(&def.table, &columns), &params)
            .await?
            .into_iter()
            .next()
            .ok_or_else(missing_identity)?;
        let id = match row.get(&def.primary_key) {
            Some(id) if !id.is_null() => id.clone(),
            _ => return Err(missing_identity()),
        };

        Ok(EntityHandle::new(model.clone(), id, row))
    }

    async fn associate(
        &self,
        db: &dyn Database,
        base: &EntityHandle,
        association: &Association,
        payload: AttachPayload,
    ) -> DbResult<()> {
        match association.kind {
            AssociationKind::BelongsToMany => {
                self.link_through(db, base, association, payload).await
            }
            AssociationKind::HasMany | AssociationKind::HasOne => {
                self.set_foreign_key(db, base, association, payload).await
            }
            AssociationKind::BelongsTo => Err(unsupported(
                association,
                "belongsTo is written as a column before insert",
            )),
            AssociationKind::Unknown(ref kind) => Err(unsupported(
                association,
                &format!("unknown association kind '{}'", kind),
            )),
        }
    }
}

#[cfg(test)]
#[path = "sql_adapter_test.rs"]
mod tests;
