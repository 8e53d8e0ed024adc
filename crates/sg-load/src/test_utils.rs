//! Shared test utilities for sg-load
//!
//! [`RecordingAdapter`] keeps every write in memory so loader behavior can
//! be asserted without a database.

use crate::fixtures::{Fixtures, LoaderOptions};
use async_trait::async_trait;
use serde_json::{json, Value};
use sg_core::{
    Association, AssociationLookup, AssociationSource, AttachPayload, CoreResult, EntityHandle,
    FieldMap, ModelName, Schema,
};
use sg_db::{Adapter, Database, DbError, DbResult};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

/// One insert seen by the adapter
#[derive(Debug, Clone, PartialEq)]
pub struct CreateCall {
    pub model: ModelName,
    pub data: FieldMap,
}

/// One attach/set call seen by the adapter
#[derive(Debug, Clone, PartialEq)]
pub struct AssociateCall {
    pub base: EntityHandle,
    pub association: String,
    pub payload: AttachPayload,
}

/// Storage-level calls made by the clear strategies
#[derive(Debug, Clone, PartialEq)]
pub enum StorageCall {
    Truncate(Vec<ModelName>),
    Begin,
    Rollback,
}

#[derive(Default)]
struct Recorded {
    next_ids: HashMap<ModelName, i64>,
    creates: Vec<CreateCall>,
    associates: Vec<AssociateCall>,
    storage: Vec<StorageCall>,
    in_transaction: bool,
}

/// In-memory adapter over a schema that records every call.
///
/// Ids are assigned per model starting at 1. Rollback with no open
/// transaction fails, like a real connection.
pub struct RecordingAdapter {
    schema: Schema,
    failing_creates: HashSet<ModelName>,
    failing_truncates: HashSet<ModelName>,
    recorded: Mutex<Recorded>,
}

impl RecordingAdapter {
    /// Create an adapter over a schema
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            failing_creates: HashSet::new(),
            failing_truncates: HashSet::new(),
            recorded: Mutex::new(Recorded::default()),
        }
    }

    /// Create an adapter from schema YAML
    pub fn from_yaml(yaml: &str) -> Self {
        Self::new(Schema::from_yaml_str(yaml).expect("test schema should parse"))
    }

    /// Make every insert into `model` fail
    pub fn fail_creates_for(mut self, model: &str) -> Self {
        self.failing_creates.insert(ModelName::new(model));
        self
    }

    /// Make every truncate touching `model` fail
    pub fn fail_truncates_for(mut self, model: &str) -> Self {
        self.failing_truncates.insert(ModelName::new(model));
        self
    }

    fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().expect("recording adapter mutex poisoned")
    }

    /// Inserts, in call order
    pub fn creates(&self) -> Vec<CreateCall> {
        self.recorded().creates.clone()
    }

    /// Inserts into one model, in call order
    pub fn creates_for(&self, model: &str) -> Vec<CreateCall> {
        self.creates()
            .into_iter()
            .filter(|c| c.model == model)
            .collect()
    }

    /// Attach/set calls, in call order
    pub fn associates(&self) -> Vec<AssociateCall> {
        self.recorded().associates.clone()
    }

    /// Truncate/begin/rollback calls, in call order
    pub fn storage_calls(&self) -> Vec<StorageCall> {
        self.recorded().storage.clone()
    }

    /// Whether a transaction is open
    pub fn in_transaction(&self) -> bool {
        self.recorded().in_transaction
    }
}

impl AssociationSource for RecordingAdapter {
    fn associations(&self, model: &ModelName) -> CoreResult<&dyn AssociationLookup> {
        self.schema.associations(model)
    }
}

#[async_trait]
impl Adapter for RecordingAdapter {
    fn models(&self) -> Vec<ModelName> {
        self.schema.model_names()
    }

    async fn truncate(&self, _db: &dyn Database, models: &[ModelName]) -> DbResult<()> {
        self.recorded()
            .storage
            .push(StorageCall::Truncate(models.to_vec()));
        match models.iter().find(|m| self.failing_truncates.contains(*m)) {
            Some(model) => Err(DbError::ExecutionError(format!(
                "truncate of {} refused",
                model
            ))),
            None => Ok(()),
        }
    }

    async fn begin_transaction(&self, _db: &dyn Database) -> DbResult<()> {
        let mut recorded = self.recorded();
        recorded.storage.push(StorageCall::Begin);
        recorded.in_transaction = true;
        Ok(())
    }

    async fn rollback_transaction(&self, _db: &dyn Database) -> DbResult<()> {
        let mut recorded = self.recorded();
        recorded.storage.push(StorageCall::Rollback);
        if !recorded.in_transaction {
            return Err(DbError::TransactionError(
                "cannot rollback - no transaction is active".to_string(),
            ));
        }
        recorded.in_transaction = false;
        Ok(())
    }

    async fn create(
        &self,
        _db: &dyn Database,
        model: &ModelName,
        data: &FieldMap,
    ) -> DbResult<EntityHandle> {
        if self.schema.model(model).is_err() {
            return Err(DbError::UnknownModel(model.to_string()));
        }
        if self.failing_creates.contains(model) {
            return Err(DbError::ExecutionError(format!("insert into {} refused", model)));
        }

        let mut recorded = self.recorded();
        recorded.creates.push(CreateCall {
            model: model.clone(),
            data: data.clone(),
        });
        let next = recorded.next_ids.entry(model.clone()).or_insert(0);
        *next += 1;

        let id = json!(*next);
        let mut row = data.clone();
        row.insert("id".to_string(), id.clone());
        Ok(EntityHandle::new(model.clone(), id, row))
    }

    async fn associate(
        &self,
        _db: &dyn Database,
        base: &EntityHandle,
        association: &Association,
        payload: AttachPayload,
    ) -> DbResult<()> {
        self.recorded().associates.push(AssociateCall {
            base: base.clone(),
            association: association.name.clone(),
            payload,
        });
        Ok(())
    }
}

/// Database that accepts every statement and returns nothing
pub struct NullDatabase;

#[async_trait]
impl Database for NullDatabase {
    async fn execute(&self, _sql: &str, _params: &[Value]) -> DbResult<usize> {
        Ok(0)
    }

    async fn execute_batch(&self, _sql: &str) -> DbResult<()> {
        Ok(())
    }

    async fn query_rows(&self, _sql: &str, _params: &[Value]) -> DbResult<Vec<FieldMap>> {
        Ok(Vec::new())
    }

    async fn query_count(&self, _sql: &str) -> DbResult<usize> {
        Ok(0)
    }

    async fn relation_exists(&self, _name: &str) -> DbResult<bool> {
        Ok(false)
    }

    fn db_type(&self) -> &'static str {
        "null"
    }
}

/// Loader over a recording adapter, returning the adapter for assertions
pub fn recording_fixtures(
    adapter: RecordingAdapter,
    options: LoaderOptions,
) -> (Fixtures<RecordingAdapter>, Arc<RecordingAdapter>) {
    let adapter = Arc::new(adapter);
    let fixtures = Fixtures::with_options(Arc::clone(&adapter), Arc::new(NullDatabase), options);
    (fixtures, adapter)
}

/// Catalog schema used across the loader tests
pub const CATALOG_SCHEMA: &str = r#"
models:
  Supplier:
    table: supplier
    associations:
      - name: catalogs
        kind: hasMany
        target: Catalog
        foreign_key: supplier_id
      - name: flagship
        kind: hasOne
        target: Catalog
        foreign_key: supplier_id
  Manufacturer:
    table: manufacturer
  Group:
    table: drink_group
  Tag:
    table: tag
  Catalog:
    table: catalog
    associations:
      - name: supplier
        kind: belongsTo
        target: Supplier
        foreign_key: supplier_id
      - name: manufacturer
        alias: maker
        kind: belongsTo
        target: Manufacturer
        foreign_key: manufacturer_id
      - name: parent
        kind: belongsTo
        target: Catalog
        foreign_key: parent_id
      - name: groups
        kind: belongsToMany
        target: Group
        through:
          table: catalog_group
          source_key: catalog_id
          target_key: group_id
      - name: tags
        kind: belongsToMany
        target: Tag
        through:
          table: catalog_tag
          source_key: catalog_id
          target_key: tag_id
      - name: wrapper
        kind: morphTo
        target: Group
"#;
