//! Two-phase creation of one fixture row.
//!
//! Phase A writes belongsTo foreign keys into the row's data, then the row
//! is inserted. Phase B applies belongsToMany/hasMany/hasOne associations
//! against the inserted row, concurrently with each other.

use crate::error::TaskError;
use crate::resolver::TaskStarter;
use crate::results::{PendingResults, SharedHandle, TaskOutcome};
use futures::future::{self, FutureExt};
use serde_json::Value;
use sg_core::{
    AssociationDescriptor, AssociationKind, AttachPayload, EntityHandle, FieldMap, ModelName,
    RowName, Task,
};
use sg_db::{Adapter, Database};
use std::collections::HashMap;
use std::sync::Arc;

/// Starts row creations against an adapter and connection
pub struct CreateOrchestrator<A: ?Sized> {
    adapter: Arc<A>,
    db: Arc<dyn Database>,
}

impl<A: Adapter + ?Sized + 'static> CreateOrchestrator<A> {
    /// Create an orchestrator writing through `adapter` on `db`
    pub fn new(adapter: Arc<A>, db: Arc<dyn Database>) -> Self {
        Self { adapter, db }
    }
}

impl<A: Adapter + ?Sized + 'static> TaskStarter for CreateOrchestrator<A> {
    fn start(&self, task: &Task, results: &PendingResults) -> SharedHandle {
        let dependencies = task
            .dependencies
            .iter()
            .filter_map(|dep| results.get(dep).map(|handle| (dep.clone(), handle)))
            .collect();

        let job = CreateJob {
            adapter: Arc::clone(&self.adapter),
            db: Arc::clone(&self.db),
            row: task.name.clone(),
            model: task.model.clone(),
            data: task.data.clone(),
            associations: task.associations.clone(),
            dependencies,
        };
        job.run().boxed().shared()
    }
}

/// Everything one row's creation needs, owned by its future
struct CreateJob<A: ?Sized> {
    adapter: Arc<A>,
    db: Arc<dyn Database>,
    row: RowName,
    model: ModelName,
    data: FieldMap,
    associations: Vec<AssociationDescriptor>,

    /// Futures of this row's dependencies only
    dependencies: HashMap<RowName, SharedHandle>,
}

impl<A: Adapter + ?Sized> CreateJob<A> {
    async fn run(self) -> TaskOutcome {
        self.check_associations()?;

        let (before_insert, after_insert): (Vec<&AssociationDescriptor>, Vec<_>) = self
            .associations
            .iter()
            .partition(|a| *a.kind() == AssociationKind::BelongsTo);

        let mut data = self.data.clone();
        let needed: Vec<RowName> = before_insert
            .iter()
            .flat_map(|a| a.dependencies.iter().cloned())
            .collect();
        let resolved = self.await_rows(&needed).await?;
        for assoc in &before_insert {
            // checked above
            let Some(column) = assoc.association.foreign_key.clone() else {
                continue;
            };
            let value = assoc
                .value
                .try_substitute(&mut |row: &RowName| identity(&resolved, row))?;
            data.insert(column, value);
        }

        let base = self
            .adapter
            .create(self.db.as_ref(), &self.model, &data)
            .await?;
        log::debug!("Created {} ({} id={})", self.row, self.model, base.id);

        let attaches = after_insert.iter().map(|assoc| self.attach(&base, assoc));
        future::join_all(attaches)
            .await
            .into_iter()
            .collect::<Result<Vec<()>, TaskError>>()?;

        Ok(base)
    }

    /// Fail before any await or insert if an association cannot be applied
    fn check_associations(&self) -> Result<(), TaskError> {
        for assoc in &self.associations {
            match assoc.kind() {
                AssociationKind::Unknown(kind) => {
                    return Err(TaskError::UnknownAssociationKind {
                        model: self.model.to_string(),
                        field: assoc.field.clone(),
                        kind: kind.clone(),
                    });
                }
                AssociationKind::BelongsTo if assoc.association.foreign_key.is_none() => {
                    return Err(TaskError::MissingForeignKey {
                        model: self.model.to_string(),
                        field: assoc.field.clone(),
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }

    async fn attach(
        &self,
        base: &EntityHandle,
        assoc: &AssociationDescriptor,
    ) -> Result<(), TaskError> {
        let resolved = self.await_rows(&assoc.dependencies).await?;

        let payload = if assoc.value.is_flat() {
            let handles = assoc
                .dependencies
                .iter()
                .map(|row| {
                    resolved
                        .get(row)
                        .cloned()
                        .ok_or_else(|| TaskError::MissingDependency(row.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            AttachPayload::Handles(handles)
        } else {
            AttachPayload::Structured(
                assoc
                    .value
                    .try_substitute(&mut |row: &RowName| identity(&resolved, row))?,
            )
        };

        self.adapter
            .associate(self.db.as_ref(), base, &assoc.association, payload)
            .await?;
        log::debug!("Attached {}.{} for {}", self.model, assoc.field, self.row);
        Ok(())
    }

    /// Await the given rows' futures concurrently
    async fn await_rows(
        &self,
        rows: &[RowName],
    ) -> Result<HashMap<RowName, EntityHandle>, TaskError> {
        let mut unique: Vec<&RowName> = Vec::new();
        for row in rows {
            if !unique.contains(&row) {
                unique.push(row);
            }
        }

        let waits: Vec<_> = unique
            .into_iter()
            .map(|row| {
                let row = row.clone();
                let handle = self.dependencies.get(&row).cloned();
                async move {
                    let Some(handle) = handle else {
                        return Err(TaskError::MissingDependency(row));
                    };
                    match handle.await {
                        Ok(entity) => Ok((row, entity)),
                        Err(source) => Err(TaskError::DependencyFailed {
                            dependency: row,
                            source: Box::new(source),
                        }),
                    }
                }
            })
            .collect();

        future::join_all(waits).await.into_iter().collect()
    }
}

fn identity(
    resolved: &HashMap<RowName, EntityHandle>,
    row: &RowName,
) -> Result<Value, TaskError> {
    resolved
        .get(row)
        .map(|entity| entity.identity().clone())
        .ok_or_else(|| TaskError::MissingDependency(row.clone()))
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
