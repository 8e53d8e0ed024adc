//! Creation tasks and the task-graph builder.
//!
//! One [`Task`] per fixture row. A task knows the scalar columns to insert,
//! the associations to apply around the insert, and the row names that must
//! have been started before it may start.

use crate::association::{AssociationDescriptor, AssociationLookup, AssociationResolver};
use crate::error::CoreResult;
use crate::fixtures::FixtureSet;
use crate::names::{ModelName, RowName};
use crate::schema::Schema;
use crate::value::FieldMap;
use std::collections::HashSet;

/// Supplies the association lookup for each model.
///
/// Storage adapters implement this; [`Schema`] implements it directly.
pub trait AssociationSource {
    /// Lookup for `model`, or `UnknownModel`
    fn associations(&self, model: &ModelName) -> CoreResult<&dyn AssociationLookup>;
}

impl AssociationSource for Schema {
    fn associations(&self, model: &ModelName) -> CoreResult<&dyn AssociationLookup> {
        let def: &dyn AssociationLookup = self.model(model)?;
        Ok(def)
    }
}

/// Unit of work: create one fixture row
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Row name, unique across the load
    pub name: RowName,

    /// Model to insert into
    pub model: ModelName,

    /// Scalar column data; never contains association fields
    pub data: FieldMap,

    /// Association fields, in field order
    pub associations: Vec<AssociationDescriptor>,

    /// Union of every association's dependencies, deduplicated
    pub dependencies: Vec<RowName>,

    /// Set by the resolver once the task has been started
    pub done: bool,
}

impl Task {
    /// Assemble a task from a partitioned row
    pub fn new(
        name: RowName,
        model: ModelName,
        data: FieldMap,
        associations: Vec<AssociationDescriptor>,
    ) -> Self {
        let mut seen = HashSet::new();
        let dependencies = associations
            .iter()
            .flat_map(|a| a.dependencies.iter())
            .filter(|dep| seen.insert((*dep).clone()))
            .cloned()
            .collect();

        Self {
            name,
            model,
            data,
            associations,
            dependencies,
            done: false,
        }
    }
}

/// Turns a fixture set into a flat task list.
pub struct TaskGraphBuilder<'a, S: AssociationSource + ?Sized> {
    source: &'a S,
}

impl<'a, S: AssociationSource + ?Sized> TaskGraphBuilder<'a, S> {
    /// Create a builder resolving associations through `source`
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Build one task per row. Performs no I/O; fails only on an unknown
    /// model or a malformed association value.
    pub fn build(&self, fixtures: &FixtureSet) -> CoreResult<Vec<Task>> {
        let mut tasks = Vec::with_capacity(fixtures.len());

        for model in fixtures.models() {
            let resolver = AssociationResolver::new(self.source.associations(model)?);
            let Some(rows) = fixtures.model_rows(model) else {
                continue;
            };

            for (name, fields) in rows {
                let (data, associations) = resolver.partition(fields)?;
                tasks.push(Task::new(name.clone(), model.clone(), data, associations));
            }
        }

        log::debug!("Built {} fixture tasks", tasks.len());
        Ok(tasks)
    }
}

#[cfg(test)]
#[path = "task_test.rs"]
mod tests;
