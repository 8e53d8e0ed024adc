//! sg-core - Core library for Seedgraph
//!
//! This crate provides the storage-independent half of fixture loading:
//! typed names and values, fixture sets, association metadata and the
//! per-row association resolver, the task-graph builder, the schema
//! registry, project configuration, and a dependency-graph view of a task
//! list.

pub mod association;
pub mod config;
pub mod dag;
pub mod entity;
pub mod error;
pub mod fixtures;
mod name_macro;
pub mod names;
pub mod schema;
pub mod task;
pub mod value;

pub use association::{
    Association, AssociationDescriptor, AssociationKind, AssociationLookup, AssociationResolver,
    AttachPayload, JoinTable,
};
pub use config::{ClearStrategy, Config, DatabaseConfig, DbType};
pub use dag::{CreationPlan, TaskDag};
pub use entity::EntityHandle;
pub use error::{CoreError, CoreResult};
pub use fixtures::{discover_fixture_files, FixtureSet};
pub use names::{ModelName, RowName};
pub use schema::{ModelDef, Schema};
pub use task::{AssociationSource, Task, TaskGraphBuilder};
pub use value::{FieldMap, RefValue};
