//! Error types for sg-load

use sg_core::{CoreError, RowName};
use sg_db::DbError;
use thiserror::Error;

/// Failure of one row's creation.
///
/// Carried by the row's shared future, so every dependent that awaits it
/// receives a clone.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TaskError {
    /// Association kind the engine cannot apply (T001)
    #[error("[T001] Association '{field}' of {model} has unknown kind '{kind}'")]
    UnknownAssociationKind {
        model: String,
        field: String,
        kind: String,
    },

    /// belongsTo association without a foreign-key column (T002)
    #[error("[T002] belongsTo association '{field}' of {model} declares no foreign key")]
    MissingForeignKey { model: String, field: String },

    /// Storage adapter failure (T003)
    #[error("[T003] {0}")]
    Adapter(#[from] DbError),

    /// A row this row depends on failed (T004)
    #[error("[T004] Dependency '{dependency}' failed: {source}")]
    DependencyFailed {
        dependency: RowName,
        source: Box<TaskError>,
    },

    /// A dependency had no started task when this row ran (T005)
    #[error("[T005] Dependency '{0}' was never started")]
    MissingDependency(RowName),
}

impl TaskError {
    /// The failure at the end of a dependency chain
    pub fn root_cause(&self) -> &TaskError {
        match self {
            TaskError::DependencyFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Loader errors
#[derive(Error, Debug)]
pub enum LoadError {
    /// No scan made progress (L001)
    #[error(
        "[L001] Unsatisfiable dependency in fixture graph (unresolved tasks: {})",
        .unresolved.join(", ")
    )]
    UnsatisfiableGraph { unresolved: Vec<RowName> },

    /// A row failed to be created (L002)
    #[error("[L002] Fixture row '{row}' failed: {source}")]
    Task { row: RowName, source: TaskError },

    /// Fixture or configuration error (L003)
    #[error("[L003] {0}")]
    Core(#[from] CoreError),

    /// Clear strategy failed (L004)
    #[error("[L004] Clearing fixtures failed: {0}")]
    Clear(DbError),
}

/// Result type alias for LoadError
pub type LoadResult<T> = Result<T, LoadError>;
