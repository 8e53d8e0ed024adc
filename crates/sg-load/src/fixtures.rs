//! The fixture loader facade: load, clear, and clear-then-load.

use crate::clear;
use crate::error::{LoadError, LoadResult, TaskError};
use crate::orchestrator::CreateOrchestrator;
use crate::resolver::GraphResolver;
use crate::results::{PendingResults, ResultSet};
use sg_core::{
    ClearStrategy, Config, CreationPlan, FixtureSet, RowName, Task, TaskDag, TaskGraphBuilder,
};
use sg_db::{Adapter, Database};
use std::collections::HashSet;
use std::sync::Arc;

/// Loader options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Policy used by [`Fixtures::clear`]
    pub clear_strategy: ClearStrategy,
}

impl LoaderOptions {
    /// Options taken from a project configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            clear_strategy: config.clear_strategy,
        }
    }
}

/// Loads fixture sets through an adapter on one connection
pub struct Fixtures<A: Adapter + ?Sized> {
    adapter: Arc<A>,
    db: Arc<dyn Database>,
    options: LoaderOptions,
}

impl<A: Adapter + ?Sized + 'static> Fixtures<A> {
    /// Create a loader with default options
    pub fn new(adapter: Arc<A>, db: Arc<dyn Database>) -> Self {
        Self::with_options(adapter, db, LoaderOptions::default())
    }

    /// Create a loader with explicit options
    pub fn with_options(adapter: Arc<A>, db: Arc<dyn Database>, options: LoaderOptions) -> Self {
        Self {
            adapter,
            db,
            options,
        }
    }

    /// Loader options
    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// The adapter rows are written through
    pub fn adapter(&self) -> &Arc<A> {
        &self.adapter
    }

    /// The connection rows are written on
    pub fn database(&self) -> &Arc<dyn Database> {
        &self.db
    }

    /// One task per fixture row
    pub fn build_tasks(&self, fixtures: &FixtureSet) -> LoadResult<Vec<Task>> {
        Ok(TaskGraphBuilder::new(self.adapter.as_ref()).build(fixtures)?)
    }

    /// Creation waves for a fixture set, without touching storage
    pub fn plan(
        &self,
        fixtures: &FixtureSet,
        seed: Option<&ResultSet>,
    ) -> LoadResult<CreationPlan> {
        let tasks = self.build_tasks(fixtures)?;
        let seeded: HashSet<RowName> = seed
            .map(|s| s.iter().map(|(row, _)| row.clone()).collect())
            .unwrap_or_default();
        Ok(TaskDag::build(&tasks, &seeded).creation_levels())
    }

    /// Start every row of `fixtures` and return the in-flight futures,
    /// including those of `seed`.
    ///
    /// Nothing is written until the futures are polled; awaiting all of them
    /// (see [`PendingResults::settle`]) completes the load.
    pub fn resolve_pending(
        &self,
        fixtures: &FixtureSet,
        seed: PendingResults,
    ) -> LoadResult<PendingResults> {
        let mut tasks = self.build_tasks(fixtures)?;
        let orchestrator =
            CreateOrchestrator::new(Arc::clone(&self.adapter), Arc::clone(&self.db));
        GraphResolver::new(orchestrator).resolve(&mut tasks, seed)
    }

    /// Load a fixture set, optionally on top of an earlier load's results.
    ///
    /// Every row is driven to completion even when one fails. The error
    /// returned names the first failing row by name, preferring a row that
    /// failed on its own over one that failed because a dependency did.
    pub async fn load(
        &self,
        fixtures: &FixtureSet,
        seed: Option<&ResultSet>,
    ) -> LoadResult<ResultSet> {
        let pending = self.resolve_pending(
            fixtures,
            seed.map(ResultSet::to_pending).unwrap_or_default(),
        )?;

        let mut results = ResultSet::new();
        let mut failures: Vec<(RowName, TaskError)> = Vec::new();
        for (row, outcome) in pending.settle().await {
            match outcome {
                Ok(handle) => {
                    results.insert(row, handle);
                }
                Err(err) => {
                    log::debug!("Row '{}' failed: {}", row, err);
                    failures.push((row, err));
                }
            }
        }

        let root = failures
            .iter()
            .position(|(_, err)| !matches!(err, TaskError::DependencyFailed { .. }))
            .unwrap_or(0);
        if root < failures.len() {
            let (row, source) = failures.swap_remove(root);
            return Err(LoadError::Task { row, source });
        }

        log::info!(
            "Loaded {} fixture row(s) ({} seeded)",
            fixtures.len(),
            seed.map_or(0, ResultSet::len)
        );
        Ok(results)
    }

    /// Empty storage using the configured strategy
    pub async fn clear(&self) -> LoadResult<()> {
        self.clear_with(self.options.clear_strategy).await
    }

    /// Empty storage using an explicit strategy
    pub async fn clear_with(&self, strategy: ClearStrategy) -> LoadResult<()> {
        clear::clear(strategy, self.adapter.as_ref(), self.db.as_ref())
            .await
            .map_err(LoadError::Clear)
    }

    /// [`clear`](Self::clear), then [`load`](Self::load)
    pub async fn clear_and_load(
        &self,
        fixtures: &FixtureSet,
        seed: Option<&ResultSet>,
    ) -> LoadResult<ResultSet> {
        self.clear().await?;
        self.load(fixtures, seed).await
    }
}

#[cfg(test)]
#[path = "fixtures_test.rs"]
mod tests;
