//! Row results: in-flight futures and the settled result set.

use crate::error::TaskError;
use futures::future::{self, BoxFuture, FutureExt, Shared};
use serde::Serialize;
use sg_core::{EntityHandle, RowName};
use std::collections::{BTreeMap, HashMap};

/// Outcome of one row's creation
pub type TaskOutcome = Result<EntityHandle, TaskError>;

/// Future of one row's creation, awaitable by any number of dependents
pub type SharedHandle = Shared<BoxFuture<'static, TaskOutcome>>;

/// Started rows, keyed by row name.
///
/// Append-only. Only the resolver inserts; task bodies get clones of the
/// handles they depend on, never the map itself.
#[derive(Clone, Default)]
pub struct PendingResults {
    entries: HashMap<RowName, SharedHandle>,
}

impl PendingResults {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a started row, returning the handle it replaced (a seed)
    pub(crate) fn insert(&mut self, row: RowName, handle: SharedHandle) -> Option<SharedHandle> {
        self.entries.insert(row, handle)
    }

    /// Whether `row` has been started or seeded
    pub fn contains(&self, row: &str) -> bool {
        self.entries.contains_key(row)
    }

    /// A clone of the future for `row`
    pub fn get(&self, row: &str) -> Option<SharedHandle> {
        self.entries.get(row).cloned()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no row has been started or seeded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Row names, sorted
    pub fn row_names(&self) -> Vec<RowName> {
        let mut names: Vec<RowName> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Await every future and return the outcomes in row-name order.
    ///
    /// Every future is driven to completion; a failure does not cancel the
    /// others.
    pub async fn settle(self) -> Vec<(RowName, TaskOutcome)> {
        let mut entries: Vec<(RowName, SharedHandle)> = self.entries.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let (names, handles): (Vec<RowName>, Vec<SharedHandle>) = entries.into_iter().unzip();
        let outcomes = future::join_all(handles).await;
        names.into_iter().zip(outcomes).collect()
    }
}

impl std::fmt::Debug for PendingResults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingResults")
            .field("rows", &self.row_names())
            .finish()
    }
}

/// Wrap a persisted row as an already-settled handle
pub(crate) fn ready_handle(handle: EntityHandle) -> SharedHandle {
    future::ready(Ok(handle)).boxed().shared()
}

/// Created rows by row name, as returned by a load
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    rows: BTreeMap<RowName, EntityHandle>,
}

impl ResultSet {
    /// Create an empty result set
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for `row`
    pub fn get(&self, row: &str) -> Option<&EntityHandle> {
        self.rows.get(row)
    }

    /// Add or replace a row
    pub fn insert(&mut self, row: RowName, handle: EntityHandle) -> Option<EntityHandle> {
        self.rows.insert(row, handle)
    }

    /// Whether `row` is present
    pub fn contains(&self, row: &str) -> bool {
        self.rows.contains_key(row)
    }

    /// Rows in name order
    pub fn iter(&self) -> impl Iterator<Item = (&RowName, &EntityHandle)> {
        self.rows.iter()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Merge another result set in; its rows win on a name clash
    pub fn extend(&mut self, other: ResultSet) {
        self.rows.extend(other.rows);
    }

    /// Seed a later load with these rows as settled futures
    pub fn to_pending(&self) -> PendingResults {
        let mut pending = PendingResults::new();
        for (row, handle) in &self.rows {
            pending.insert(row.clone(), ready_handle(handle.clone()));
        }
        pending
    }
}

impl FromIterator<(RowName, EntityHandle)> for ResultSet {
    fn from_iter<I: IntoIterator<Item = (RowName, EntityHandle)>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[path = "results_test.rs"]
mod tests;
