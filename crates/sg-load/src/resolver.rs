//! Fixed-point task resolution.
//!
//! Tasks are scanned repeatedly from the top. A task starts as soon as every
//! row it depends on has a future in the results map, whether or not that
//! future has settled. A scan that starts nothing while tasks remain means
//! the graph can never finish.

use crate::error::{LoadError, LoadResult};
use crate::results::{PendingResults, SharedHandle};
use sg_core::Task;

/// Starts one task, given the futures of rows started so far
pub trait TaskStarter {
    /// Begin the task's creation and return its future
    fn start(&self, task: &Task, results: &PendingResults) -> SharedHandle;
}

impl<T: TaskStarter + ?Sized> TaskStarter for &T {
    fn start(&self, task: &Task, results: &PendingResults) -> SharedHandle {
        (**self).start(task, results)
    }
}

/// Repeated-scan resolver over a task list
pub struct GraphResolver<S> {
    starter: S,
}

impl<S: TaskStarter> GraphResolver<S> {
    /// Create a resolver that starts tasks through `starter`
    pub fn new(starter: S) -> Self {
        Self { starter }
    }

    /// Start every task, marking each `done` as it starts.
    ///
    /// `results` may hold seeded rows from an earlier load. On an
    /// unsatisfiable graph, every task still not done is named in the error;
    /// tasks started before that point keep their futures in the map.
    pub fn resolve(
        &self,
        tasks: &mut [Task],
        mut results: PendingResults,
    ) -> LoadResult<PendingResults> {
        let mut remaining = tasks.iter().filter(|t| !t.done).count();
        let mut scans = 0usize;

        while remaining > 0 {
            let before = remaining;
            scans += 1;

            for task in tasks.iter_mut().filter(|t| !t.done) {
                if !task.dependencies.iter().all(|dep| results.contains(dep)) {
                    continue;
                }

                let handle = self.starter.start(task, &results);
                if results.insert(task.name.clone(), handle).is_some() {
                    log::warn!("Row '{}' replaces a seeded row of the same name", task.name);
                }
                log::debug!("Started {} ({})", task.name, task.model);
                task.done = true;
                remaining -= 1;
            }

            if remaining == before {
                let unresolved = tasks
                    .iter()
                    .filter(|t| !t.done)
                    .map(|t| t.name.clone())
                    .collect();
                return Err(LoadError::UnsatisfiableGraph { unresolved });
            }
        }

        log::debug!("Started {} task(s) in {} scan(s)", tasks.len(), scans);
        Ok(results)
    }
}

#[cfg(test)]
#[path = "resolver_test.rs"]
mod tests;
