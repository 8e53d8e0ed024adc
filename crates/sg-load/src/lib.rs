//! sg-load - Fixture loading engine for Seedgraph
//!
//! Turns a fixture set into one creation task per row, starts each task
//! once the rows it references have been started, and creates every row in
//! two phases around its insert. Also provides the clear strategies and the
//! [`Fixtures`] facade tying them together.

pub mod clear;
pub mod error;
pub mod fixtures;
pub mod orchestrator;
pub mod resolver;
pub mod results;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use error::{LoadError, LoadResult, TaskError};
pub use fixtures::{Fixtures, LoaderOptions};
pub use orchestrator::CreateOrchestrator;
pub use resolver::{GraphResolver, TaskStarter};
pub use results::{PendingResults, ResultSet, SharedHandle, TaskOutcome};
