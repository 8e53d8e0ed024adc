//! Clear strategies.
//!
//! Each strategy empties storage through the adapter on an explicit
//! connection. Calling any of them twice in a row succeeds.

use sg_core::ClearStrategy;
use sg_db::{Adapter, Database, DbResult};

/// Run the given strategy
pub async fn clear<A: Adapter + ?Sized>(
    strategy: ClearStrategy,
    adapter: &A,
    db: &dyn Database,
) -> DbResult<()> {
    log::debug!("Clearing fixtures ({})", strategy);
    match strategy {
        ClearStrategy::TruncateIndividually => truncate_individually(adapter, db).await,
        ClearStrategy::TruncateAll => truncate_all(adapter, db).await,
        ClearStrategy::Rollback => rollback(adapter, db).await,
    }
}

/// Truncate each model in turn.
///
/// Every model is attempted; the first failure is returned once all have
/// run.
pub async fn truncate_individually<A: Adapter + ?Sized>(
    adapter: &A,
    db: &dyn Database,
) -> DbResult<()> {
    let mut first_error = None;
    for model in adapter.models() {
        if let Err(e) = adapter.truncate(db, std::slice::from_ref(&model)).await {
            log::warn!("Truncating {} failed: {}", model, e);
            first_error.get_or_insert(e);
        }
    }
    first_error.map_or(Ok(()), Err)
}

/// Truncate every model in one adapter call
pub async fn truncate_all<A: Adapter + ?Sized>(adapter: &A, db: &dyn Database) -> DbResult<()> {
    adapter.truncate(db, &adapter.models()).await
}

/// Roll back the open transaction, then begin a new one.
///
/// The rollback's failure is ignored; with no transaction open (the first
/// call on a connection) it always fails.
pub async fn rollback<A: Adapter + ?Sized>(adapter: &A, db: &dyn Database) -> DbResult<()> {
    if let Err(e) = adapter.rollback_transaction(db).await {
        log::debug!("Ignoring rollback failure: {}", e);
    }
    adapter.begin_transaction(db).await
}

#[cfg(test)]
#[path = "clear_test.rs"]
mod tests;
