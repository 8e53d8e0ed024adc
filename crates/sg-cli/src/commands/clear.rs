//! Clear command implementation

use anyhow::Result;
use sg_core::ClearStrategy;

use crate::cli::{ClearArgs, GlobalArgs};
use crate::commands::common::ExitCode;
use crate::context::RuntimeContext;

/// Execute the clear command
pub async fn execute(args: &ClearArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global).await?;
    let fixtures = ctx.fixtures();

    let strategy = args
        .strategy
        .map(ClearStrategy::from)
        .unwrap_or(fixtures.options().clear_strategy);
    ctx.verbose(&format!("Clearing with strategy {}", strategy));

    // A fresh connection has no open transaction, so there is nothing to roll back.
    if strategy == ClearStrategy::Rollback {
        eprintln!(
            "  \u{2717} The rollback strategy only clears rows of an open transaction on a \
             long-lived connection; use truncateIndividually or truncateAll"
        );
        return Err(ExitCode(1).into());
    }

    match fixtures.clear_with(strategy).await {
        Ok(()) => {
            println!(
                "Cleared {} model(s) ({})",
                ctx.project.schema.models.len(),
                strategy
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("  \u{2717} {}", e);
            Err(ExitCode(1).into())
        }
    }
}
