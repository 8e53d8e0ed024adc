//! Load command implementation

use anyhow::{Context, Result};
use sg_core::ClearStrategy;
use sg_load::ResultSet;
use std::time::Instant;

use crate::cli::{GlobalArgs, LoadArgs};
use crate::commands::common::ExitCode;
use crate::context::RuntimeContext;

/// Execute the load command
pub async fn execute(args: &LoadArgs, global: &GlobalArgs) -> Result<()> {
    let start_time = Instant::now();
    let ctx = RuntimeContext::new(global).await?;

    let files = ctx.project.fixture_files(&args.files);
    if files.is_empty() {
        println!("No fixture files found in fixture_paths.");
        return Ok(());
    }
    for file in &files {
        ctx.verbose(&format!("Reading {}", file.display()));
    }

    let set = ctx.project.fixture_set(&files)?;
    let fixtures = ctx.fixtures();

    let strategy = fixtures.options().clear_strategy;
    let outcome = if args.clear {
        ctx.verbose(&format!("Clearing with strategy {}", strategy));
        if strategy == ClearStrategy::Rollback {
            log::warn!("rollback clearing keeps rows committed by earlier runs");
        }
        fixtures.clear_and_load(&set, None).await
    } else {
        fixtures.load(&set, None).await
    };

    match outcome {
        Ok(results) => {
            // Rollback clearing leaves the load inside an open transaction
            // that would be discarded when the connection closes.
            if args.clear && strategy == ClearStrategy::Rollback {
                fixtures
                    .adapter()
                    .commit_transaction(ctx.db.as_ref())
                    .await
                    .context("Failed to commit loaded rows")?;
            }

            print_results(&results);
            println!(
                "\nLoaded {} row(s) from {} file(s) in {}ms",
                results.len(),
                files.len(),
                start_time.elapsed().as_millis()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("  \u{2717} {}", e);
            Err(ExitCode(1).into())
        }
    }
}

fn print_results(results: &ResultSet) {
    for (row, handle) in results.iter() {
        println!("  \u{2713} {} ({} id={})", row, handle.model, handle.id);
    }
}
