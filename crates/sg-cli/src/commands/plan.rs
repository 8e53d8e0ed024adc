//! Plan command implementation

use anyhow::{Context, Result};
use serde::Serialize;
use sg_core::{CreationPlan, RowName, TaskDag, TaskGraphBuilder};
use std::collections::HashSet;

use crate::cli::{GlobalArgs, PlanArgs, PlanOutput};
use crate::commands::common::ExitCode;
use crate::context::Project;

/// JSON shape of a plan
#[derive(Serialize)]
struct PlanReport<'a> {
    rows: usize,
    waves: &'a [Vec<RowName>],
    unresolved: &'a [RowName],
}

/// Execute the plan command
pub async fn execute(args: &PlanArgs, global: &GlobalArgs) -> Result<()> {
    let project = Project::load(global)?;

    let files = project.fixture_files(&args.files);
    let set = project.fixture_set(&files)?;
    let tasks = TaskGraphBuilder::new(&project.schema)
        .build(&set)
        .context("Failed to build creation tasks")?;
    let plan = TaskDag::build(&tasks, &HashSet::new()).creation_levels();

    match args.output {
        PlanOutput::Text => print_text(&plan),
        PlanOutput::Json => print_json(&plan, tasks.len())?,
    }

    if plan.is_satisfiable() {
        Ok(())
    } else {
        Err(ExitCode(1).into())
    }
}

fn print_text(plan: &CreationPlan) {
    for (i, wave) in plan.levels.iter().enumerate() {
        let names: Vec<&str> = wave.iter().map(|r| r.as_str()).collect();
        println!("wave {}: {}", i + 1, names.join(", "));
    }
    if !plan.unresolved.is_empty() {
        let names: Vec<&str> = plan.unresolved.iter().map(|r| r.as_str()).collect();
        println!("unresolved: {}", names.join(", "));
    }
}

fn print_json(plan: &CreationPlan, rows: usize) -> Result<()> {
    let report = PlanReport {
        rows,
        waves: &plan.levels,
        unresolved: &plan.unresolved,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("Failed to serialize plan")?
    );
    Ok(())
}
