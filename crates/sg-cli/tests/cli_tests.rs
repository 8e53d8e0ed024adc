//! Integration tests for the sg binary
//!
//! Each test writes a small project into a temp directory and runs the
//! compiled binary against an on-disk DuckDB file.

use sg_db::{Database, DuckDbBackend};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Path to the compiled sg binary
fn sg_bin() -> String {
    env!("CARGO_BIN_EXE_sg").to_string()
}

/// Run an `sg` command in a project and return (stdout, stderr, success).
fn run_sg(project: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(sg_bin())
        .arg("--project-dir")
        .arg(project)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute sg with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

const CONFIG: &str = "name: drinks\nclear_strategy: truncateAll\n";

const SCHEMA: &str = r#"
models:
  Supplier:
    table: supplier
  Catalog:
    table: catalog
    associations:
      - name: supplier
        kind: belongsTo
        target: Supplier
        foreign_key: supplier_id
"#;

const SUPPLIERS: &str = "Supplier:\n  amatil: { name: Amatil }\n";
const CATALOG: &str = "Catalog:\n  cola: { name: Cola, supplier: amatil }\n";

const DDL: &str = "
CREATE SEQUENCE supplier_seq START 1;
CREATE SEQUENCE catalog_seq START 1;
CREATE TABLE supplier (id INTEGER DEFAULT nextval('supplier_seq'), name VARCHAR);
CREATE TABLE catalog (id INTEGER DEFAULT nextval('catalog_seq'), name VARCHAR, supplier_id INTEGER);
";

/// Write a project and create its tables; returns (dir, database path)
async fn project() -> (TempDir, PathBuf) {
    project_with(CONFIG).await
}

async fn project_with(config: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("seedgraph.yml"), config).unwrap();
    std::fs::write(dir.path().join("schema.yml"), SCHEMA).unwrap();
    std::fs::create_dir(dir.path().join("fixtures")).unwrap();
    std::fs::write(dir.path().join("fixtures/suppliers.yml"), SUPPLIERS).unwrap();
    std::fs::write(dir.path().join("fixtures/catalog.yml"), CATALOG).unwrap();

    let db_path = dir.path().join("drinks.duckdb");
    let db = DuckDbBackend::from_path(&db_path).unwrap();
    db.execute_batch(DDL).await.unwrap();
    drop(db);

    (dir, db_path)
}

async fn count(db_path: &Path, table: &str) -> usize {
    let db = DuckDbBackend::from_path(db_path).unwrap();
    db.query_count(&format!("SELECT * FROM {}", table))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_load_prints_created_rows() {
    let (dir, db_path) = project().await;
    let target = db_path.to_str().unwrap();

    let (stdout, stderr, ok) = run_sg(dir.path(), &["load", "--target", target]);
    assert!(ok, "load failed: {}", stderr);
    assert!(stdout.contains("\u{2713} amatil (Supplier id=1)"), "{}", stdout);
    assert!(stdout.contains("\u{2713} cola (Catalog id=1)"), "{}", stdout);
    assert!(stdout.contains("Loaded 2 row(s) from 2 file(s)"), "{}", stdout);

    assert_eq!(count(&db_path, "catalog").await, 1);
}

#[tokio::test]
async fn test_load_clear_replaces_rows() {
    let (dir, db_path) = project().await;
    let target = db_path.to_str().unwrap();

    let (_, stderr, ok) = run_sg(dir.path(), &["load", "--target", target]);
    assert!(ok, "{}", stderr);
    let (_, stderr, ok) = run_sg(dir.path(), &["load", "--clear", "--target", target]);
    assert!(ok, "{}", stderr);

    assert_eq!(count(&db_path, "supplier").await, 1);
    assert_eq!(count(&db_path, "catalog").await, 1);
}

#[tokio::test]
async fn test_clear_empties_tables() {
    let (dir, db_path) = project().await;
    let target = db_path.to_str().unwrap();

    run_sg(dir.path(), &["load", "--target", target]);
    let (stdout, stderr, ok) = run_sg(
        dir.path(),
        &["clear", "--strategy", "truncateIndividually", "--target", target],
    );
    assert!(ok, "{}", stderr);
    assert!(stdout.contains("Cleared 2 model(s) (truncateIndividually)"));

    assert_eq!(count(&db_path, "supplier").await, 0);
    assert_eq!(count(&db_path, "catalog").await, 0);
}

#[tokio::test]
async fn test_load_clear_with_rollback_strategy_persists_rows() {
    let (dir, db_path) = project_with("name: drinks\nclear_strategy: rollback\n").await;
    let target = db_path.to_str().unwrap();

    let (stdout, stderr, ok) = run_sg(dir.path(), &["load", "--clear", "--target", target]);
    assert!(ok, "{}", stderr);
    assert!(stdout.contains("Loaded 2 row(s)"), "{}", stdout);

    assert_eq!(count(&db_path, "supplier").await, 1);
    assert_eq!(count(&db_path, "catalog").await, 1);
}

#[tokio::test]
async fn test_clear_with_rollback_strategy_is_refused() {
    let (dir, db_path) = project().await;
    let target = db_path.to_str().unwrap();

    run_sg(dir.path(), &["load", "--target", target]);
    let (stdout, stderr, ok) = run_sg(
        dir.path(),
        &["clear", "--strategy", "rollback", "--target", target],
    );
    assert!(!ok);
    assert!(!stdout.contains("Cleared"), "{}", stdout);
    assert!(stderr.contains("rollback strategy"), "{}", stderr);
    assert_eq!(count(&db_path, "catalog").await, 1);
}

#[tokio::test]
async fn test_load_missing_reference_fails() {
    let (dir, db_path) = project().await;
    let target = db_path.to_str().unwrap();

    let (_, stderr, ok) = run_sg(
        dir.path(),
        &["load", "--files", "fixtures/catalog.yml", "--target", target],
    );
    assert!(!ok);
    assert!(stderr.contains("unresolved tasks: cola"), "{}", stderr);
    assert_eq!(count(&db_path, "catalog").await, 0);
}

#[tokio::test]
async fn test_plan_text_lists_waves() {
    let (dir, _db_path) = project().await;

    let (stdout, stderr, ok) = run_sg(dir.path(), &["plan"]);
    assert!(ok, "{}", stderr);
    assert!(stdout.contains("wave 1: amatil"), "{}", stdout);
    assert!(stdout.contains("wave 2: cola"), "{}", stdout);
}

#[tokio::test]
async fn test_plan_json_reports_unresolved() {
    let (dir, _db_path) = project().await;

    let (stdout, _, ok) = run_sg(
        dir.path(),
        &["plan", "--files", "fixtures/catalog.yml", "--output", "json"],
    );
    assert!(!ok);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["rows"], 1);
    assert_eq!(report["unresolved"], serde_json::json!(["cola"]));
}

#[test]
fn test_missing_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, ok) = run_sg(dir.path(), &["plan"]);
    assert!(!ok);
    assert!(stderr.contains("Failed to load project configuration"), "{}", stderr);
}
