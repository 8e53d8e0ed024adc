use super::*;
use crate::test_utils::{recording_fixtures, RecordingAdapter, StorageCall, CATALOG_SCHEMA};
use serde_json::json;
use sg_core::CoreError;

fn set(yaml: &str) -> FixtureSet {
    FixtureSet::from_yaml_str(yaml, "test.yml").unwrap()
}

fn loader() -> (Fixtures<RecordingAdapter>, Arc<RecordingAdapter>) {
    recording_fixtures(
        RecordingAdapter::from_yaml(CATALOG_SCHEMA),
        LoaderOptions::default(),
    )
}

const DRINKS: &str = r#"
Supplier:
  amatil: { name: Amatil }
Manufacturer:
  cokecorp: { name: Coke Corp }
Group:
  drink: { name: Drink }
  fizzy: { name: Fizzy }
Catalog:
  cola: { name: Cola, supplier: amatil, groups: [drink, fizzy] }
  coke: { name: Coke, maker: cokecorp, parent: cola }
"#;

#[tokio::test]
async fn test_load_returns_one_handle_per_row() {
    let (fixtures, adapter) = loader();
    let results = fixtures.load(&set(DRINKS), None).await.unwrap();

    assert_eq!(results.len(), 6);
    assert_eq!(results.get("amatil").unwrap().id, json!(1));
    assert_eq!(
        results.get("cola").unwrap().get("supplier_id"),
        results.get("amatil").map(|a| &a.id)
    );
    assert_eq!(
        results.get("coke").unwrap().get("parent_id"),
        results.get("cola").map(|c| &c.id)
    );
    assert_eq!(adapter.creates().len(), 6);
    assert_eq!(adapter.associates().len(), 1);
}

#[tokio::test]
async fn test_seeded_load_does_not_recreate_rows() {
    let (fixtures, adapter) = loader();
    let first = fixtures
        .load(&set("Supplier:\n  amatil: { name: Amatil }\n"), None)
        .await
        .unwrap();

    let second = fixtures
        .load(
            &set("Catalog:\n  cola: { name: Cola, supplier: amatil }\n"),
            Some(&first),
        )
        .await
        .unwrap();

    assert_eq!(adapter.creates_for("Supplier").len(), 1);
    assert_eq!(second.len(), 2);
    assert_eq!(
        second.get("cola").unwrap().get("supplier_id"),
        Some(&json!(1))
    );
    assert_eq!(second.get("amatil"), first.get("amatil"));
}

#[tokio::test]
async fn test_missing_reference_names_the_row() {
    let (fixtures, adapter) = loader();
    let err = fixtures
        .load(
            &set("Catalog:\n  cola: { name: Cola, supplier: ghost }\n  water: { name: Water }\n"),
            None,
        )
        .await
        .unwrap_err();

    match err {
        LoadError::UnsatisfiableGraph { unresolved } => {
            assert_eq!(unresolved, vec![RowName::new("cola")]);
        }
        other => panic!("expected UnsatisfiableGraph, got {:?}", other),
    }
    // started rows are never driven once resolution fails
    assert!(adapter.creates().is_empty());
}

#[tokio::test]
async fn test_cycle_names_both_rows() {
    let (fixtures, _adapter) = loader();
    let err = fixtures
        .load(
            &set("Catalog:\n  a: { name: A, parent: b }\n  b: { name: B, parent: a }\n"),
            None,
        )
        .await
        .unwrap_err();

    assert!(err.to_string().contains("unresolved tasks: a, b"));
}

#[tokio::test]
async fn test_unknown_model_is_configuration_error() {
    let (fixtures, _adapter) = loader();
    let err = fixtures
        .load(&set("Ghost:\n  boo: { name: Boo }\n"), None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LoadError::Core(CoreError::UnknownModel { ref model }) if model == "Ghost"
    ));
}

#[tokio::test]
async fn test_failure_reports_root_row() {
    let (fixtures, adapter) = recording_fixtures(
        RecordingAdapter::from_yaml(CATALOG_SCHEMA).fail_creates_for("Supplier"),
        LoaderOptions::default(),
    );
    let err = fixtures.load(&set(DRINKS), None).await.unwrap_err();

    match err {
        LoadError::Task { row, source } => {
            assert_eq!(row, "amatil");
            assert!(matches!(source, TaskError::Adapter(_)));
        }
        other => panic!("expected Task error, got {:?}", other),
    }
    // independent rows still ran to completion
    assert_eq!(adapter.creates_for("Group").len(), 2);
}

#[tokio::test]
async fn test_resolve_pending_exposes_in_flight_rows() {
    let (fixtures, adapter) = loader();
    let pending = fixtures
        .resolve_pending(&set(DRINKS), PendingResults::new())
        .unwrap();

    assert_eq!(pending.len(), 6);
    assert!(adapter.creates().is_empty());

    let cola = pending.get("cola").unwrap().await.unwrap();
    assert_eq!(cola.model, "Catalog");
    assert_eq!(adapter.creates_for("Supplier").len(), 1);
}

#[tokio::test]
async fn test_plan_orders_rows_in_waves() {
    let (fixtures, _adapter) = loader();
    let plan = fixtures.plan(&set(DRINKS), None).unwrap();

    assert!(plan.is_satisfiable());
    assert_eq!(plan.levels.len(), 3);
    assert_eq!(plan.levels[1], vec![RowName::new("cola")]);
    assert_eq!(plan.levels[2], vec![RowName::new("coke")]);
}

#[tokio::test]
async fn test_clear_uses_configured_strategy() {
    let (fixtures, adapter) = recording_fixtures(
        RecordingAdapter::from_yaml(CATALOG_SCHEMA),
        LoaderOptions {
            clear_strategy: ClearStrategy::Rollback,
        },
    );
    fixtures.clear().await.unwrap();
    fixtures.clear().await.unwrap();

    assert_eq!(
        adapter.storage_calls(),
        vec![
            StorageCall::Rollback,
            StorageCall::Begin,
            StorageCall::Rollback,
            StorageCall::Begin
        ]
    );
}

#[tokio::test]
async fn test_clear_failure_is_wrapped() {
    let (fixtures, _adapter) = recording_fixtures(
        RecordingAdapter::from_yaml(CATALOG_SCHEMA).fail_truncates_for("Tag"),
        LoaderOptions::default(),
    );
    assert!(matches!(
        fixtures.clear().await,
        Err(LoadError::Clear(_))
    ));
}

#[tokio::test]
async fn test_clear_and_load_clears_first() {
    let (fixtures, adapter) = loader();
    let results = fixtures
        .clear_and_load(&set(DRINKS), None)
        .await
        .unwrap();

    assert_eq!(results.len(), 6);
    assert_eq!(adapter.storage_calls().len(), 5);
}

#[test]
fn test_options_from_config() {
    let config: Config =
        serde_yaml::from_str("name: drinks\nclear_strategy: truncateAll\n").unwrap();
    assert_eq!(
        LoaderOptions::from_config(&config).clear_strategy,
        ClearStrategy::TruncateAll
    );
}
