use super::*;
use serde_json::json;
use sg_core::{FieldMap, ModelName};

fn handle(model: &str, id: i64) -> EntityHandle {
    EntityHandle::new(ModelName::new(model), json!(id), FieldMap::new())
}

fn failing(row: &str) -> SharedHandle {
    let err = TaskError::MissingDependency(RowName::new(row));
    future::ready(Err(err)).boxed().shared()
}

#[tokio::test]
async fn test_to_pending_yields_settled_handles() {
    let mut results = ResultSet::new();
    results.insert(RowName::new("amatil"), handle("Supplier", 1));
    results.insert(RowName::new("cola"), handle("Catalog", 2));

    let pending = results.to_pending();
    assert_eq!(pending.len(), 2);
    assert!(pending.contains("amatil"));

    let amatil = pending.get("amatil").unwrap().await.unwrap();
    assert_eq!(amatil.id, json!(1));
}

#[tokio::test]
async fn test_settle_keeps_every_outcome_in_name_order() {
    let mut pending = PendingResults::new();
    pending.insert(RowName::new("zeta"), ready_handle(handle("Catalog", 3)));
    pending.insert(RowName::new("alpha"), failing("ghost"));
    pending.insert(RowName::new("mid"), ready_handle(handle("Catalog", 2)));

    let outcomes = pending.settle().await;
    let names: Vec<&str> = outcomes.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    assert!(outcomes[0].1.is_err());
    assert!(outcomes[1].1.is_ok());
    assert!(outcomes[2].1.is_ok());
}

#[tokio::test]
async fn test_shared_handle_awaited_twice() {
    let shared = ready_handle(handle("Supplier", 1));
    let first = shared.clone().await.unwrap();
    let second = shared.await.unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_insert_reports_replaced_seed() {
    let mut pending = ResultSet::new().to_pending();
    assert!(pending
        .insert(RowName::new("a"), ready_handle(handle("M", 1)))
        .is_none());
    assert!(pending
        .insert(RowName::new("a"), ready_handle(handle("M", 2)))
        .is_some());
    assert_eq!(pending.row_names(), vec![RowName::new("a")]);
}

#[test]
fn test_result_set_serializes_by_row() {
    let results: ResultSet = vec![(RowName::new("amatil"), handle("Supplier", 1))]
        .into_iter()
        .collect();
    let value = serde_json::to_value(&results).unwrap();
    assert_eq!(value["amatil"]["id"], json!(1));
    assert_eq!(value["amatil"]["model"], json!("Supplier"));
}

#[test]
fn test_extend_prefers_newer_rows() {
    let mut base: ResultSet = vec![(RowName::new("a"), handle("M", 1))].into_iter().collect();
    let newer: ResultSet = vec![
        (RowName::new("a"), handle("M", 5)),
        (RowName::new("b"), handle("M", 6)),
    ]
    .into_iter()
    .collect();
    base.extend(newer);
    assert_eq!(base.len(), 2);
    assert_eq!(base.get("a").unwrap().id, json!(5));
}
