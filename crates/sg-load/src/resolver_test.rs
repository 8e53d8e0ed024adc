use super::*;
use crate::results::ready_handle;
use serde_json::json;
use sg_core::{EntityHandle, FieldMap, ModelName, RowName};
use std::cell::RefCell;

/// Records start order and which dependencies were visible at start time
#[derive(Default)]
struct RecordingStarter {
    started: RefCell<Vec<String>>,
}

impl TaskStarter for RecordingStarter {
    fn start(&self, task: &Task, results: &PendingResults) -> SharedHandle {
        for dep in &task.dependencies {
            assert!(results.contains(dep), "{} started before {}", task.name, dep);
        }
        self.started.borrow_mut().push(task.name.to_string());
        let id = self.started.borrow().len() as i64;
        ready_handle(EntityHandle::new(
            task.model.clone(),
            json!(id),
            FieldMap::new(),
        ))
    }
}

fn task(name: &str, deps: &[&str]) -> Task {
    Task {
        name: RowName::new(name),
        model: ModelName::new("Catalog"),
        data: FieldMap::new(),
        associations: Vec::new(),
        dependencies: deps.iter().map(|d| RowName::new(*d)).collect(),
        done: false,
    }
}

fn unresolved(err: LoadError) -> Vec<String> {
    match err {
        LoadError::UnsatisfiableGraph { unresolved } => {
            unresolved.iter().map(|r| r.to_string()).collect()
        }
        other => panic!("expected UnsatisfiableGraph, got {:?}", other),
    }
}

#[test]
fn test_independent_tasks_start_on_first_scan() {
    let starter = RecordingStarter::default();
    let resolver = GraphResolver::new(&starter);
    let mut tasks = vec![task("a", &[]), task("b", &[])];

    let results = resolver.resolve(&mut tasks, PendingResults::new()).unwrap();

    assert_eq!(results.len(), 2);
    assert!(tasks.iter().all(|t| t.done));
    assert_eq!(*starter.started.borrow(), vec!["a", "b"]);
}

#[test]
fn test_dependency_started_before_dependent() {
    let starter = RecordingStarter::default();
    let resolver = GraphResolver::new(&starter);
    let mut tasks = vec![
        task("coke", &["cola", "amatil"]),
        task("cola", &["drink"]),
        task("drink", &[]),
        task("amatil", &[]),
    ];

    resolver.resolve(&mut tasks, PendingResults::new()).unwrap();

    // First scan: drink, then amatil; second scan: cola; third: coke.
    assert_eq!(
        *starter.started.borrow(),
        vec!["drink", "amatil", "cola", "coke"]
    );
}

#[test]
fn test_later_task_in_same_scan_sees_earlier_start() {
    let starter = RecordingStarter::default();
    let resolver = GraphResolver::new(&starter);
    let mut tasks = vec![task("a", &[]), task("b", &["a"]), task("c", &["b"])];

    resolver.resolve(&mut tasks, PendingResults::new()).unwrap();
    assert_eq!(*starter.started.borrow(), vec!["a", "b", "c"]);
}

#[test]
fn test_cycle_names_both_rows() {
    let starter = RecordingStarter::default();
    let resolver = GraphResolver::new(&starter);
    let mut tasks = vec![task("a", &["b"]), task("b", &["a"]), task("free", &[])];

    let err = resolver
        .resolve(&mut tasks, PendingResults::new())
        .unwrap_err();

    assert_eq!(unresolved(err), vec!["a", "b"]);
    assert_eq!(*starter.started.borrow(), vec!["free"]);
}

#[test]
fn test_missing_reference_is_unsatisfiable() {
    let starter = RecordingStarter::default();
    let resolver = GraphResolver::new(&starter);
    let mut tasks = vec![task("cola", &["ghost"]), task("coke", &["cola"])];

    let err = resolver
        .resolve(&mut tasks, PendingResults::new())
        .unwrap_err();
    let message = err.to_string();

    assert_eq!(unresolved(err), vec!["cola", "coke"]);
    assert!(message.contains("unresolved tasks: cola, coke"));
}

#[test]
fn test_seeded_rows_satisfy_dependencies() {
    let starter = RecordingStarter::default();
    let resolver = GraphResolver::new(&starter);
    let mut seed = PendingResults::new();
    seed.insert(
        RowName::new("amatil"),
        ready_handle(EntityHandle::new(
            ModelName::new("Supplier"),
            json!(1),
            FieldMap::new(),
        )),
    );
    let mut tasks = vec![task("cola", &["amatil"])];

    let results = resolver.resolve(&mut tasks, seed).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(*starter.started.borrow(), vec!["cola"]);
}

#[test]
fn test_done_tasks_are_skipped() {
    let starter = RecordingStarter::default();
    let resolver = GraphResolver::new(&starter);
    let mut done = task("a", &[]);
    done.done = true;
    let mut tasks = vec![done];

    let results = resolver.resolve(&mut tasks, PendingResults::new()).unwrap();
    assert!(results.is_empty());
    assert!(starter.started.borrow().is_empty());
}

#[test]
fn test_empty_task_list() {
    let resolver = GraphResolver::new(RecordingStarter::default());
    let results = resolver.resolve(&mut [], PendingResults::new()).unwrap();
    assert!(results.is_empty());
}
