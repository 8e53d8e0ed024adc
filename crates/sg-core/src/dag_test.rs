use super::*;
use crate::names::ModelName;
use crate::value::FieldMap;

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

fn names(rows: &[RowName]) -> Vec<&str> {
    rows.iter().map(|r| r.as_str()).collect()
}

#[test]
fn test_levels_for_catalog_graph() {
    let tasks = vec![
        task("coke", &["cokecorp", "amatil", "cola"]),
        task("cola", &["drink", "fizzy"]),
        task("amatil", &[]),
        task("cokecorp", &[]),
        task("drink", &[]),
        task("fizzy", &[]),
    ];
    let dag = TaskDag::build(&tasks, &HashSet::new());
    let plan = dag.creation_levels();

    assert!(plan.is_satisfiable());
    assert_eq!(plan.levels.len(), 3);
    assert_eq!(
        names(&plan.levels[0]),
        vec!["amatil", "cokecorp", "drink", "fizzy"]
    );
    assert_eq!(names(&plan.levels[1]), vec!["cola"]);
    assert_eq!(names(&plan.levels[2]), vec!["coke"]);
    assert!(!dag.has_cycle());
}

#[test]
fn test_dependencies_and_dependents() {
    let tasks = vec![task("a", &[]), task("b", &["a"]), task("c", &["a", "b"])];
    let dag = TaskDag::build(&tasks, &HashSet::new());

    assert_eq!(names(&dag.dependents("a")), vec!["b", "c"]);
    assert_eq!(names(&dag.dependencies("c")), vec!["a", "b"]);
    assert!(dag.dependents("missing").is_empty());
    assert_eq!(dag.len(), 3);
}

#[test]
fn test_cycle_is_unresolved() {
    let tasks = vec![task("a", &["b"]), task("b", &["a"]), task("c", &[])];
    let dag = TaskDag::build(&tasks, &HashSet::new());
    let plan = dag.creation_levels();

    assert!(dag.has_cycle());
    assert_eq!(names(&plan.levels[0]), vec!["c"]);
    assert_eq!(names(&plan.unresolved), vec!["a", "b"]);
}

#[test]
fn test_missing_reference_blocks_row_and_dependents() {
    let tasks = vec![task("cola", &["ghost"]), task("coke", &["cola"])];
    let dag = TaskDag::build(&tasks, &HashSet::new());
    let plan = dag.creation_levels();

    assert!(!plan.is_satisfiable());
    assert_eq!(names(&plan.unresolved), vec!["coke", "cola"]);
    assert_eq!(
        dag.dangling_references()[&RowName::new("cola")],
        vec![RowName::new("ghost")]
    );
}

#[test]
fn test_seeded_dependency_is_satisfied() {
    let tasks = vec![task("coke", &["amatil"])];
    let seeded: HashSet<RowName> = [RowName::new("amatil")].into_iter().collect();
    let plan = TaskDag::build(&tasks, &seeded).creation_levels();

    assert!(plan.is_satisfiable());
    assert_eq!(names(&plan.levels[0]), vec!["coke"]);
}

#[test]
fn test_self_reference_is_unresolved() {
    let tasks = vec![task("loop", &["loop"])];
    let plan = TaskDag::build(&tasks, &HashSet::new()).creation_levels();
    assert!(plan.levels.is_empty());
    assert_eq!(names(&plan.unresolved), vec!["loop"]);
}
