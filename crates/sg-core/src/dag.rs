//! Row dependency graph, used to preview creation order.
//!
//! The loader itself resolves rows with a repeated scan; this view answers
//! "which rows start in which wave" without touching a database.

use crate::names::RowName;
use crate::task::Task;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Creation waves for a task list
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreationPlan {
    /// Rows grouped by wave; a row only depends on earlier waves or seeds
    pub levels: Vec<Vec<RowName>>,

    /// Rows that can never start (cycle, missing reference, or downstream of one)
    pub unresolved: Vec<RowName>,
}

impl CreationPlan {
    /// True when every row can be created
    pub fn is_satisfiable(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Directed graph of row dependencies (edge: dependency -> dependent)
#[derive(Debug)]
pub struct TaskDag {
    graph: DiGraph<RowName, ()>,
    node_map: HashMap<RowName, NodeIndex>,

    /// Rows with a dependency that is neither a task nor seeded
    dangling: HashMap<RowName, Vec<RowName>>,
}

impl TaskDag {
    /// Build the graph. Dependencies found in `seeded` count as satisfied.
    pub fn build(tasks: &[Task], seeded: &HashSet<RowName>) -> Self {
        let mut graph = DiGraph::new();
        let mut node_map = HashMap::new();

        for task in tasks {
            let idx = graph.add_node(task.name.clone());
            node_map.insert(task.name.clone(), idx);
        }

        let mut dangling: HashMap<RowName, Vec<RowName>> = HashMap::new();
        for task in tasks {
            let to = node_map[&task.name];
            for dep in &task.dependencies {
                if let Some(&from) = node_map.get(dep) {
                    graph.add_edge(from, to, ());
                } else if !seeded.contains(dep) {
                    dangling
                        .entry(task.name.clone())
                        .or_default()
                        .push(dep.clone());
                }
            }
        }

        Self {
            graph,
            node_map,
            dangling,
        }
    }

    /// Whether the graph contains a dependency cycle
    pub fn has_cycle(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// References to rows that do not exist, by referring row
    pub fn dangling_references(&self) -> &HashMap<RowName, Vec<RowName>> {
        &self.dangling
    }

    /// Direct dependencies of a row that are themselves tasks
    pub fn dependencies(&self, row: &str) -> Vec<RowName> {
        self.neighbors(row, Direction::Incoming)
    }

    /// Rows that directly depend on `row`
    pub fn dependents(&self, row: &str) -> Vec<RowName> {
        self.neighbors(row, Direction::Outgoing)
    }

    fn neighbors(&self, row: &str, direction: Direction) -> Vec<RowName> {
        let Some(&idx) = self.node_map.get(row) else {
            return Vec::new();
        };
        let mut out: Vec<RowName> = self
            .graph
            .edges_directed(idx, direction)
            .map(|e| match direction {
                Direction::Incoming => self.graph[e.source()].clone(),
                Direction::Outgoing => self.graph[e.target()].clone(),
            })
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// Group rows into creation waves.
    ///
    /// Wave 0 holds rows with no pending dependency; wave `n` holds rows whose
    /// dependencies all sit in earlier waves. Rows never reached are reported
    /// as unresolved.
    pub fn creation_levels(&self) -> CreationPlan {
        let mut pending: HashMap<NodeIndex, usize> = HashMap::new();
        for idx in self.graph.node_indices() {
            let incoming = self
                .graph
                .edges_directed(idx, Direction::Incoming)
                .map(|e| e.source())
                .collect::<HashSet<_>>()
                .len();
            pending.insert(idx, incoming);
        }

        let blocked: HashSet<NodeIndex> = self
            .dangling
            .keys()
            .filter_map(|name| self.node_map.get(name).copied())
            .collect();

        let mut current: Vec<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|idx| pending[idx] == 0 && !blocked.contains(idx))
            .collect();
        let mut placed: HashSet<NodeIndex> = HashSet::new();
        let mut plan = CreationPlan::default();

        while !current.is_empty() {
            let mut next = Vec::new();
            for &idx in &current {
                placed.insert(idx);
                let targets: HashSet<NodeIndex> = self
                    .graph
                    .edges_directed(idx, Direction::Outgoing)
                    .map(|e| e.target())
                    .collect();
                for target in targets {
                    if let Some(count) = pending.get_mut(&target) {
                        *count -= 1;
                        if *count == 0 && !blocked.contains(&target) {
                            next.push(target);
                        }
                    }
                }
            }

            let mut level: Vec<RowName> =
                current.iter().map(|idx| self.graph[*idx].clone()).collect();
            level.sort();
            plan.levels.push(level);
            current = next;
        }

        plan.unresolved = self
            .graph
            .node_indices()
            .filter(|idx| !placed.contains(idx))
            .map(|idx| self.graph[idx].clone())
            .collect();
        plan.unresolved.sort();
        plan
    }

    /// Number of rows in the graph
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// True when the graph has no rows
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}

#[cfg(test)]
#[path = "dag_test.rs"]
mod tests;
