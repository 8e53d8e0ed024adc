//! Fixture sets: model name -> row name -> field map.
//!
//! Fixture files are YAML or JSON documents of the form
//!
//! ```yaml
//! Supplier:
//!   amatil: { name: Amatil }
//! Catalog:
//!   cola: { name: Cola, supplier: amatil }
//! ```
//!
//! Row names are global: the same name under two models, or in two files
//! merged into one set, is rejected.

use crate::error::{CoreError, CoreResult};
use crate::names::{ModelName, RowName};
use crate::value::FieldMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Rows of one model, by row name
pub type ModelRows = BTreeMap<RowName, FieldMap>;

/// A complete fixture description for one load
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FixtureSet {
    models: BTreeMap<ModelName, ModelRows>,

    /// Row name -> owning model, for the global uniqueness check
    #[serde(skip)]
    owners: HashMap<RowName, ModelName>,
}

impl FixtureSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one row, rejecting a name already used anywhere in the set.
    pub fn insert_row(&mut self, model: ModelName, name: RowName, fields: FieldMap) -> CoreResult<()> {
        if let Some(first) = self.owners.get(&name) {
            return Err(CoreError::DuplicateRow {
                name: name.to_string(),
                first: first.to_string(),
                second: model.to_string(),
            });
        }
        self.owners.insert(name.clone(), model.clone());
        self.models.entry(model).or_default().insert(name, fields);
        Ok(())
    }

    /// Parse a YAML fixture document
    pub fn from_yaml_str(yaml: &str, origin: &str) -> CoreResult<Self> {
        let raw: BTreeMap<ModelName, BTreeMap<RowName, Value>> = serde_yaml::from_str(yaml)?;
        Self::from_raw(raw, origin)
    }

    /// Parse a JSON fixture document
    pub fn from_json_str(json: &str, origin: &str) -> CoreResult<Self> {
        let raw: BTreeMap<ModelName, BTreeMap<RowName, Value>> = serde_json::from_str(json)?;
        Self::from_raw(raw, origin)
    }

    /// Build a set from an already-parsed JSON value (e.g. `json!({...})`)
    pub fn from_value(value: Value) -> CoreResult<Self> {
        let raw: BTreeMap<ModelName, BTreeMap<RowName, Value>> = serde_json::from_value(value)?;
        Self::from_raw(raw, "<inline>")
    }

    fn from_raw(raw: BTreeMap<ModelName, BTreeMap<RowName, Value>>, origin: &str) -> CoreResult<Self> {
        let mut set = Self::new();
        for (model, rows) in raw {
            for (name, fields) in rows {
                let fields = match fields {
                    Value::Object(map) => map,
                    Value::Null => FieldMap::new(),
                    other => {
                        return Err(CoreError::MalformedFixtures {
                            origin: origin.to_string(),
                            reason: format!(
                                "row '{}' of model '{}' must be a mapping, found {}",
                                name, model, other
                            ),
                        })
                    }
                };
                set.insert_row(model.clone(), name, fields)?;
            }
        }
        Ok(set)
    }

    /// Load one fixture file; `.json` is parsed as JSON, anything else as YAML.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let origin = path.display().to_string();
        if path.extension().is_some_and(|e| e == "json") {
            Self::from_json_str(&content, &origin)
        } else {
            Self::from_yaml_str(&content, &origin)
        }
    }

    /// Load and merge several fixture files
    pub fn from_paths(paths: &[PathBuf]) -> CoreResult<Self> {
        let mut set = Self::new();
        for path in paths {
            set.merge(Self::from_path(path)?)?;
        }
        Ok(set)
    }

    /// Move every row of `other` into this set
    pub fn merge(&mut self, other: FixtureSet) -> CoreResult<()> {
        for (model, rows) in other.models {
            for (name, fields) in rows {
                self.insert_row(model.clone(), name, fields)?;
            }
        }
        Ok(())
    }

    /// Iterate `(model, row name, fields)` in model then row-name order
    pub fn rows(&self) -> impl Iterator<Item = (&ModelName, &RowName, &FieldMap)> {
        self.models
            .iter()
            .flat_map(|(model, rows)| rows.iter().map(move |(name, fields)| (model, name, fields)))
    }

    /// Models that have at least one row
    pub fn models(&self) -> impl Iterator<Item = &ModelName> {
        self.models.keys()
    }

    /// Rows declared for a model
    pub fn model_rows(&self, model: &str) -> Option<&ModelRows> {
        self.models.get(model)
    }

    /// Model that declares `row`, if any
    pub fn owner_of(&self, row: &str) -> Option<&ModelName> {
        self.owners.get(row)
    }

    /// Total number of rows
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// True when the set has no rows
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// Find fixture files (`.yml`, `.yaml`, `.json`) under a directory, sorted by path.
pub fn discover_fixture_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    discover_recursive(dir, &mut files);
    files.sort();
    files
}

fn discover_recursive(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Cannot read fixture directory {}: {}", dir.display(), e);
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            discover_recursive(&path, files);
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| matches!(e, "yml" | "yaml" | "json"))
        {
            files.push(path);
        }
    }
}

#[cfg(test)]
#[path = "fixtures_test.rs"]
mod tests;
