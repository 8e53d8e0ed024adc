//! Model catalogue: tables, primary keys, and declared associations.
//!
//! Loaded from a `schema.yml` file:
//!
//! ```yaml
//! models:
//!   Supplier:
//!     table: supplier
//!   Catalog:
//!     table: catalog
//!     associations:
//!       - name: supplier
//!         kind: belongsTo
//!         target: Supplier
//!         foreign_key: supplier_id
//! ```

use crate::association::{Association, AssociationKind, AssociationLookup};
use crate::error::{CoreError, CoreResult};
use crate::names::ModelName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Definition of one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelDef {
    /// Table holding the model's rows
    pub table: String,

    /// Primary-key column, read back as the row's identity
    #[serde(default = "default_primary_key")]
    pub primary_key: String,

    /// Declared associations
    #[serde(default)]
    pub associations: Vec<Association>,
}

fn default_primary_key() -> String {
    "id".to_string()
}

impl ModelDef {
    /// Every table a truncate of this model must clear.
    ///
    /// Join tables come first so that rows referencing the model's table
    /// are gone before it is emptied.
    pub fn tables(&self) -> Vec<String> {
        let mut tables: Vec<String> = Vec::new();
        for join in self.associations.iter().filter_map(|a| a.through.as_ref()) {
            if !tables.contains(&join.table) {
                tables.push(join.table.clone());
            }
        }
        if !tables.contains(&self.table) {
            tables.push(self.table.clone());
        }
        tables
    }
}

impl AssociationLookup for ModelDef {
    fn resolve(&self, field: &str) -> Option<&Association> {
        self.associations.iter().find(|a| a.answers_to(field))
    }
}

/// All models known to a storage backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Schema {
    /// Models by name
    #[serde(default)]
    pub models: BTreeMap<ModelName, ModelDef>,
}

impl Schema {
    /// Load and validate a schema file
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate a schema from YAML text
    pub fn from_yaml_str(yaml: &str) -> CoreResult<Self> {
        let schema: Schema = serde_yaml::from_str(yaml)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Check that associations are complete and point at declared models.
    ///
    /// Unknown kinds are accepted here; they fail when a row uses them.
    pub fn validate(&self) -> CoreResult<()> {
        for (name, def) in &self.models {
            let invalid = |reason: String| CoreError::InvalidSchema {
                model: name.to_string(),
                reason,
            };

            if def.table.is_empty() {
                return Err(invalid("table name is empty".to_string()));
            }

            for assoc in &def.associations {
                if !self.models.contains_key(assoc.target.as_str()) {
                    return Err(invalid(format!(
                        "association '{}' targets undeclared model '{}'",
                        assoc.name, assoc.target
                    )));
                }

                match assoc.kind {
                    AssociationKind::BelongsTo
                    | AssociationKind::HasMany
                    | AssociationKind::HasOne
                        if assoc.foreign_key.is_none() =>
                    {
                        return Err(invalid(format!(
                            "{} association '{}' needs a foreign_key",
                            assoc.kind, assoc.name
                        )));
                    }
                    AssociationKind::BelongsToMany if assoc.through.is_none() => {
                        return Err(invalid(format!(
                            "belongsToMany association '{}' needs a 'through' join table",
                            assoc.name
                        )));
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Definition of a model, or `UnknownModel`
    pub fn model(&self, name: &str) -> CoreResult<&ModelDef> {
        self.models.get(name).ok_or_else(|| CoreError::UnknownModel {
            model: name.to_string(),
        })
    }

    /// Declared model names, in name order
    pub fn model_names(&self) -> Vec<ModelName> {
        self.models.keys().cloned().collect()
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
