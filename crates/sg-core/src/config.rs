//! Project configuration from seedgraph.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main project configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Schema file, relative to the project root
    #[serde(default = "default_schema_path")]
    pub schema: String,

    /// Directories (or files) containing fixtures
    #[serde(default = "default_fixture_paths")]
    pub fixture_paths: Vec<String>,

    /// How `clear` empties the tables
    #[serde(default)]
    pub clear_strategy: ClearStrategy,
}

/// Database type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// DuckDB (default)
    #[default]
    DuckDb,
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbType::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database type
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Database path (file or `:memory:`)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DbType::default(),
            path: default_db_path(),
        }
    }
}

/// Table-clearing policy run before a load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ClearStrategy {
    /// Truncate every model's tables, one model at a time
    #[default]
    TruncateIndividually,
    /// Truncate every model's tables in one request
    TruncateAll,
    /// Roll back the open transaction and begin a new one
    Rollback,
}

impl fmt::Display for ClearStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClearStrategy::TruncateIndividually => write!(f, "truncateIndividually"),
            ClearStrategy::TruncateAll => write!(f, "truncateAll"),
            ClearStrategy::Rollback => write!(f, "rollback"),
        }
    }
}

impl FromStr for ClearStrategy {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s {
            "truncateIndividually" => Ok(ClearStrategy::TruncateIndividually),
            "truncateAll" => Ok(ClearStrategy::TruncateAll),
            "rollback" => Ok(ClearStrategy::Rollback),
            other => Err(CoreError::ConfigInvalid {
                message: format!(
                    "unknown clear strategy '{}' (expected truncateIndividually, truncateAll or rollback)",
                    other
                ),
            }),
        }
    }
}

fn default_db_path() -> String {
    ":memory:".to_string()
}

fn default_schema_path() -> String {
    "schema.yml".to_string()
}

fn default_fixture_paths() -> Vec<String> {
    vec!["fixtures".to_string()]
}

impl Config {
    /// Load configuration from a file path
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
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for seedgraph.yml or seedgraph.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("seedgraph.yml");
        let yaml_path = dir.join("seedgraph.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }
        if self.fixture_paths.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "At least one fixture path must be configured".to_string(),
            });
        }
        Ok(())
    }

    /// Absolute schema file path
    pub fn schema_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.schema)
    }

    /// Absolute fixture paths
    pub fn fixture_paths_absolute(&self, root: &Path) -> Vec<PathBuf> {
        self.fixture_paths.iter().map(|p| root.join(p)).collect()
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
