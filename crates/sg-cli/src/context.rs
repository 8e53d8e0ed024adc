//! Runtime context for CLI commands

use anyhow::{Context, Result};
use sg_core::{discover_fixture_files, Config, FixtureSet, Schema};
use sg_db::{Database, DuckDbBackend, SqlAdapter};
use sg_load::{Fixtures, LoaderOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// Project directory with its configuration and schema loaded
pub struct Project {
    /// Project root directory
    pub root: PathBuf,

    /// Parsed seedgraph.yml
    pub config: Config,

    /// Model registry from the configured schema file
    pub schema: Schema,
}

impl Project {
    /// Load config (custom path or project directory) and schema
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let root = PathBuf::from(&args.project_dir);

        let config = if let Some(config_path) = &args.config {
            Config::load(Path::new(config_path)).context("Failed to load configuration file")?
        } else {
            Config::load_from_dir(&root).context("Failed to load project configuration")?
        };

        let schema_path = config.schema_path_absolute(&root);
        let schema = Schema::load(&schema_path)
            .with_context(|| format!("Failed to load schema: {}", schema_path.display()))?;

        Ok(Self {
            root,
            config,
            schema,
        })
    }

    /// Fixture files named on the command line, or every file under fixture_paths
    pub fn fixture_files(&self, files_arg: &Option<String>) -> Vec<PathBuf> {
        match files_arg {
            Some(files) => files
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| self.root.join(s))
                .collect(),
            None => self
                .config
                .fixture_paths_absolute(&self.root)
                .iter()
                .flat_map(|path| {
                    if path.is_file() {
                        vec![path.clone()]
                    } else {
                        discover_fixture_files(path)
                    }
                })
                .collect(),
        }
    }

    /// Read and merge fixture files into one set
    pub fn fixture_set(&self, files: &[PathBuf]) -> Result<FixtureSet> {
        FixtureSet::from_paths(files).context("Failed to read fixtures")
    }
}

/// Runtime context containing the loaded project and database connection
pub struct RuntimeContext {
    /// The loaded project
    pub project: Project,

    /// Database connection
    pub db: Arc<dyn Database>,

    /// Verbose output enabled
    pub verbose: bool,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub async fn new(args: &GlobalArgs) -> Result<Self> {
        let project = Project::load(args)?;

        // --target overrides the configured database path
        let db_path = args
            .target
            .as_deref()
            .unwrap_or(&project.config.database.path);
        let db: Arc<dyn Database> =
            Arc::new(DuckDbBackend::new(db_path).context("Failed to connect to database")?);
        log::debug!("Connected to {} at {}", db.db_type(), db_path);

        Ok(Self {
            project,
            db,
            verbose: args.verbose,
        })
    }

    /// Loader over the project schema and this connection
    pub fn fixtures(&self) -> Fixtures<SqlAdapter> {
        Fixtures::with_options(
            Arc::new(SqlAdapter::new(self.project.schema.clone())),
            Arc::clone(&self.db),
            LoaderOptions::from_config(&self.project.config),
        )
    }

    /// Print verbose output if enabled
    pub fn verbose(&self, msg: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", msg);
        }
    }
}
