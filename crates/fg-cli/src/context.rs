//! Runtime context for CLI commands

use anyhow::{Context, Result};
use fg_core::GatherConfig;
use fg_db::{Database, DuckDbBackend};
use fg_gather::Gatherer;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::GlobalArgs;

const IN_MEMORY: &str = ":memory:";

/// Load the configuration named by `--config`, or the one in the project
/// directory.
pub(crate) fn load_config(args: &GlobalArgs) -> Result<GatherConfig> {
    match &args.config {
        Some(config_path) => {
            GatherConfig::load(Path::new(config_path)).context("Failed to load configuration file")
        }
        None => GatherConfig::load_from_dir(Path::new(&args.project_dir))
            .context("Failed to load project configuration"),
    }
}

/// Runtime context containing the loaded configuration and a ready gatherer
pub struct RuntimeContext {
    /// The loaded configuration
    pub config: GatherConfig,

    /// Gatherer bound to the configured database and schema
    pub gatherer: Gatherer,

    /// Verbose output enabled
    pub verbose: bool,
}

impl RuntimeContext {
    /// Create a new runtime context from global arguments
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let config = load_config(args)?;

        let db_path = resolve_db_path(
            Path::new(&args.project_dir),
            args.target.as_deref().unwrap_or(&config.database.path),
        );
        let db: Arc<dyn Database> = Arc::new(
            DuckDbBackend::new(&db_path.to_string_lossy())
                .context("Failed to connect to database")?,
        );

        let gatherer =
            Gatherer::from_config(db, &config).context("Invalid schema in configuration")?;

        let ctx = Self {
            config,
            gatherer,
            verbose: args.verbose,
        };
        ctx.verbose(&format!(
            "Project '{}': {} table(s), {} database at {}",
            ctx.config.name,
            ctx.gatherer.registry().len(),
            ctx.config.dialect,
            db_path.display()
        ));
        Ok(ctx)
    }

    /// Print verbose output if enabled
    pub fn verbose(&self, msg: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", msg);
        }
    }
}

/// Database paths in the config are relative to the project directory.
fn resolve_db_path(project_dir: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if path == IN_MEMORY || candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        project_dir.join(candidate)
    }
}
