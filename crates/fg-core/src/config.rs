//! Configuration types and parsing for fkgather.yml

use crate::depth::GatherDepth;
use crate::error::{CoreError, CoreResult};
use crate::policy::InvalidReferencePolicy;
use crate::schema::{ForeignKeyDef, SchemaBuilder, SchemaRegistry, DEFAULT_PRIMARY_KEY};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration from fkgather.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatherConfig {
    /// Project name
    pub name: String,

    /// SQL dialect used to render queries and validate predicates
    #[serde(default)]
    pub dialect: Dialect,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Depth used when a gather call does not specify one
    #[serde(default)]
    pub default_depth: GatherDepth,

    /// Optional upper bound on requested depths
    #[serde(default)]
    pub max_depth: Option<GatherDepth>,

    /// Policy used when a gather call does not specify one
    #[serde(default)]
    pub on_invalid_reference: InvalidReferencePolicy,

    /// Tables and their foreign keys
    #[serde(default)]
    pub tables: Vec<TableConfig>,
}

/// SQL dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// DuckDB SQL dialect
    #[default]
    DuckDb,
    /// PostgreSQL dialect
    Postgres,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::DuckDb => write!(f, "duckdb"),
            Dialect::Postgres => write!(f, "postgres"),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database path (DuckDB file or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// One table in the schema section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    /// Table name
    pub name: String,

    /// Primary-key column
    #[serde(default = "default_primary_key")]
    pub primary_key: String,

    /// Column names in selection order
    pub columns: Vec<String>,

    /// Outgoing foreign keys
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyConfig>,
}

/// One foreign key declared on a table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForeignKeyConfig {
    /// Edge name; the slot the referenced row is placed under
    pub name: String,

    /// Referencing column on the owning table
    pub column: String,

    /// Referenced table and column
    pub references: ReferenceTarget,

    /// Whether the referencing column may be null
    #[serde(default)]
    pub nullable: bool,
}

/// Target of a foreign key
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceTarget {
    /// Referenced table
    pub table: String,

    /// Referenced column (defaults to the table's primary key)
    #[serde(default)]
    pub column: Option<String>,
}

const DEFAULT_DB_PATH: &str = ":memory:";

const CONFIG_FILE_NAMES: [&str; 2] = ["fkgather.yml", "fkgather.yaml"];

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_primary_key() -> String {
    DEFAULT_PRIMARY_KEY.to_string()
}

impl GatherConfig {
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
        Self::from_yaml(&content)
    }

    /// Load configuration from a project directory
    /// Looks for fkgather.yml or fkgather.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.exists())
            .map(|p| Self::load(&p))
            .unwrap_or_else(|| {
                Err(CoreError::ConfigNotFound {
                    path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
                })
            })
    }

    /// Parse and validate configuration text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        let config: GatherConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        if let Some(max) = self.max_depth {
            if self.default_depth > max {
                return Err(CoreError::ConfigInvalid {
                    message: format!(
                        "default_depth ({}) exceeds max_depth ({})",
                        self.default_depth, max
                    ),
                });
            }
        }

        Ok(())
    }

    /// Build the schema registry described by the `tables` section.
    pub fn schema_registry(&self) -> CoreResult<SchemaRegistry> {
        let mut builder = SchemaBuilder::new();
        for table in &self.tables {
            builder = builder
                .table(&table.name, table.columns.iter().cloned())
                .primary_key(&table.name, &table.primary_key);
            for fk in &table.foreign_keys {
                builder = builder.add_foreign_key(ForeignKeyDef {
                    table: table.name.clone(),
                    name: fk.name.clone(),
                    column: fk.column.clone(),
                    references_table: fk.references.table.clone(),
                    references_column: fk.references.column.clone(),
                    nullable: fk.nullable,
                });
            }
        }
        builder.build()
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
