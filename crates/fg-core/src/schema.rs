//! Schema registry and foreign-key graph
//!
//! The registry holds, per table, its ordered column list, its primary-key
//! column, and its named foreign-key edges. It is the adjacency list of the
//! foreign-key graph: edges are looked up by source table name and may form
//! cycles (a table can reference itself, directly or transitively).
//!
//! Registries are produced by [`SchemaBuilder`] and are read-only afterwards.

use crate::error::{CoreError, CoreResult};
use crate::names::{EdgeName, TableName};
use std::collections::{HashMap, HashSet};

/// Primary-key column assumed when a table does not name one.
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// Keys every serialised model carries ahead of its columns and slots; no
/// column or foreign key may use them.
pub const RESERVED_NAMES: [&str; 2] = ["depth", "table"];

/// A named foreign-key relationship from a column of one table to a column
/// (normally the primary key) of another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyEdge {
    /// Edge name, unique within `from_table`
    pub name: EdgeName,
    /// Referencing table
    pub from_table: TableName,
    /// Referencing column on `from_table`
    pub from_column: String,
    /// Referenced table
    pub to_table: TableName,
    /// Referenced column on `to_table`
    pub to_column: String,
    /// Whether the referencing column may legitimately hold null
    pub nullable: bool,
}

/// Columns and outgoing edges of one table.
#[derive(Debug, Clone)]
pub struct TableSchema {
    name: TableName,
    primary_key: String,
    columns: Vec<String>,
    edges: Vec<ForeignKeyEdge>,
}

impl TableSchema {
    /// Table name.
    pub fn name(&self) -> &TableName {
        &self.name
    }

    /// Primary-key column.
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Outgoing foreign-key edges in declaration order.
    pub fn edges(&self) -> &[ForeignKeyEdge] {
        &self.edges
    }

    /// Look up an outgoing edge by name.
    pub fn edge(&self, name: &str) -> Option<&ForeignKeyEdge> {
        self.edges.iter().find(|e| e.name == name)
    }
}

/// Immutable registry of table schemas, indexed by table name.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    tables: Vec<TableSchema>,
    index: HashMap<TableName, usize>,
}

impl SchemaRegistry {
    /// Look up a table.
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.index.get(name).map(|&idx| &self.tables[idx])
    }

    /// Look up a table, failing with [`CoreError::UnknownTable`].
    pub fn require_table(&self, name: &str) -> CoreResult<&TableSchema> {
        self.table(name).ok_or_else(|| CoreError::UnknownTable {
            table: name.to_string(),
        })
    }

    /// Outgoing edges of a table; empty for unknown tables.
    pub fn edges(&self, table: &str) -> &[ForeignKeyEdge] {
        self.table(table).map(TableSchema::edges).unwrap_or_default()
    }

    pub fn contains(&self, table: &str) -> bool {
        self.index.contains_key(table)
    }

    /// Tables in registration order.
    pub fn tables(&self) -> impl Iterator<Item = &TableSchema> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Declarative description of one foreign key, as accepted by
/// [`SchemaBuilder::add_foreign_key`].
#[derive(Debug, Clone)]
pub struct ForeignKeyDef {
    /// Referencing table
    pub table: String,
    /// Edge name
    pub name: String,
    /// Referencing column
    pub column: String,
    /// Referenced table
    pub references_table: String,
    /// Referenced column; the referenced table's primary key when `None`
    pub references_column: Option<String>,
    pub nullable: bool,
}

#[derive(Debug, Clone)]
struct TableDef {
    name: String,
    columns: Vec<String>,
}

/// Fluent builder for a [`SchemaRegistry`].
///
/// Nothing is validated until [`build`](Self::build), so tables and foreign
/// keys may be declared in any order.
///
/// ```
/// use fg_core::SchemaBuilder;
///
/// let registry = SchemaBuilder::new()
///     .table("media_item", ["id", "url"])
///     .table("user", ["id", "name", "avatar_img_id"])
///     .nullable_foreign_key("user", "avatar_img", "avatar_img_id", "media_item")
///     .build()
///     .unwrap();
/// assert_eq!(registry.edges("user").len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    tables: Vec<TableDef>,
    primary_keys: Vec<(String, String)>,
    foreign_keys: Vec<ForeignKeyDef>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table and its columns.
    pub fn table<I, S>(mut self, name: &str, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables.push(TableDef {
            name: name.to_string(),
            columns: columns.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Override the primary-key column of a table (default `id`).
    pub fn primary_key(mut self, table: &str, column: &str) -> Self {
        self.primary_keys
            .push((table.to_string(), column.to_string()));
        self
    }

    /// Declare a non-nullable foreign key referencing the target's primary key.
    pub fn foreign_key(self, table: &str, name: &str, column: &str, references: &str) -> Self {
        self.add_foreign_key(ForeignKeyDef {
            table: table.to_string(),
            name: name.to_string(),
            column: column.to_string(),
            references_table: references.to_string(),
            references_column: None,
            nullable: false,
        })
    }

    /// Declare a nullable foreign key referencing the target's primary key.
    pub fn nullable_foreign_key(
        self,
        table: &str,
        name: &str,
        column: &str,
        references: &str,
    ) -> Self {
        self.add_foreign_key(ForeignKeyDef {
            table: table.to_string(),
            name: name.to_string(),
            column: column.to_string(),
            references_table: references.to_string(),
            references_column: None,
            nullable: true,
        })
    }

    /// Declare a foreign key with full control over every field.
    pub fn add_foreign_key(mut self, def: ForeignKeyDef) -> Self {
        self.foreign_keys.push(def);
        self
    }

    /// Validate every declaration and freeze the registry.
    pub fn build(self) -> CoreResult<SchemaRegistry> {
        let mut tables: Vec<TableSchema> = Vec::with_capacity(self.tables.len());
        let mut index: HashMap<TableName, usize> = HashMap::new();

        for def in self.tables {
            let name = TableName::try_new(def.name).ok_or_else(|| CoreError::EmptyName {
                context: "table name".into(),
            })?;
            if index.contains_key(&name) {
                return Err(CoreError::DuplicateTable {
                    table: name.to_string(),
                });
            }
            if def.columns.is_empty() {
                return Err(CoreError::EmptyColumns {
                    table: name.to_string(),
                });
            }
            let mut seen = HashSet::new();
            for column in &def.columns {
                if column.is_empty() {
                    return Err(CoreError::EmptyName {
                        context: format!("column name on table '{name}'"),
                    });
                }
                if RESERVED_NAMES.contains(&column.as_str()) {
                    return Err(CoreError::ReservedName {
                        table: name.to_string(),
                        name: column.clone(),
                    });
                }
                if !seen.insert(column.as_str()) {
                    return Err(CoreError::DuplicateColumn {
                        table: name.to_string(),
                        column: column.clone(),
                    });
                }
            }
            index.insert(name.clone(), tables.len());
            tables.push(TableSchema {
                name,
                primary_key: DEFAULT_PRIMARY_KEY.to_string(),
                columns: def.columns,
                edges: Vec::new(),
            });
        }

        for (table, column) in self.primary_keys {
            let idx = lookup(&index, &table)?;
            let schema = &mut tables[idx];
            if !schema.has_column(&column) {
                return Err(CoreError::UnknownColumn { table, column });
            }
            schema.primary_key = column;
        }

        // Primary keys must be settled first: an edge without an explicit
        // target column points at the target's primary key.
        for schema in &tables {
            if !schema.has_column(&schema.primary_key) {
                return Err(CoreError::UnknownColumn {
                    table: schema.name.to_string(),
                    column: schema.primary_key.clone(),
                });
            }
        }

        for def in self.foreign_keys {
            let from_idx = lookup(&index, &def.table)?;
            let to_idx = lookup(&index, &def.references_table)?;

            let to_column = def
                .references_column
                .unwrap_or_else(|| tables[to_idx].primary_key.clone());
            if !tables[to_idx].has_column(&to_column) {
                return Err(CoreError::UnknownColumn {
                    table: def.references_table,
                    column: to_column,
                });
            }

            let from = &tables[from_idx];
            if !from.has_column(&def.column) {
                return Err(CoreError::UnknownColumn {
                    table: def.table,
                    column: def.column,
                });
            }
            let name = EdgeName::try_new(def.name).ok_or_else(|| CoreError::EmptyName {
                context: format!("foreign key name on table '{}'", def.table),
            })?;
            if RESERVED_NAMES.contains(&name.as_str()) {
                return Err(CoreError::ReservedName {
                    table: def.table,
                    name: name.to_string(),
                });
            }
            if from.edge(&name).is_some() {
                return Err(CoreError::DuplicateEdge {
                    table: def.table,
                    edge: name.to_string(),
                });
            }
            if from.has_column(&name) {
                return Err(CoreError::EdgeShadowsColumn {
                    table: def.table,
                    edge: name.to_string(),
                });
            }

            let edge = ForeignKeyEdge {
                name,
                from_table: from.name.clone(),
                from_column: def.column,
                to_table: tables[to_idx].name.clone(),
                to_column,
                nullable: def.nullable,
            };
            tables[from_idx].edges.push(edge);
        }

        log::debug!(
            "Schema registry built: {} tables, {} foreign keys",
            tables.len(),
            tables.iter().map(|t| t.edges.len()).sum::<usize>()
        );

        Ok(SchemaRegistry { tables, index })
    }
}

fn lookup(index: &HashMap<TableName, usize>, table: &str) -> CoreResult<usize> {
    index
        .get(table)
        .copied()
        .ok_or_else(|| CoreError::UnknownTable {
            table: table.to_string(),
        })
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
