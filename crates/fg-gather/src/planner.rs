//! Join planning over the foreign-key graph
//!
//! The planner expands the graph from the root table one level per unit of
//! depth. At each node every declared edge gets a fresh alias and a LEFT
//! JOIN step before any of them is expanded further, so sibling joins are
//! numbered together. The depth counter alone bounds cycles; a table may be
//! visited many times under different aliases.

use crate::error::GatherResult;
use fg_core::{CoreError, GatherDepth, SchemaRegistry, TableName};
use fg_sql::{JoinStep, Predicate, SelectQuery};

/// A table as it appears in the query, under one alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasedTable {
    pub alias: String,
    pub table: TableName,
}

/// The full set of joins and aliases needed to fetch a depth-bounded subtree
/// in one query.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinPlan {
    root: AliasedTable,
    depth: GatherDepth,
    aliases: Vec<AliasedTable>,
    joins: Vec<JoinStep>,
}

struct AliasAllocator<'a> {
    root_alias: &'a str,
    next: usize,
}

impl AliasAllocator<'_> {
    fn allocate(&mut self) -> String {
        loop {
            self.next += 1;
            let alias = format!("fk{}", self.next);
            if alias != self.root_alias {
                return alias;
            }
        }
    }
}

impl JoinPlan {
    /// Plan the joins reaching every row `depth` hops from `table`.
    ///
    /// The root is aliased by its own table name. Fails only when `table` is
    /// not registered.
    pub fn build(
        registry: &SchemaRegistry,
        table: &str,
        depth: GatherDepth,
    ) -> GatherResult<Self> {
        let root_schema = registry.require_table(table)?;
        let root = AliasedTable {
            alias: root_schema.name().to_string(),
            table: root_schema.name().clone(),
        };

        let mut plan = Self {
            root: root.clone(),
            depth,
            aliases: vec![root.clone()],
            joins: Vec::new(),
        };
        let mut allocator = AliasAllocator {
            root_alias: &root.alias,
            next: 0,
        };
        plan.expand(registry, &root, depth, &mut allocator);

        log::debug!(
            "Planned {} join(s) for '{}' at depth {}",
            plan.joins.len(),
            table,
            depth
        );
        Ok(plan)
    }

    fn expand(
        &mut self,
        registry: &SchemaRegistry,
        node: &AliasedTable,
        remaining: GatherDepth,
        allocator: &mut AliasAllocator<'_>,
    ) {
        let Some(child_depth) = remaining.child() else {
            return;
        };

        let mut children = Vec::new();
        for edge in registry.edges(&node.table) {
            let child = AliasedTable {
                alias: allocator.allocate(),
                table: edge.to_table.clone(),
            };
            self.joins.push(JoinStep {
                table: edge.to_table.to_string(),
                alias: child.alias.clone(),
                column: edge.to_column.clone(),
                parent_alias: node.alias.clone(),
                parent_column: edge.from_column.clone(),
            });
            self.aliases.push(child.clone());
            children.push(child);
        }

        for child in &children {
            self.expand(registry, child, child_depth, allocator);
        }
    }

    pub fn root(&self) -> &AliasedTable {
        &self.root
    }

    pub fn depth(&self) -> GatherDepth {
        self.depth
    }

    /// Every alias in the query, root first.
    pub fn aliases(&self) -> &[AliasedTable] {
        &self.aliases
    }

    pub fn joins(&self) -> &[JoinStep] {
        &self.joins
    }

    /// Turn the plan into a query, selecting every column of every alias and
    /// restricting root rows with `predicate`.
    ///
    /// Columns named by structured predicate nodes must exist on the root
    /// table.
    pub fn to_query(
        &self,
        registry: &SchemaRegistry,
        predicate: Option<&Predicate>,
    ) -> GatherResult<SelectQuery> {
        let root_schema = registry.require_table(&self.root.table)?;

        let mut query = SelectQuery::new(&self.root.table, &self.root.alias);
        for step in &self.joins {
            query.left_join(step.clone())?;
        }
        for aliased in &self.aliases {
            let schema = registry.require_table(&aliased.table)?;
            query.select(&aliased.alias, schema.columns().iter().cloned())?;
        }

        if let Some(predicate) = predicate {
            if let Some(column) = predicate
                .columns()
                .into_iter()
                .find(|column| !root_schema.has_column(column))
            {
                return Err(CoreError::UnknownColumn {
                    table: self.root.table.to_string(),
                    column: column.to_string(),
                }
                .into());
            }
            query.filter(predicate.clone());
        }

        Ok(query)
    }
}

#[cfg(test)]
#[path = "planner_test.rs"]
mod tests;
