//! SELECT-with-LEFT-JOIN query builder
//!
//! Every selected column is labelled `alias.column` so a flat result row can
//! be split back into one fragment per alias without knowing the SQL.

use crate::dialect::SqlDialect;
use crate::error::{SqlError, SqlResult};
use crate::predicate::Predicate;
use std::collections::HashSet;

/// Result-row label of `column` selected through `alias`.
pub fn column_label(alias: &str, column: &str) -> String {
    format!("{alias}.{column}")
}

/// One `LEFT JOIN table AS alias ON alias.column = parent_alias.parent_column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinStep {
    /// Joined table
    pub table: String,
    /// Alias the joined table is known by
    pub alias: String,
    /// Join column on the joined table
    pub column: String,
    /// Alias the join hangs off
    pub parent_alias: String,
    /// Join column on the parent alias
    pub parent_column: String,
}

/// A single SELECT over a root table and any number of LEFT JOINs.
#[derive(Debug, Clone)]
pub struct SelectQuery {
    root_table: String,
    root_alias: String,
    joins: Vec<JoinStep>,
    selections: Vec<(String, Vec<String>)>,
    predicate: Option<Predicate>,
    aliases: HashSet<String>,
}

impl SelectQuery {
    /// Start a query over `root_table`, known in SQL as `root_alias`.
    pub fn new(root_table: &str, root_alias: &str) -> Self {
        Self {
            root_table: root_table.to_string(),
            root_alias: root_alias.to_string(),
            joins: Vec::new(),
            selections: Vec::new(),
            predicate: None,
            aliases: HashSet::from([root_alias.to_string()]),
        }
    }

    pub fn root_alias(&self) -> &str {
        &self.root_alias
    }

    pub fn joins(&self) -> &[JoinStep] {
        &self.joins
    }

    /// Add a LEFT JOIN. The alias must be new and the parent alias known.
    pub fn left_join(&mut self, step: JoinStep) -> SqlResult<&mut Self> {
        if !self.aliases.contains(&step.parent_alias) {
            return Err(SqlError::UnknownAlias(step.parent_alias));
        }
        if !self.aliases.insert(step.alias.clone()) {
            return Err(SqlError::DuplicateAlias(step.alias));
        }
        self.joins.push(step);
        Ok(self)
    }

    /// Select `columns` through `alias`, labelled `alias.column`.
    pub fn select<I, S>(&mut self, alias: &str, columns: I) -> SqlResult<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !self.aliases.contains(alias) {
            return Err(SqlError::UnknownAlias(alias.to_string()));
        }
        self.selections.push((
            alias.to_string(),
            columns.into_iter().map(Into::into).collect(),
        ));
        Ok(self)
    }

    /// Restrict root rows; repeated calls are combined with AND.
    pub fn filter(&mut self, predicate: Predicate) -> &mut Self {
        self.predicate = Some(match self.predicate.take() {
            Some(existing) => existing.and(predicate),
            None => predicate,
        });
        self
    }

    /// Render the query.
    pub fn to_sql(&self, dialect: &dyn SqlDialect) -> SqlResult<String> {
        let q = |ident: &str| dialect.quote_ident(ident);

        let columns: Vec<String> = self
            .selections
            .iter()
            .flat_map(|(alias, columns)| {
                columns.iter().map(move |column| {
                    format!(
                        "{}.{} AS {}",
                        q(alias),
                        q(column),
                        q(&column_label(alias, column))
                    )
                })
            })
            .collect();

        let mut sql = if columns.is_empty() {
            "SELECT *".to_string()
        } else {
            format!("SELECT {}", columns.join(", "))
        };
        sql.push_str(&format!(
            "\nFROM {} AS {}",
            quote_table(dialect, &self.root_table),
            q(&self.root_alias)
        ));

        for join in &self.joins {
            sql.push_str(&format!(
                "\nLEFT JOIN {} AS {} ON {}.{} = {}.{}",
                quote_table(dialect, &join.table),
                q(&join.alias),
                q(&join.alias),
                q(&join.column),
                q(&join.parent_alias),
                q(&join.parent_column)
            ));
        }

        if let Some(predicate) = &self.predicate {
            sql.push_str("\nWHERE ");
            sql.push_str(&predicate.to_sql(&self.root_alias, dialect)?);
        }

        Ok(sql)
    }
}

/// Quote a potentially schema-qualified table name part by part.
fn quote_table(dialect: &dyn SqlDialect, name: &str) -> String {
    name.split('.')
        .map(|part| dialect.quote_ident(part))
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
#[path = "select_test.rs"]
mod tests;
