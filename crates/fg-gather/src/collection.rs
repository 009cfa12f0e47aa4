//! Per-call index of fetched rows
//!
//! Rows are keyed by table name, then by primary key. At most one flat model
//! is held per `(table, id)`; a later insert for the same key replaces the
//! earlier one.

use crate::model::{integer_key, FlatModel};
use fg_core::TableName;
use std::collections::HashMap;

/// Index of flat models by table and primary key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelCollection {
    tables: HashMap<TableName, HashMap<i64, FlatModel>>,
}

impl ModelCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a model, returning the one it replaced, if any.
    pub fn insert(&mut self, model: FlatModel) -> Option<FlatModel> {
        self.tables
            .entry(model.table().clone())
            .or_default()
            .insert(model.id(), model)
    }

    pub fn get(&self, table: &str, id: i64) -> Option<&FlatModel> {
        self.tables.get(table)?.get(&id)
    }

    pub fn contains(&self, table: &str, id: i64) -> bool {
        self.get(table, id).is_some()
    }

    /// First model of `table` whose `column` holds the integer `value`.
    ///
    /// Used for edges that reference a column other than the target's
    /// primary key. Ties are broken by lowest primary key so the lookup is
    /// deterministic.
    pub fn find_by_column(&self, table: &str, column: &str, value: i64) -> Option<&FlatModel> {
        self.tables
            .get(table)?
            .values()
            .filter(|model| model.get(column).and_then(integer_key) == Some(value))
            .min_by_key(|model| model.id())
    }

    /// Fold every model of `other` into this collection.
    pub fn merge(&mut self, other: ModelCollection) {
        for (table, models) in other.tables {
            self.tables.entry(table).or_default().extend(models);
        }
    }

    /// Total number of models across all tables.
    pub fn len(&self) -> usize {
        self.tables.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of models held for one table.
    pub fn table_len(&self, table: &str) -> usize {
        self.tables.get(table).map_or(0, HashMap::len)
    }

    /// Tables with at least one model, sorted by name.
    pub fn tables(&self) -> Vec<&TableName> {
        let mut names: Vec<&TableName> = self
            .tables
            .iter()
            .filter(|(_, models)| !models.is_empty())
            .map(|(name, _)| name)
            .collect();
        names.sort();
        names
    }

    /// Every model, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &FlatModel> {
        self.tables.values().flat_map(HashMap::values)
    }
}

impl Extend<FlatModel> for ModelCollection {
    fn extend<I: IntoIterator<Item = FlatModel>>(&mut self, iter: I) {
        for model in iter {
            self.insert(model);
        }
    }
}

impl FromIterator<FlatModel> for ModelCollection {
    fn from_iter<I: IntoIterator<Item = FlatModel>>(iter: I) -> Self {
        let mut collection = Self::new();
        collection.extend(iter);
        collection
    }
}

#[cfg(test)]
#[path = "collection_test.rs"]
mod tests;
