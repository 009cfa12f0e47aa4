//! Flat and gathered models
//!
//! Both serialise to the same flattened JSON shape: `depth` and `table`
//! first, then the row's own columns, then (for gathered models) one slot per
//! foreign-key edge holding the nested model or `null`.

use fg_core::{EdgeName, GatherDepth, TableName};
use fg_db::Row;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

/// Read a JSON value as an integer key.
///
/// Integral floats are accepted, since some drivers hand back numeric keys
/// as doubles.
pub(crate) fn integer_key(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    // i64::MAX as f64 rounds up to 2^63, so the upper bound must be exclusive.
    if f.is_finite() && f.fract() == 0.0 && f >= I64_LOWER && f < I64_UPPER {
        Some(f as i64)
    } else {
        None
    }
}

/// A row with only its own table's columns populated.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatModel {
    table: TableName,
    id: i64,
    columns: Row,
}

impl FlatModel {
    /// Wrap the columns of one row of `table` whose primary key is `id`.
    pub fn new(table: TableName, id: i64, columns: Row) -> Self {
        Self { table, id, columns }
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    /// Primary key.
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn columns(&self) -> &Row {
        &self.columns
    }

    /// Value of one column; `None` when the column was not fetched.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }
}

impl Serialize for FlatModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len() + 2))?;
        map.serialize_entry("depth", &0u32)?;
        map.serialize_entry("table", &self.table)?;
        for (column, value) in &self.columns {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// A row with its foreign-key slots resolved, annotated with the depth it
/// was reconstructed at.
///
/// At depth 0 there are no slots and the model carries exactly the flat
/// row. Two occurrences of the same underlying row are independent values;
/// their depth annotations may differ.
#[derive(Debug, Clone, PartialEq)]
pub struct GatheredModel {
    table: TableName,
    id: i64,
    depth: GatherDepth,
    columns: Row,
    references: Vec<(EdgeName, Option<GatheredModel>)>,
}

impl GatheredModel {
    pub(crate) fn new(
        flat: &FlatModel,
        depth: GatherDepth,
        references: Vec<(EdgeName, Option<GatheredModel>)>,
    ) -> Self {
        Self {
            table: flat.table.clone(),
            id: flat.id,
            depth,
            columns: flat.columns.clone(),
            references,
        }
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    /// Primary key.
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn depth(&self) -> GatherDepth {
        self.depth
    }

    pub fn columns(&self) -> &Row {
        &self.columns
    }

    /// Value of one of the row's own columns.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    /// Whether the model has a slot for `edge` (false at depth 0).
    pub fn has_slot(&self, edge: &str) -> bool {
        self.references.iter().any(|(name, _)| name == edge)
    }

    /// Referenced model under `edge`; `None` when the slot is null or absent.
    pub fn reference(&self, edge: &str) -> Option<&GatheredModel> {
        self.references
            .iter()
            .find(|(name, _)| name == edge)
            .and_then(|(_, model)| model.as_ref())
    }

    /// Foreign-key slots in edge declaration order.
    pub fn slots(&self) -> impl Iterator<Item = (&EdgeName, Option<&GatheredModel>)> {
        self.references
            .iter()
            .map(|(name, model)| (name, model.as_ref()))
    }

    /// Strip the slots, keeping only the row's own columns.
    pub fn to_flat(&self) -> FlatModel {
        FlatModel::new(self.table.clone(), self.id, self.columns.clone())
    }

    /// Render as a JSON value.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

impl From<FlatModel> for GatheredModel {
    fn from(flat: FlatModel) -> Self {
        Self {
            table: flat.table,
            id: flat.id,
            depth: GatherDepth::ZERO,
            columns: flat.columns,
            references: Vec::new(),
        }
    }
}

impl Serialize for GatheredModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.columns.len() + self.references.len() + 2;
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("depth", &self.depth)?;
        map.serialize_entry("table", &self.table)?;
        for (column, value) in &self.columns {
            map.serialize_entry(column, value)?;
        }
        for (edge, model) in &self.references {
            map.serialize_entry(edge, model)?;
        }
        map.end()
    }
}
