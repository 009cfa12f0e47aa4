//! Splitting flat result rows into per-alias models

use crate::collection::ModelCollection;
use crate::error::{GatherError, GatherResult};
use crate::model::{integer_key, FlatModel};
use crate::planner::JoinPlan;
use fg_core::SchemaRegistry;
use fg_db::Row;
use fg_sql::column_label;
use serde_json::Value;
use std::collections::HashMap;

/// The models found in one result row, by alias. Aliases whose LEFT JOIN
/// matched nothing are absent.
pub type ParsedRow = HashMap<String, FlatModel>;

/// Extract every alias's columns from every row and index the resulting
/// models in `collection`.
///
/// An alias is skipped for a row when its primary key is null or missing. A
/// primary key that is present but not an integer is an error.
pub fn parse_rows(
    rows: &[Row],
    plan: &JoinPlan,
    registry: &SchemaRegistry,
    collection: &mut ModelCollection,
) -> GatherResult<Vec<ParsedRow>> {
    let mut layouts = Vec::with_capacity(plan.aliases().len());
    for aliased in plan.aliases() {
        let schema = registry.require_table(&aliased.table)?;
        let labels: Vec<(String, &str)> = schema
            .columns()
            .iter()
            .map(|column| (column_label(&aliased.alias, column), column.as_str()))
            .collect();
        let pk_label = column_label(&aliased.alias, schema.primary_key());
        layouts.push((aliased, schema.primary_key(), pk_label, labels));
    }

    let mut parsed = Vec::with_capacity(rows.len());
    for row in rows {
        let mut found = ParsedRow::new();
        for (aliased, pk_column, pk_label, labels) in &layouts {
            let id = match row.get(pk_label) {
                None | Some(Value::Null) => continue,
                Some(value) => integer_key(value).ok_or_else(|| GatherError::InvalidPrimaryKey {
                    table: aliased.table.to_string(),
                    column: pk_column.to_string(),
                    value: value.to_string(),
                })?,
            };

            let columns: Row = labels
                .iter()
                .map(|(label, column)| {
                    let value = row.get(label).cloned().unwrap_or(Value::Null);
                    (column.to_string(), value)
                })
                .collect();
            let model = FlatModel::new(aliased.table.clone(), id, columns);
            collection.insert(model.clone());
            found.insert(aliased.alias.clone(), model);
        }
        parsed.push(found);
    }

    log::debug!(
        "Parsed {} row(s); collection holds {} model(s)",
        parsed.len(),
        collection.len()
    );
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fg_core::{GatherDepth, SchemaBuilder};
    use serde_json::json;

    fn setup() -> (SchemaRegistry, JoinPlan) {
        let registry = SchemaBuilder::new()
            .table("media_item", ["id", "url"])
            .table("user", ["id", "name", "avatar_img_id"])
            .nullable_foreign_key("user", "avatar_img", "avatar_img_id", "media_item")
            .build()
            .unwrap();
        let plan = JoinPlan::build(&registry, "user", GatherDepth::new(1)).unwrap();
        (registry, plan)
    }

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => Row::new(),
        }
    }

    #[test]
    fn test_splits_aliases_and_dedups() {
        let (registry, plan) = setup();
        let rows = vec![
            row(json!({
                "user.id": 5, "user.name": "Alice", "user.avatar_img_id": 1,
                "fk1.id": 1, "fk1.url": "a.png"
            })),
            row(json!({
                "user.id": 8, "user.name": "Bob", "user.avatar_img_id": 1,
                "fk1.id": 1, "fk1.url": "a.png"
            })),
        ];
        let mut collection = ModelCollection::new();
        let parsed = parse_rows(&rows, &plan, &registry, &mut collection).unwrap();

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["user"].id(), 5);
        assert_eq!(parsed[0]["fk1"].get("url"), Some(&json!("a.png")));
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.table_len("media_item"), 1);
    }

    #[test]
    fn test_unmatched_join_is_skipped() {
        let (registry, plan) = setup();
        let rows = vec![row(json!({
            "user.id": 6, "user.name": "Carol", "user.avatar_img_id": null,
            "fk1.id": null, "fk1.url": null
        }))];
        let mut collection = ModelCollection::new();
        let parsed = parse_rows(&rows, &plan, &registry, &mut collection).unwrap();

        assert!(parsed[0].contains_key("user"));
        assert!(!parsed[0].contains_key("fk1"));
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn test_missing_columns_become_null() {
        let (registry, plan) = setup();
        let rows = vec![row(json!({"user.id": 5}))];
        let mut collection = ModelCollection::new();
        parse_rows(&rows, &plan, &registry, &mut collection).unwrap();

        let user = collection.get("user", 5).unwrap();
        assert_eq!(user.get("name"), Some(&Value::Null));
        assert_eq!(user.columns().len(), 3);
    }

    #[test]
    fn test_non_integer_primary_key() {
        let (registry, plan) = setup();
        let rows = vec![row(json!({"user.id": "five"}))];
        let mut collection = ModelCollection::new();
        let err = parse_rows(&rows, &plan, &registry, &mut collection).unwrap_err();
        assert!(matches!(
            err,
            GatherError::InvalidPrimaryKey { table, column, .. } if table == "user" && column == "id"
        ));
    }
}
