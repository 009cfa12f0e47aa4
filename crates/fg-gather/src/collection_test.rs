use super::*;
use fg_db::Row;
use serde_json::{json, Value};

fn model(table: &str, id: i64, columns: Value) -> FlatModel {
    let columns: Row = match columns {
        Value::Object(map) => map,
        _ => Row::new(),
    };
    FlatModel::new(TableName::new(table), id, columns)
}

#[test]
fn test_insert_and_get() {
    let mut collection = ModelCollection::new();
    assert!(collection.is_empty());

    collection.insert(model("user", 5, json!({"id": 5, "name": "Alice"})));
    collection.insert(model("media_item", 1, json!({"id": 1})));

    assert_eq!(collection.len(), 2);
    assert!(collection.contains("user", 5));
    assert!(!collection.contains("user", 1));
    assert_eq!(
        collection.get("user", 5).unwrap().get("name"),
        Some(&json!("Alice"))
    );
    assert!(collection.get("post", 5).is_none());
}

#[test]
fn test_insert_same_key_replaces() {
    let mut collection = ModelCollection::new();
    assert!(collection
        .insert(model("user", 5, json!({"id": 5, "name": "Alice"})))
        .is_none());
    let previous = collection.insert(model("user", 5, json!({"id": 5, "name": "Alicia"})));

    assert_eq!(previous.unwrap().get("name"), Some(&json!("Alice")));
    assert_eq!(collection.len(), 1);
    assert_eq!(
        collection.get("user", 5).unwrap().get("name"),
        Some(&json!("Alicia"))
    );
}

#[test]
fn test_merge() {
    let mut left: ModelCollection = [
        model("user", 5, json!({"id": 5})),
        model("media_item", 1, json!({"id": 1})),
    ]
    .into_iter()
    .collect();
    let right: ModelCollection = [
        model("user", 6, json!({"id": 6})),
        model("media_item", 1, json!({"id": 1})),
    ]
    .into_iter()
    .collect();

    left.merge(right);

    assert_eq!(left.len(), 3);
    assert_eq!(left.table_len("user"), 2);
    assert_eq!(left.table_len("media_item"), 1);
}

#[test]
fn test_tables_sorted() {
    let collection: ModelCollection = [
        model("user", 5, json!({"id": 5})),
        model("media_item", 1, json!({"id": 1})),
    ]
    .into_iter()
    .collect();
    assert_eq!(collection.tables(), vec!["media_item", "user"]);
    assert_eq!(collection.iter().count(), 2);
}

#[test]
fn test_find_by_column() {
    let collection: ModelCollection = [
        model("account", 3, json!({"id": 3, "code": 70})),
        model("account", 2, json!({"id": 2, "code": 70})),
        model("account", 1, json!({"id": 1, "code": 10})),
    ]
    .into_iter()
    .collect();

    assert_eq!(collection.find_by_column("account", "code", 70).unwrap().id(), 2);
    assert_eq!(collection.find_by_column("account", "code", 10).unwrap().id(), 1);
    assert!(collection.find_by_column("account", "code", 99).is_none());
    assert!(collection.find_by_column("missing", "code", 10).is_none());
}
