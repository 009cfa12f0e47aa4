use super::*;

fn blog_builder() -> SchemaBuilder {
    SchemaBuilder::new()
        .table("media_item", ["id", "url"])
        .table("user", ["id", "name", "avatar_img_id"])
        .table("post", ["id", "title", "author_id", "cover_id"])
        .nullable_foreign_key("user", "avatar_img", "avatar_img_id", "media_item")
        .foreign_key("post", "author", "author_id", "user")
        .nullable_foreign_key("post", "cover", "cover_id", "media_item")
}

#[test]
fn test_build_registers_tables_and_edges() {
    let registry = blog_builder().build().unwrap();

    assert_eq!(registry.len(), 3);
    assert!(registry.contains("post"));

    let post = registry.table("post").unwrap();
    assert_eq!(post.primary_key(), "id");
    let names: Vec<&str> = post.edges().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["author", "cover"]);

    let author = post.edge("author").unwrap();
    assert_eq!(author.from_table, "post");
    assert_eq!(author.from_column, "author_id");
    assert_eq!(author.to_table, "user");
    assert_eq!(author.to_column, "id");
    assert!(!author.nullable);
    assert!(post.edge("cover").unwrap().nullable);
}

#[test]
fn test_edges_of_unknown_table_is_empty() {
    let registry = blog_builder().build().unwrap();
    assert!(registry.edges("nope").is_empty());
    assert!(registry.edges("media_item").is_empty());
}

#[test]
fn test_require_table_unknown() {
    let registry = blog_builder().build().unwrap();
    let err = registry.require_table("comment").unwrap_err();
    assert!(matches!(err, CoreError::UnknownTable { table } if table == "comment"));
}

#[test]
fn test_self_reference_is_allowed() {
    let registry = SchemaBuilder::new()
        .table("category", ["id", "name", "parent_id"])
        .nullable_foreign_key("category", "parent", "parent_id", "category")
        .build()
        .unwrap();
    let edge = &registry.edges("category")[0];
    assert_eq!(edge.from_table, edge.to_table);
}

#[test]
fn test_custom_primary_key_is_edge_target() {
    let registry = SchemaBuilder::new()
        .table("account", ["account_no", "owner"])
        .primary_key("account", "account_no")
        .table("invoice", ["id", "account_ref"])
        .foreign_key("invoice", "account", "account_ref", "account")
        .build()
        .unwrap();
    assert_eq!(registry.table("account").unwrap().primary_key(), "account_no");
    assert_eq!(registry.edges("invoice")[0].to_column, "account_no");
}

#[test]
fn test_explicit_target_column() {
    let registry = SchemaBuilder::new()
        .table("country", ["id", "iso_code"])
        .table("city", ["id", "country_code"])
        .add_foreign_key(ForeignKeyDef {
            table: "city".into(),
            name: "country".into(),
            column: "country_code".into(),
            references_table: "country".into(),
            references_column: Some("iso_code".into()),
            nullable: false,
        })
        .build()
        .unwrap();
    assert_eq!(registry.edges("city")[0].to_column, "iso_code");
}

#[test]
fn test_missing_primary_key_column() {
    let err = SchemaBuilder::new()
        .table("tag", ["slug"])
        .build()
        .unwrap_err();
    assert!(matches!(err, CoreError::UnknownColumn { column, .. } if column == "id"));
}

#[test]
fn test_duplicate_table() {
    let err = SchemaBuilder::new()
        .table("user", ["id"])
        .table("user", ["id"])
        .build()
        .unwrap_err();
    assert!(matches!(err, CoreError::DuplicateTable { .. }));
}

#[test]
fn test_empty_columns() {
    let err = SchemaBuilder::new()
        .table("user", Vec::<String>::new())
        .build()
        .unwrap_err();
    assert!(matches!(err, CoreError::EmptyColumns { .. }));
}

#[test]
fn test_duplicate_column() {
    let err = SchemaBuilder::new()
        .table("user", ["id", "name", "name"])
        .build()
        .unwrap_err();
    assert!(matches!(err, CoreError::DuplicateColumn { column, .. } if column == "name"));
}

#[test]
fn test_foreign_key_to_unknown_table() {
    let err = SchemaBuilder::new()
        .table("user", ["id", "avatar_img_id"])
        .foreign_key("user", "avatar_img", "avatar_img_id", "media_item")
        .build()
        .unwrap_err();
    assert!(matches!(err, CoreError::UnknownTable { table } if table == "media_item"));
}

#[test]
fn test_foreign_key_on_unknown_column() {
    let err = SchemaBuilder::new()
        .table("media_item", ["id"])
        .table("user", ["id"])
        .foreign_key("user", "avatar_img", "avatar_img_id", "media_item")
        .build()
        .unwrap_err();
    assert!(matches!(err, CoreError::UnknownColumn { column, .. } if column == "avatar_img_id"));
}

#[test]
fn test_duplicate_edge_name() {
    let err = blog_builder()
        .foreign_key("post", "author", "author_id", "user")
        .build()
        .unwrap_err();
    assert!(matches!(err, CoreError::DuplicateEdge { edge, .. } if edge == "author"));
}

#[test]
fn test_edge_name_shadowing_column() {
    let err = SchemaBuilder::new()
        .table("user", ["id", "manager"])
        .foreign_key("user", "manager", "manager", "user")
        .build()
        .unwrap_err();
    assert!(matches!(err, CoreError::EdgeShadowsColumn { .. }));
}

#[test]
fn test_reserved_names_rejected() {
    let err = SchemaBuilder::new()
        .table("event", ["id", "depth"])
        .build()
        .unwrap_err();
    assert!(matches!(err, CoreError::ReservedName { ref name, .. } if name == "depth"));

    let err = SchemaBuilder::new()
        .table("media_item", ["id"])
        .table("user", ["id", "avatar_id"])
        .foreign_key("user", "table", "avatar_id", "media_item")
        .build()
        .unwrap_err();
    assert!(matches!(err, CoreError::ReservedName { ref table, ref name } if table == "user" && name == "table"));
}
