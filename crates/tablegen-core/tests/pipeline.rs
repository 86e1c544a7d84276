//! End-to-end generation runs against in-memory schema sources.

use std::collections::BTreeMap;
use std::fs;

use tablegen_core::config::TableGenConfig;
use tablegen_core::output::workspace::Workspace;
use tablegen_core::pipeline::{generate_types, link_tables, GenerateOptions};
use tablegen_core::schema::introspect::SchemaSource;
use tablegen_core::schema::memory::MemorySource;
use tablegen_core::schema::types::Column;
use tablegen_testutil::{
    blog_source, dangling_reference_source, ecommerce_source, reserved_words_source,
    self_referential_source, snapshot_dir, unusual_names_source,
};

async fn run(source: &MemorySource, root: &std::path::Path) -> BTreeMap<String, String> {
    let report = generate_types(source, &GenerateOptions::new(root))
        .await
        .expect("generation failed");
    snapshot_dir(&report.tables_dir)
}

#[tokio::test]
async fn test_blog_scenario() {
    let root = tempfile::tempdir().unwrap();
    let files = run(&blog_source(), root.path()).await;

    assert_eq!(
        files["users.ts"],
        "import type { posts } from './posts';\n\n\
         export type users = {\n    id: number;\n    name?: string;\n    posts: posts[];\n}\n"
    );
    assert_eq!(
        files["posts.ts"],
        "import type { users } from './users';\n\n\
         export type posts = {\n    id: number;\n    title?: string;\n    user_id: number;\n    users: users[];\n}\n"
    );
    assert_eq!(
        files["index.ts"],
        "import type { users } from './users';\nimport type { posts } from './posts';\n\n\
         export type Tables = {\n    users: users[];\n    posts: posts[];\n}\n"
    );
    assert_eq!(files.len(), 3);
    assert!(root.path().join("generated").join("views").is_dir());
}

#[tokio::test]
async fn test_rerun_is_byte_identical() {
    let root = tempfile::tempdir().unwrap();
    let source = ecommerce_source();

    let first = run(&source, root.path()).await;
    let second = run(&source, root.path()).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_second_link_pass_changes_nothing() {
    let root = tempfile::tempdir().unwrap();
    let source = ecommerce_source();
    let options = GenerateOptions::new(root.path());

    let report = generate_types(&source, &options).await.unwrap();
    let before = snapshot_dir(&report.tables_dir);

    let workspace = Workspace::from_tables_dir(&report.tables_dir);
    let tables = source.list_public_tables().await.unwrap();
    let again = link_tables(&source, &workspace, &options.reserved, &tables)
        .await
        .unwrap();

    assert!(again.is_unchanged());
    assert_eq!(snapshot_dir(&report.tables_dir), before);
}

#[tokio::test]
async fn test_every_table_has_a_module_and_an_index_entry() {
    let root = tempfile::tempdir().unwrap();
    let source = ecommerce_source();
    let files = run(&source, root.path()).await;

    let tables = source.list_public_tables().await.unwrap();
    assert_eq!(files.len(), tables.len() + 1);

    let index = &files["index.ts"];
    for table in &tables {
        assert!(files.contains_key(&format!("{}.ts", table.name)));
        assert_eq!(
            index
                .matches(&format!("    {}: {}[];\n", table.name, table.name))
                .count(),
            1,
            "index entry for {}",
            table.name
        );
    }
}

#[tokio::test]
async fn test_relationships_are_bidirectional() {
    let root = tempfile::tempdir().unwrap();
    let source = ecommerce_source();
    let files = run(&source, root.path()).await;

    for table in source.list_public_tables().await.unwrap() {
        for fk in source.list_foreign_keys(&table.name).await.unwrap() {
            let owner = &files[&format!("{}.ts", table.name)];
            let target = &files[&format!("{}.ts", fk.referenced_table)];

            let forward = format!("    {}: {}[];\n", fk.referenced_table, fk.referenced_table);
            let reverse = format!("    {}: {}[];\n", table.name, table.name);
            assert_eq!(owner.matches(&forward).count(), 1, "{} -> {}", table.name, fk.referenced_table);
            assert_eq!(target.matches(&reverse).count(), 1, "{} <- {}", fk.referenced_table, table.name);
        }
    }

    // Two foreign keys to the same parent still yield one property each way.
    assert!(files["orders.ts"].contains("import type { users } from './users';\n"));
    assert_eq!(files["orders.ts"].matches("import type").count(), 2);
    assert_eq!(files["users.ts"].matches("orders: orders[];").count(), 1);
}

#[tokio::test]
async fn test_self_reference_has_no_self_import() {
    let root = tempfile::tempdir().unwrap();
    let files = run(&self_referential_source(), root.path()).await;

    assert_eq!(
        files["employees.ts"],
        "export type employees = {\n    id: number;\n    manager_id?: number;\n    employees: employees[];\n}\n"
    );

    let shop = tempfile::tempdir().unwrap();
    let files = run(&ecommerce_source(), shop.path()).await;
    assert!(!files["categories.ts"].contains("import type { categories }"));
    assert_eq!(files["categories.ts"].matches("categories: categories[];").count(), 1);
}

#[tokio::test]
async fn test_reserved_words_are_escaped() {
    let root = tempfile::tempdir().unwrap();
    let files = run(&reserved_words_source(), root.path()).await;

    assert!(!files.contains_key("class.ts"));
    assert_eq!(
        files["_class.ts"],
        "import type { students } from './students';\n\n\
         export type _class = {\n    id: number;\n    _default?: boolean;\n    students: students[];\n}\n"
    );
    assert_eq!(
        files["students.ts"],
        "import type { _class } from './_class';\n\n\
         export type students = {\n    id: number;\n    class_id: number;\n    _type?: string;\n    _class: _class[];\n}\n"
    );
    assert!(files["index.ts"].contains("import type { _class } from './_class';\n"));
    assert!(files["index.ts"].contains("    class: _class[];\n"));
    assert!(files["index.ts"].contains("    students: students[];\n"));
}

#[tokio::test]
async fn test_unlisted_reference_gets_placeholder() {
    let root = tempfile::tempdir().unwrap();
    let source = dangling_reference_source();
    let report = generate_types(&source, &GenerateOptions::new(root.path()))
        .await
        .unwrap();
    let files = snapshot_dir(&report.tables_dir);

    assert_eq!(report.link.placeholders_created, 1);
    assert_eq!(
        files["users.ts"],
        "import type { posts } from './posts';\n\nexport type users = {\n    posts: posts[];\n}\n"
    );
    assert!(files["posts.ts"].contains("    users: users[];\n"));
    assert!(!files["index.ts"].contains("users"));
}

#[tokio::test]
async fn test_stale_modules_are_removed() {
    let root = tempfile::tempdir().unwrap();
    let first = generate_types(&blog_source(), &GenerateOptions::new(root.path()))
        .await
        .unwrap();
    fs::write(first.tables_dir.join("dropped_table.ts"), "export type dropped_table = {\n}\n").unwrap();

    let files = run(&blog_source(), root.path()).await;
    assert!(!files.contains_key("dropped_table.ts"));
    assert_eq!(files.len(), 3);
}

#[tokio::test]
async fn test_config_overrides_apply() {
    let config: TableGenConfig = toml::from_str(
        r#"
[types]
integer = "bigint"

[naming]
reserved = ["users"]
"#,
    )
    .unwrap();

    let root = tempfile::tempdir().unwrap();
    let options = GenerateOptions::from_config(root.path(), &config);
    let report = generate_types(&blog_source(), &options).await.unwrap();
    let files = snapshot_dir(&report.tables_dir);

    assert!(files.contains_key("_users.ts"));
    assert!(files["_users.ts"].contains("    id: bigint;\n"));
    assert!(files["_users.ts"].contains("    posts: posts[];\n"));
    assert!(files["posts.ts"].contains("import type { _users } from './_users';\n"));
    assert!(files["posts.ts"].contains("    _users: _users[];\n"));
    assert!(files["index.ts"].contains("    users: _users[];\n"));
}

#[tokio::test]
async fn test_report_counts() {
    let root = tempfile::tempdir().unwrap();
    let report = generate_types(&blog_source(), &GenerateOptions::new(root.path()))
        .await
        .unwrap();

    assert_eq!(report.primary_modules(), 2);
    assert_eq!(report.tables, vec!["users", "posts"]);
    assert_eq!(report.link.properties_added, 2);
    assert_eq!(report.link.imports_added, 2);
    assert_eq!(report.link.placeholders_created, 0);
    assert_eq!(report.index_path, report.tables_dir.join("index.ts"));
}

#[tokio::test]
async fn test_non_identifier_names_generate_and_link() {
    let root = tempfile::tempdir().unwrap();
    let source = unusual_names_source();
    let report = generate_types(&source, &GenerateOptions::new(root.path()))
        .await
        .unwrap();
    let files = snapshot_dir(&report.tables_dir);

    assert_eq!(
        files["order_items.ts"],
        "import type { orders } from './orders';\nimport type { line_items } from './line_items';\n\n\
         export type order_items = {\n    id: number;\n    order_id: number;\n    line_id?: number;\n    \
         'first name'?: string;\n    orders: orders[];\n    line_items: line_items[];\n}\n"
    );
    assert_eq!(
        files["orders.ts"],
        "import type { order_items } from './order_items';\n\n\
         export type orders = {\n    id: number;\n    order_items: order_items[];\n}\n"
    );
    assert_eq!(
        files["line_items.ts"],
        "import type { order_items } from './order_items';\n\n\
         export type line_items = {\n    order_items: order_items[];\n}\n"
    );
    assert!(files["index.ts"].contains("import type { order_items } from './order_items';\n"));
    assert!(files["index.ts"].contains("    'order-items': order_items[];\n"));
    assert_eq!(report.link.placeholders_created, 1);

    let workspace = Workspace::from_tables_dir(&report.tables_dir);
    let tables = source.list_public_tables().await.unwrap();
    let reserved = GenerateOptions::new(root.path()).reserved;
    let relink = link_tables(&source, &workspace, &reserved, &tables)
        .await
        .unwrap();
    assert!(relink.is_unchanged());
    assert_eq!(snapshot_dir(&report.tables_dir), files);
}

#[tokio::test]
async fn test_colliding_module_identifiers_do_not_abort() {
    let root = tempfile::tempdir().unwrap();
    let source = MemorySource::new()
        .table("class", vec![Column::new("id", "integer", false)])
        .table("_class", vec![Column::new("code", "text", false)]);

    let files = run(&source, root.path()).await;
    assert_eq!(
        files["_class.ts"],
        "export type _class = {\n    code: string;\n}\n"
    );
    assert!(files["index.ts"].contains("    class: _class[];\n"));
    assert!(files["index.ts"].contains("    _class: _class[];\n"));
}
