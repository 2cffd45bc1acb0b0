//! End-to-end generation against a temporary project directory

use rustf_modelgen::codegen::FileSink;
use rustf_modelgen::emit::FileAction;
use rustf_modelgen::prompt::{AlwaysConfirm, FailOnAmbiguity, NeverConfirm};
use rustf_modelgen::{
    ColumnDescriptor, GenerateOptions, Generator, KeyRole, SchemaSnapshot, TableDescriptor,
};
use std::fs;
use tempfile::TempDir;

const WRAPPER_TEMPLATE: &str = "\
include!(\"base/{{file_name}}.inc.rs\");

impl {{model_name}} {}
";

const BASE_TEMPLATE: &str = "\
pub struct {{model_name}} {
{{struct_fields}}
}

impl {{model_name}} {
    pub const TABLE: &'static str = \"{{table_name}}\";
    pub const CONNECTION: Option<&'static str> = {{connection}};
    pub const FILLABLE: &'static [&'static str] = &[{{fillable}}];
    pub const DATES: &'static [&'static str] = &[{{dates}}];

{{relations}}
}

impl {{base_class}} for {{model_name}} {}
";

fn shop_snapshot() -> SchemaSnapshot {
    SchemaSnapshot::new(vec![
        TableDescriptor::new(
            "t_customer_orders",
            vec![
                ColumnDescriptor::new("id", "int(10)").key_role(KeyRole::Primary),
                ColumnDescriptor::new("customer_id", "int(10)"),
                ColumnDescriptor::new("total", "decimal(10,2)"),
                ColumnDescriptor::new("created_at", "timestamp").nullable(true),
            ],
        ),
        TableDescriptor::new(
            "t_customers",
            vec![
                ColumnDescriptor::new("id", "int(10)").key_role(KeyRole::Primary),
                ColumnDescriptor::new("name", "varchar(100)"),
                ColumnDescriptor::new("email", "varchar(150)").key_role(KeyRole::Unique),
            ],
        ),
    ])
}

fn sink() -> FileSink {
    FileSink::new(WRAPPER_TEMPLATE, BASE_TEMPLATE)
}

fn options(dir: &TempDir, tables: &[&str]) -> GenerateOptions {
    GenerateOptions {
        tables: tables.iter().map(|t| t.to_string()).collect(),
        folder: dir.path().join("src/models"),
        ..GenerateOptions::default()
    }
}

#[test]
fn test_generates_wrapper_and_base_files() {
    let dir = TempDir::new().unwrap();
    let snapshot = shop_snapshot();
    let generator = Generator::new(&snapshot, options(&dir, &["t_customer_orders"]));

    let report = generator
        .run(&mut sink(), &mut AlwaysConfirm, &mut FailOnAmbiguity)
        .unwrap();
    assert!(report.is_success());
    assert!(report.prefixes.contains("t_"));

    let wrapper = fs::read_to_string(dir.path().join("src/models/customer_order.rs")).unwrap();
    assert!(wrapper.contains("include!(\"base/customer_order.inc.rs\");"));
    assert!(wrapper.contains("impl CustomerOrder {}"));

    let base =
        fs::read_to_string(dir.path().join("src/models/base/customer_order.inc.rs")).unwrap();
    assert!(base.contains("pub const TABLE: &'static str = \"t_customer_orders\";"));
    assert!(base.contains("pub const CONNECTION: Option<&'static str> = None;"));
    assert!(base.contains("pub const FILLABLE: &'static [&'static str] = &[\"customer_id\", \"total\"];"));
    assert!(base.contains("pub const DATES: &'static [&'static str] = &[\"created_at\"];"));
    assert!(base.contains("pub created_at: Option<chrono::DateTime<chrono::Utc>>,"));
    assert!(base.contains("pub async fn customer(&self)"));
    assert!(base.contains("impl rustf::models::BaseModel for CustomerOrder {}"));
    assert!(!base.contains("{{"));
}

#[test]
fn test_second_run_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let snapshot = shop_snapshot();
    let generator = Generator::new(&snapshot, options(&dir, &["t_customers"]));
    let wrapper_path = dir.path().join("src/models/customer.rs");
    let base_path = dir.path().join("src/models/base/customer.inc.rs");

    generator
        .run(&mut sink(), &mut AlwaysConfirm, &mut FailOnAmbiguity)
        .unwrap();
    let first_base = fs::read(&base_path).unwrap();

    fs::write(&wrapper_path, "// hand written\n").unwrap();

    let report = generator
        .run(&mut sink(), &mut AlwaysConfirm, &mut FailOnAmbiguity)
        .unwrap();
    assert_eq!(report.count(FileAction::Preserved), 1);
    assert_eq!(report.count(FileAction::Updated), 1);

    assert_eq!(fs::read_to_string(&wrapper_path).unwrap(), "// hand written\n");
    assert_eq!(fs::read(&base_path).unwrap(), first_base);
}

#[test]
fn test_connection_namespace_and_base_class_flow_into_output() {
    let dir = TempDir::new().unwrap();
    let snapshot = shop_snapshot();
    let generator = Generator::new(
        &snapshot,
        GenerateOptions {
            connection: Some("reporting".to_string()),
            namespace: Some("crate/domain/".to_string()),
            base_class: Some("crate::support::Model".to_string()),
            table_prefix: Some("t".to_string()),
            ..options(&dir, &["t_customers"])
        },
    );

    generator
        .run(&mut sink(), &mut NeverConfirm, &mut FailOnAmbiguity)
        .unwrap();
    let base = fs::read_to_string(dir.path().join("src/models/base/customer.inc.rs")).unwrap();

    assert!(base.contains("= Some(\"reporting\");"));
    assert!(base.contains("rustf::error::Result<Vec<crate::domain::customer_order::CustomerOrder>>"));
    assert!(base.contains("impl crate::support::Model for Customer {}"));
}

#[test]
fn test_colliding_model_files_keep_the_first_table() {
    let dir = TempDir::new().unwrap();
    let id = || ColumnDescriptor::new("id", "int(10)").key_role(KeyRole::Primary);
    let snapshot = SchemaSnapshot::new(vec![
        TableDescriptor::new("orders", vec![id()]),
        TableDescriptor::new("shop_orders", vec![id()]),
        TableDescriptor::new("shop_products", vec![id()]),
    ]);
    let generator = Generator::new(
        &snapshot,
        GenerateOptions {
            all: true,
            folder: dir.path().join("src/models"),
            ..GenerateOptions::default()
        },
    );

    let report = generator
        .run(&mut sink(), &mut AlwaysConfirm, &mut FailOnAmbiguity)
        .unwrap();

    assert!(!report.is_success());
    assert_eq!(report.failures[0].table, "shop_orders");
    let base = fs::read_to_string(dir.path().join("src/models/base/order.inc.rs")).unwrap();
    assert!(base.contains("pub const TABLE: &'static str = \"orders\";"));
    assert!(dir.path().join("src/models/base/product.inc.rs").exists());
}

#[test]
fn test_rejected_prefix_keeps_full_names() {
    let dir = TempDir::new().unwrap();
    let snapshot = shop_snapshot();
    let generator = Generator::new(&snapshot, options(&dir, &["t_customers"]));

    let report = generator
        .run(&mut sink(), &mut NeverConfirm, &mut FailOnAmbiguity)
        .unwrap();
    assert!(report.prefixes.is_empty());
    assert!(dir.path().join("src/models/t_customer.rs").exists());
    assert!(dir.path().join("src/models/base/t_customer.inc.rs").exists());
}

#[test]
fn test_ambiguity_failure_is_reported_per_table() {
    let dir = TempDir::new().unwrap();
    let snapshot = SchemaSnapshot::new(vec![
        TableDescriptor::new(
            "comments",
            vec![
                ColumnDescriptor::new("id", "int(10)"),
                ColumnDescriptor::new("post_id", "int(10)"),
            ],
        ),
        TableDescriptor::new("blog_posts", vec![ColumnDescriptor::new("id", "int(10)")]),
        TableDescriptor::new("forum_posts", vec![ColumnDescriptor::new("id", "int(10)")]),
    ]);
    let generator = Generator::new(&snapshot, options(&dir, &["comments", "blog_posts"]));

    let report = generator
        .run(&mut sink(), &mut NeverConfirm, &mut FailOnAmbiguity)
        .unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].table, "comments");
    assert!(!dir.path().join("src/models/comment.rs").exists());
    assert!(dir.path().join("src/models/blog_post.rs").exists());
}
