//! Emission orchestration: table selection, descriptor building and file output

use crate::codegen::{placeholders, RenderContext, TemplateKind, TemplateSink};
use crate::codegen::render::{DEFAULT_BASE_CLASS, DEFAULT_NAMESPACE};
use crate::descriptor::{DescriptorOptions, ModelDescriptor, ModelDescriptorBuilder};
use crate::prefix::{self, PrefixSet};
use crate::prompt::{AmbiguityResolver, PrefixConfirmer};
use crate::snapshot::SchemaSnapshot;
use crate::{GeneratorError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_FOLDER: &str = "src/models";
const BASE_FOLDER: &str = "base";

/// Options for one generation run
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Explicit tables, in the order they should be processed
    pub tables: Vec<String>,
    /// Generate every table of the snapshot
    pub all: bool,
    /// Class name override, single table only
    pub model_name: Option<String>,
    pub base_class: Option<String>,
    /// Prefix override, skips interactive detection
    pub table_prefix: Option<String>,
    /// Keep only tables carrying a confirmed prefix
    pub prefixed_only: bool,
    /// Output folder for the editable files; base files go to `<folder>/base`
    pub folder: PathBuf,
    pub namespace: Option<String>,
    pub connection: Option<String>,
    /// Dump every descriptor as JSON
    pub debug: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            tables: Vec::new(),
            all: false,
            model_name: None,
            base_class: None,
            table_prefix: None,
            prefixed_only: false,
            folder: PathBuf::from(DEFAULT_FOLDER),
            namespace: None,
            connection: None,
            debug: false,
        }
    }
}

impl GenerateOptions {
    /// Reject inconsistent selectors before anything is written
    pub fn validate(&self) -> Result<()> {
        let requested = self.requested_tables();
        if requested.is_empty() && !self.all {
            return Err(GeneratorError::Config(
                "no table selected: pass table names or use --all".to_string(),
            ));
        }

        if self.model_name.is_some() && (self.all || requested.len() != 1) {
            return Err(GeneratorError::Config(
                "--model-name can only be used with exactly one table".to_string(),
            ));
        }

        Ok(())
    }

    /// Explicit tables, trimmed, without blanks or repeats
    pub fn requested_tables(&self) -> Vec<String> {
        let mut requested: Vec<String> = Vec::new();
        for table in &self.tables {
            let table = table.trim();
            if !table.is_empty() && !requested.iter().any(|t| t == table) {
                requested.push(table.to_string());
            }
        }
        requested
    }

    pub fn render_context(&self) -> RenderContext {
        RenderContext {
            namespace: normalize_namespace(self.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE)),
            base_class: self
                .base_class
                .as_deref()
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .unwrap_or(DEFAULT_BASE_CLASS)
                .to_string(),
        }
    }

    fn descriptor_options(&self) -> DescriptorOptions {
        DescriptorOptions {
            model_name: self.model_name.clone(),
            connection: self.connection.clone(),
        }
    }
}

/// Turn `crate/models/` or `crate\models` into `crate::models`
pub fn normalize_namespace(namespace: &str) -> String {
    let normalized = namespace.trim().replace(['/', '\\'], "::");
    let trimmed = normalized.trim_matches(':');
    if trimmed.is_empty() {
        DEFAULT_NAMESPACE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// What happened to one output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Created,
    /// Base file rewritten over a previous version
    Updated,
    /// Editable file left untouched
    Preserved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub table: String,
    pub kind: TemplateKind,
    pub path: PathBuf,
    pub action: FileAction,
}

#[derive(Debug)]
pub struct TableFailure {
    pub table: String,
    pub error: GeneratorError,
}

/// Outcome of a generation run
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub prefixes: PrefixSet,
    pub files: Vec<GeneratedFile>,
    pub failures: Vec<TableFailure>,
}

impl GenerationReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn count(&self, action: FileAction) -> usize {
        self.files.iter().filter(|f| f.action == action).count()
    }

    /// Tables for which both files were handled
    pub fn models(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.kind == TemplateKind::Base)
            .count()
    }
}

/// Drives one generation run over a snapshot
pub struct Generator<'a> {
    snapshot: &'a SchemaSnapshot,
    options: GenerateOptions,
}

impl<'a> Generator<'a> {
    pub fn new(snapshot: &'a SchemaSnapshot, options: GenerateOptions) -> Self {
        Self { snapshot, options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Generate every selected table
    ///
    /// Configuration errors abort before anything is written. Per-table
    /// failures are collected in the report and the run continues.
    pub fn run(
        &self,
        sink: &mut dyn TemplateSink,
        confirmer: &mut dyn PrefixConfirmer,
        resolver: &mut dyn AmbiguityResolver,
    ) -> Result<GenerationReport> {
        self.options.validate()?;

        let prefixes = match self.options.table_prefix.as_deref() {
            Some(prefix) if !prefix.trim().is_empty() => {
                log::debug!("Using table prefix override '{}'", prefix);
                PrefixSet::from_override(prefix)
            }
            _ => prefix::detect(&self.snapshot.table_names(), confirmer),
        };

        let selected = self.select_tables(&prefixes);
        log::info!("Generating models for {} table(s)", selected.len());

        let ctx = self.options.render_context();
        let descriptor_options = self.options.descriptor_options();
        let builder = ModelDescriptorBuilder::new(self.snapshot, &prefixes, &descriptor_options);

        let mut report = GenerationReport::default();
        // file name -> table that produced it
        let mut owners: HashMap<String, String> = HashMap::new();
        for name in selected {
            let Some(table) = self.snapshot.table(&name) else {
                log::warn!("Table '{}' does not exist in the schema", name);
                report.failures.push(TableFailure {
                    error: GeneratorError::TableNotFound(name.clone()),
                    table: name,
                });
                continue;
            };

            let outcome = match builder.build(table, resolver) {
                Ok(model) => match owners.get(&model.file_name).cloned() {
                    Some(existing) => Err(GeneratorError::DuplicateModel {
                        table: model.table.clone(),
                        file_name: model.file_name.clone(),
                        existing,
                    }),
                    None => {
                        owners.insert(model.file_name.clone(), model.table.clone());
                        self.emit(&model, &ctx, sink)
                    }
                },
                Err(error) => Err(error),
            };

            match outcome {
                Ok(files) => report.files.extend(files),
                Err(error) => {
                    log::warn!("Failed to generate '{}': {}", name, error);
                    report.failures.push(TableFailure { table: name, error });
                }
            }
        }

        report.prefixes = prefixes;
        Ok(report)
    }

    fn select_tables(&self, prefixes: &PrefixSet) -> Vec<String> {
        let mut selected: Vec<String> = if self.options.all {
            self.snapshot
                .table_names()
                .into_iter()
                .map(String::from)
                .collect()
        } else {
            self.options.requested_tables()
        };

        if self.options.prefixed_only {
            if prefixes.is_empty() {
                log::warn!("--prefixed-only given but no table prefix was confirmed");
            }
            selected.retain(|t| prefixes.matches(t));
        }

        selected
    }

    fn emit(
        &self,
        model: &ModelDescriptor,
        ctx: &RenderContext,
        sink: &mut dyn TemplateSink,
    ) -> Result<Vec<GeneratedFile>> {
        if self.options.debug {
            log::info!(
                "Descriptor for '{}':\n{}",
                model.table,
                serde_json::to_string_pretty(model)?
            );
        }

        let vars = placeholders(model, ctx);
        let (editable_path, base_path) = output_paths(&self.options.folder, &model.file_name);
        let mut files = Vec::with_capacity(2);

        let editable_action = if sink.exists(&editable_path) {
            log::info!(
                "Preserving existing model: {}",
                editable_path.display()
            );
            FileAction::Preserved
        } else {
            sink.render(TemplateKind::Editable, &vars, &editable_path)?;
            FileAction::Created
        };
        files.push(GeneratedFile {
            table: model.table.clone(),
            kind: TemplateKind::Editable,
            path: editable_path,
            action: editable_action,
        });

        let base_existed = sink.exists(&base_path);
        sink.render(TemplateKind::Base, &vars, &base_path)?;
        files.push(GeneratedFile {
            table: model.table.clone(),
            kind: TemplateKind::Base,
            path: base_path,
            action: if base_existed {
                FileAction::Updated
            } else {
                FileAction::Created
            },
        });

        Ok(files)
    }
}

/// `(<folder>/<file>.rs, <folder>/base/<file>.inc.rs)`
pub fn output_paths(folder: &Path, file_name: &str) -> (PathBuf, PathBuf) {
    (
        folder.join(format!("{}.rs", file_name)),
        folder.join(BASE_FOLDER).join(format!("{}.inc.rs", file_name)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{process_template, TemplateVars};
    use crate::prompt::{AlwaysConfirm, FailOnAmbiguity, NeverConfirm};
    use crate::types::{ColumnDescriptor, KeyRole, TableDescriptor};
    use indexmap::IndexMap;

    /// In-memory sink recording every render
    #[derive(Default)]
    struct MemorySink {
        files: IndexMap<PathBuf, String>,
        renders: usize,
    }

    impl TemplateSink for MemorySink {
        fn exists(&self, path: &Path) -> bool {
            self.files.contains_key(path)
        }

        fn render(&mut self, kind: TemplateKind, vars: &TemplateVars, path: &Path) -> Result<()> {
            let template = match kind {
                TemplateKind::Editable => "editable {{model_name}}",
                TemplateKind::Base => "base {{model_name}} {{table_name}}",
            };
            self.renders += 1;
            self.files
                .insert(path.to_path_buf(), process_template(template, vars));
            Ok(())
        }
    }

    fn snapshot() -> SchemaSnapshot {
        let id = || ColumnDescriptor::new("id", "int(10)").key_role(KeyRole::Primary);
        SchemaSnapshot::new(vec![
            TableDescriptor::new("shop_orders", vec![id(), ColumnDescriptor::new("product_id", "int")]),
            TableDescriptor::new("shop_products", vec![id()]),
            TableDescriptor::new("users", vec![id()]),
        ])
    }

    fn options(tables: &[&str]) -> GenerateOptions {
        GenerateOptions {
            tables: tables.iter().map(|t| t.to_string()).collect(),
            ..GenerateOptions::default()
        }
    }

    #[test]
    fn test_validate_requires_selector() {
        assert!(matches!(
            GenerateOptions::default().validate(),
            Err(GeneratorError::Config(_))
        ));
        assert!(options(&["users"]).validate().is_ok());
    }

    #[test]
    fn test_validate_model_name_needs_single_table() {
        let mut opts = options(&["users", "shop_orders"]);
        opts.model_name = Some("Account".to_string());
        assert!(opts.validate().is_err());

        let mut opts = GenerateOptions {
            all: true,
            ..GenerateOptions::default()
        };
        opts.model_name = Some("Account".to_string());
        assert!(opts.validate().is_err());

        let mut opts = options(&["users"]);
        opts.model_name = Some("Account".to_string());
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_validate_counts_requested_tables_after_trimming() {
        let mut opts = options(&["users", "", " users "]);
        opts.model_name = Some("Account".to_string());
        assert_eq!(opts.requested_tables(), vec!["users"]);
        assert!(opts.validate().is_ok());

        let opts = options(&[" ", ""]);
        assert!(matches!(opts.validate(), Err(GeneratorError::Config(_))));
    }

    #[test]
    fn test_config_error_writes_nothing() {
        let snapshot = snapshot();
        let generator = Generator::new(&snapshot, GenerateOptions::default());
        let mut sink = MemorySink::default();

        let result = generator.run(&mut sink, &mut AlwaysConfirm, &mut FailOnAmbiguity);
        assert!(result.is_err());
        assert_eq!(sink.renders, 0);
    }

    #[test]
    fn test_normalize_namespace() {
        assert_eq!(normalize_namespace("crate/models/"), "crate::models");
        assert_eq!(normalize_namespace("crate\\domain\\models"), "crate::domain::models");
        assert_eq!(normalize_namespace("crate::models::"), "crate::models");
        assert_eq!(normalize_namespace("  "), DEFAULT_NAMESPACE);
    }

    #[test]
    fn test_all_tables_with_detected_prefix() {
        let snapshot = snapshot();
        let generator = Generator::new(
            &snapshot,
            GenerateOptions {
                all: true,
                ..GenerateOptions::default()
            },
        );
        let mut sink = MemorySink::default();
        let report = generator
            .run(&mut sink, &mut AlwaysConfirm, &mut FailOnAmbiguity)
            .unwrap();

        assert!(report.is_success());
        assert!(report.prefixes.contains("shop_"));
        assert_eq!(report.models(), 3);
        assert_eq!(
            sink.files[Path::new("src/models/order.rs")],
            "editable Order"
        );
        assert_eq!(
            sink.files[Path::new("src/models/base/product.inc.rs")],
            "base Product shop_products"
        );
    }

    #[test]
    fn test_prefixed_only_filters_selection() {
        let snapshot = snapshot();
        let generator = Generator::new(
            &snapshot,
            GenerateOptions {
                all: true,
                prefixed_only: true,
                ..GenerateOptions::default()
            },
        );

        let mut sink = MemorySink::default();
        let report = generator
            .run(&mut sink, &mut AlwaysConfirm, &mut FailOnAmbiguity)
            .unwrap();
        let tables: Vec<_> = report
            .files
            .iter()
            .filter(|f| f.kind == TemplateKind::Base)
            .map(|f| f.table.as_str())
            .collect();
        assert_eq!(tables, vec!["shop_orders", "shop_products"]);

        let mut sink = MemorySink::default();
        let report = generator
            .run(&mut sink, &mut NeverConfirm, &mut FailOnAmbiguity)
            .unwrap();
        assert!(report.files.is_empty());
    }

    #[test]
    fn test_unknown_table_is_reported_and_run_continues() {
        let snapshot = snapshot();
        let mut opts = options(&["missing", "users"]);
        opts.table_prefix = Some("shop".to_string());
        let generator = Generator::new(&snapshot, opts);
        let mut sink = MemorySink::default();

        let report = generator
            .run(&mut sink, &mut NeverConfirm, &mut FailOnAmbiguity)
            .unwrap();

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].table, "missing");
        assert!(matches!(
            report.failures[0].error,
            GeneratorError::TableNotFound(_)
        ));
        assert_eq!(report.models(), 1);
    }

    #[test]
    fn test_second_run_preserves_editable_and_updates_base() {
        let snapshot = snapshot();
        let generator = Generator::new(&snapshot, options(&["users"]));
        let mut sink = MemorySink::default();

        let first = generator
            .run(&mut sink, &mut NeverConfirm, &mut FailOnAmbiguity)
            .unwrap();
        assert_eq!(first.count(FileAction::Created), 2);

        let second = generator
            .run(&mut sink, &mut NeverConfirm, &mut FailOnAmbiguity)
            .unwrap();
        assert_eq!(second.count(FileAction::Preserved), 1);
        assert_eq!(second.count(FileAction::Updated), 1);
        assert_eq!(sink.renders, 3);
    }

    #[test]
    fn test_tables_sharing_a_model_file_fail_instead_of_overwriting() {
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
                ..GenerateOptions::default()
            },
        );
        let mut sink = MemorySink::default();

        let report = generator
            .run(&mut sink, &mut AlwaysConfirm, &mut FailOnAmbiguity)
            .unwrap();

        assert!(!report.is_success());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].table, "shop_orders");
        assert!(matches!(
            &report.failures[0].error,
            GeneratorError::DuplicateModel { file_name, existing, .. }
                if file_name == "order" && existing == "orders"
        ));
        assert_eq!(
            sink.files[Path::new("src/models/base/order.inc.rs")],
            "base Order orders"
        );
        assert_eq!(report.models(), 2);
    }

    #[test]
    fn test_model_name_override_drives_file_name() {
        let snapshot = snapshot();
        let mut opts = options(&["users"]);
        opts.model_name = Some("Account".to_string());
        opts.folder = PathBuf::from("app/models");
        let generator = Generator::new(&snapshot, opts);
        let mut sink = MemorySink::default();

        generator
            .run(&mut sink, &mut NeverConfirm, &mut FailOnAmbiguity)
            .unwrap();
        assert!(sink.exists(Path::new("app/models/account.rs")));
        assert!(sink.exists(Path::new("app/models/base/account.inc.rs")));
    }
}
