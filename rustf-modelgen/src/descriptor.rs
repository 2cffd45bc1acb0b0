//! Model descriptor: every fact needed to render one model

use crate::classifier::{classify, is_temporal};
use crate::inflect;
use crate::prefix::PrefixSet;
use crate::prompt::AmbiguityResolver;
use crate::relations::RelationInference;
use crate::rules::{synthesize, RuleExpression};
use crate::snapshot::SchemaSnapshot;
use crate::types::{RelationDescriptor, SemanticType, TableDescriptor};
use crate::Result;
use indexmap::IndexMap;
use serde::Serialize;

const DEFAULT_PRIMARY_KEY: &str = "id";
const CREATED_AT: &str = "created_at";
const UPDATED_AT: &str = "updated_at";
const LABEL_PRIORITY: &[&str] = &["title", "name", "key", "id"];

/// A column as it will appear on the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub raw_type: String,
    pub semantic_type: SemanticType,
    pub nullable: bool,
    /// Timestamp-like raw type, listed in the model's dates
    pub temporal: bool,
}

/// Primary key facts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrimaryKey {
    pub name: String,
    pub key_type: SemanticType,
}

impl PrimaryKey {
    pub fn is_incrementing(&self) -> bool {
        self.key_type == SemanticType::Integer
    }

    /// `Some(type)` when the key is not an auto-incrementing integer
    pub fn non_incrementing_type(&self) -> Option<SemanticType> {
        (!self.is_incrementing()).then_some(self.key_type)
    }
}

/// Column used to display a record, with an optional fallback column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelExpression {
    pub primary: String,
    pub fallback: Option<String>,
}

/// Everything the template sink needs to render one model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelDescriptor {
    /// Table name as it exists in the database
    pub table: String,
    /// Table name with the confirmed prefix removed
    pub stripped_table: String,
    pub class_name: String,
    /// snake_case file stem for the generated files
    pub file_name: String,
    pub connection: Option<String>,
    pub fields: Vec<FieldDescriptor>,
    pub fillable: Vec<String>,
    pub hidden: Vec<String>,
    pub dates: Vec<String>,
    pub casts: IndexMap<String, SemanticType>,
    pub rules: IndexMap<String, RuleExpression>,
    pub relations: Vec<RelationDescriptor>,
    pub primary_key: PrimaryKey,
    pub label: Option<LabelExpression>,
    /// Table carries both `created_at` and `updated_at`
    pub timestamps: bool,
}

/// Per-run options that influence descriptors
#[derive(Debug, Clone, Default)]
pub struct DescriptorOptions {
    /// Class name override, only valid for a single table
    pub model_name: Option<String>,
    pub connection: Option<String>,
}

/// Builds descriptors against one schema snapshot and prefix set
pub struct ModelDescriptorBuilder<'a> {
    snapshot: &'a SchemaSnapshot,
    prefixes: &'a PrefixSet,
    options: &'a DescriptorOptions,
}

impl<'a> ModelDescriptorBuilder<'a> {
    pub fn new(
        snapshot: &'a SchemaSnapshot,
        prefixes: &'a PrefixSet,
        options: &'a DescriptorOptions,
    ) -> Self {
        Self {
            snapshot,
            prefixes,
            options,
        }
    }

    pub fn build(
        &self,
        table: &TableDescriptor,
        resolver: &mut dyn AmbiguityResolver,
    ) -> Result<ModelDescriptor> {
        let stripped_table = self.prefixes.strip(&table.name).to_string();
        let class_name = self
            .options
            .model_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| inflect::class_name(&stripped_table));
        let file_name = inflect::to_snake_case(&class_name);

        let fields = fields(table);
        let timestamps = table.has_column(CREATED_AT) && table.has_column(UPDATED_AT);
        let relations = RelationInference::new(self.snapshot, self.prefixes).infer(table, resolver)?;

        log::debug!(
            "Built descriptor for '{}' as {} ({} fields, {} relations)",
            table.name,
            class_name,
            fields.len(),
            relations.len()
        );

        Ok(ModelDescriptor {
            table: table.name.clone(),
            stripped_table,
            class_name,
            file_name,
            connection: self.options.connection.clone(),
            fillable: fillable(&fields),
            hidden: hidden(&fields, timestamps),
            dates: dates(&fields),
            casts: casts(&fields),
            rules: rules(table),
            relations,
            primary_key: primary_key(&fields, table),
            label: label(&fields),
            timestamps,
            fields,
        })
    }
}

fn fields(table: &TableDescriptor) -> Vec<FieldDescriptor> {
    table
        .columns
        .iter()
        .map(|column| FieldDescriptor {
            name: column.name.clone(),
            raw_type: column.raw_type.clone(),
            semantic_type: classify(&column.raw_type),
            nullable: column.nullable,
            temporal: is_temporal(&column.raw_type),
        })
        .collect()
}

fn fillable(fields: &[FieldDescriptor]) -> Vec<String> {
    fields
        .iter()
        .map(|f| f.name.as_str())
        .filter(|name| ![DEFAULT_PRIMARY_KEY, CREATED_AT, UPDATED_AT].contains(name))
        .map(String::from)
        .collect()
}

fn hidden(fields: &[FieldDescriptor], timestamps: bool) -> Vec<String> {
    fields
        .iter()
        .map(|f| f.name.as_str())
        .filter(|name| *name != DEFAULT_PRIMARY_KEY)
        .filter(|name| timestamps || (*name != CREATED_AT && *name != UPDATED_AT))
        .map(String::from)
        .collect()
}

fn dates(fields: &[FieldDescriptor]) -> Vec<String> {
    fields
        .iter()
        .filter(|f| f.semantic_type.is_temporal() || f.temporal)
        .map(|f| f.name.clone())
        .collect()
}

fn casts(fields: &[FieldDescriptor]) -> IndexMap<String, SemanticType> {
    fields
        .iter()
        .filter(|f| f.semantic_type.cast().is_some())
        .map(|f| (f.name.clone(), f.semantic_type))
        .collect()
}

fn rules(table: &TableDescriptor) -> IndexMap<String, RuleExpression> {
    table
        .columns
        .iter()
        .map(|column| (column.name.clone(), synthesize(column)))
        .collect()
}

/// Last column flagged primary wins, `id` otherwise
fn primary_key(fields: &[FieldDescriptor], table: &TableDescriptor) -> PrimaryKey {
    let name = table
        .columns
        .iter()
        .filter(|c| c.is_primary())
        .last()
        .map(|c| c.name.clone())
        .unwrap_or_else(|| DEFAULT_PRIMARY_KEY.to_string());

    let key_type = fields
        .iter()
        .find(|f| f.name == name)
        .map(|f| f.semantic_type)
        .unwrap_or(SemanticType::Integer);

    PrimaryKey { name, key_type }
}

fn label(fields: &[FieldDescriptor]) -> Option<LabelExpression> {
    let mut present = LABEL_PRIORITY
        .iter()
        .filter(|candidate| fields.iter().any(|f| f.name == **candidate));

    let primary = present.next()?;
    Some(LabelExpression {
        primary: primary.to_string(),
        fallback: present.next().map(|c| c.to_string()),
    })
}
