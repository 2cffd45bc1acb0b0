//! Placeholder map construction from a model descriptor

use super::TemplateVars;
use crate::descriptor::{FieldDescriptor, ModelDescriptor};
use crate::inflect;
use crate::rules::RuleExpression;
use crate::types::{RelationDescriptor, RelationKind, SemanticType};

pub const DEFAULT_BASE_CLASS: &str = "rustf::models::BaseModel";
pub const DEFAULT_NAMESPACE: &str = "crate::models";

/// Column a `*_id` foreign key points at
const OWNER_KEY: &str = "id";

/// Output settings shared by every model of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    /// Module path the generated models live under, e.g. `crate::models`
    pub namespace: String,
    /// Trait path implemented by every generated model
    pub base_class: String,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            base_class: DEFAULT_BASE_CLASS.to_string(),
        }
    }
}

impl RenderContext {
    /// Full path of a related model, e.g. `crate::models::customer::Customer`
    pub fn model_path(&self, class_name: &str) -> String {
        format!(
            "{}::{}::{}",
            self.namespace,
            inflect::to_snake_case(class_name),
            class_name
        )
    }
}

const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "if", "impl", "in", "let",
    "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return",
    "static", "struct", "trait", "true", "try", "type", "typeof", "union", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be written as raw identifiers
const NON_RAW_KEYWORDS: &[&str] = &["crate", "self", "Self", "super"];

/// Rust identifier for a column: `r#type`, `self_`, or the name itself
fn field_ident(name: &str) -> String {
    if NON_RAW_KEYWORDS.contains(&name) {
        format!("{}_", name)
    } else if RUST_KEYWORDS.contains(&name) {
        format!("r#{}", name)
    } else {
        name.to_string()
    }
}

/// Rust type for a field, wrapped in `Option` when nullable
pub fn rust_type(field: &FieldDescriptor) -> String {
    let base = base_rust_type(field);
    if field.nullable {
        format!("Option<{}>", base)
    } else {
        base.to_string()
    }
}

fn base_rust_type(field: &FieldDescriptor) -> &'static str {
    match field.semantic_type {
        SemanticType::Boolean => "bool",
        SemanticType::Integer => "i64",
        SemanticType::Float => "f64",
        SemanticType::Date => "chrono::NaiveDate",
        SemanticType::DateTime => "chrono::NaiveDateTime",
        SemanticType::Time => "chrono::NaiveTime",
        SemanticType::ArrayBlob => "serde_json::Value",
        // timestamp columns classify as strings but hold instants
        SemanticType::String if field.temporal => "chrono::DateTime<chrono::Utc>",
        SemanticType::String => "String",
    }
}

fn quoted_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| format!("{:?}", item.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn option_literal(value: Option<&str>) -> String {
    match value {
        Some(value) => format!("Some({:?})", value),
        None => "None".to_string(),
    }
}

/// Clause list literal for one column
///
/// Unique columns end with `unique:<table>,<column>,ignore_current`.
pub fn rule_expression(table: &str, column: &str, rule: &RuleExpression) -> String {
    let mut clauses = rule.clause_names();
    if rule.is_structured() {
        clauses.push(format!("unique:{},{},ignore_current", table, column));
    }
    format!("&[{}]", quoted_list(&clauses))
}

fn struct_fields(model: &ModelDescriptor) -> String {
    model
        .fields
        .iter()
        .map(|field| {
            let ident = field_ident(&field.name);
            let rename = if NON_RAW_KEYWORDS.contains(&field.name.as_str()) {
                format!("    #[serde(rename = {:?})]\n", field.name)
            } else {
                String::new()
            };
            format!(
                "    /// `{}`\n{}    pub {}: {},",
                field.raw_type,
                rename,
                ident,
                rust_type(field)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn field_values(model: &ModelDescriptor) -> String {
    model
        .fields
        .iter()
        .map(|field| {
            format!(
                "            {:?} => Ok(SqlValue::from(self.{}.clone())),",
                field.name,
                field_ident(&field.name)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `(IdType, body of id())` for the primary key
fn primary_key_access(model: &ModelDescriptor) -> (String, String) {
    let key = &model.primary_key.name;
    match model.fields.iter().find(|f| &f.name == key) {
        Some(field) if field.nullable => (
            base_rust_type(field).to_string(),
            format!("self.{}.clone().unwrap_or_default()", field_ident(key)),
        ),
        Some(field) => (
            base_rust_type(field).to_string(),
            format!("self.{}.clone()", field_ident(key)),
        ),
        None => ("i64".to_string(), "Default::default()".to_string()),
    }
}

fn casts(model: &ModelDescriptor) -> String {
    model
        .casts
        .iter()
        .filter_map(|(name, ty)| ty.cast().map(|cast| format!("({:?}, {:?})", name, cast)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn rules(model: &ModelDescriptor) -> String {
    model
        .rules
        .iter()
        .map(|(column, rule)| {
            format!(
                "        ({:?}, {}),",
                column,
                rule_expression(&model.table, column, rule)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `Option<String>` expression reading one field
fn label_value(field: &FieldDescriptor) -> String {
    let name = field_ident(&field.name);
    if field.nullable {
        format!("self.{}.as_ref().map(|v| v.to_string())", name)
    } else {
        format!("Some(self.{}.to_string())", name)
    }
}

/// Body of the generated `label()` method
fn label_body(model: &ModelDescriptor) -> String {
    let Some(label) = &model.label else {
        return "None".to_string();
    };
    let field = |name: &str| model.fields.iter().find(|f| f.name == name);

    let primary = match field(&label.primary) {
        Some(f) => label_value(f),
        None => return "None".to_string(),
    };
    match label.fallback.as_deref().and_then(field) {
        Some(fallback) => format!("{}\n            .or_else(|| {})", primary, label_value(fallback)),
        None => primary,
    }
}

fn relation_method(relation: &RelationDescriptor, ctx: &RenderContext) -> String {
    let related = ctx.model_path(&relation.related_model_name);
    let accessor = field_ident(&relation.accessor_name);
    match relation.kind {
        RelationKind::BelongsTo | RelationKind::ParentSelf => {
            let doc = if relation.kind == RelationKind::ParentSelf {
                "Parent record in"
            } else {
                "Belongs to"
            };
            format!(
                "    /// {} `{}` through `{}`\n    pub async fn {}(&self) -> rustf::error::Result<Option<{}>> {{\n        {}::query()?\n            .where_eq({:?}, self.{}.clone())\n            .get_first()\n            .await\n    }}",
                doc,
                relation.related_table,
                relation.local_column,
                accessor,
                related,
                related,
                OWNER_KEY,
                field_ident(&relation.local_column)
            )
        }
        RelationKind::HasMany => format!(
            "    /// Has many `{}` through `{}`\n    pub async fn {}(&self) -> rustf::error::Result<Vec<{}>> {{\n        {}::query()?\n            .where_eq({:?}, self.id())\n            .get_all()\n            .await\n    }}",
            relation.related_table,
            relation.local_column,
            accessor,
            related,
            related,
            relation.local_column
        ),
    }
}

fn relations(model: &ModelDescriptor, ctx: &RenderContext) -> String {
    model
        .relations
        .iter()
        .map(|relation| relation_method(relation, ctx))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the placeholder map shared by the wrapper and base templates
pub fn placeholders(model: &ModelDescriptor, ctx: &RenderContext) -> TemplateVars {
    let mut vars = TemplateVars::new();
    let mut set = |key: &str, value: String| {
        vars.insert(key.to_string(), value);
    };

    set("model_name", model.class_name.clone());
    set("table_name", model.table.clone());
    set("file_name", model.file_name.clone());
    set("namespace", ctx.namespace.clone());
    set("base_class", ctx.base_class.clone());
    set("connection", option_literal(model.connection.as_deref()));

    set("primary_key", model.primary_key.name.clone());
    set("key_type", model.primary_key.key_type.to_string());
    set("incrementing", model.primary_key.is_incrementing().to_string());
    set(
        "key_annotation",
        match model.primary_key.non_incrementing_type() {
            Some(ty) => format!("/// Non-incrementing key of type {}\n    ", ty),
            None => String::new(),
        },
    );
    set("timestamps", model.timestamps.to_string());

    let (id_type, id_body) = primary_key_access(model);
    set("id_type", id_type);
    set("id_body", id_body);
    set("field_values", field_values(model));

    set("struct_fields", struct_fields(model));
    set("fillable", quoted_list(&model.fillable));
    set("hidden", quoted_list(&model.hidden));
    set("dates", quoted_list(&model.dates));
    set("casts", casts(model));
    set("rules", rules(model));

    let label = model.label.as_ref();
    set(
        "label_column",
        option_literal(label.map(|l| l.primary.as_str())),
    );
    set(
        "label_fallback",
        option_literal(label.and_then(|l| l.fallback.as_deref())),
    );

    set("label_body", label_body(model));
    set("relations", relations(model, ctx));

    vars
}
