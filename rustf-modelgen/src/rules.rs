//! Validation rule synthesis

use crate::classifier::{classify, extract_length};
use crate::types::{ColumnDescriptor, SemanticType};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

static EMAIL_COLUMN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)email").expect("rules: invalid email column regex"));

/// A single validation clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Clause {
    Nullable,
    Required,
    Boolean,
    Numeric,
    Integer,
    Date,
    Array,
    String,
    Max(u32),
    Email,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Nullable => f.write_str("nullable"),
            Clause::Required => f.write_str("required"),
            Clause::Boolean => f.write_str("boolean"),
            Clause::Numeric => f.write_str("numeric"),
            Clause::Integer => f.write_str("integer"),
            Clause::Date => f.write_str("date"),
            Clause::Array => f.write_str("array"),
            Clause::String => f.write_str("string"),
            Clause::Max(length) => write!(f, "max:{}", length),
            Clause::Email => f.write_str("email"),
        }
    }
}

/// Ordered validation clauses for one column
///
/// When `unique_except_current` is set the rule is emitted as a structured
/// list ending with a uniqueness check that ignores the record being updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleExpression {
    pub clauses: Vec<Clause>,
    pub unique_except_current: bool,
}

impl RuleExpression {
    /// Clause names in order, e.g. `["nullable", "string", "max:255"]`
    pub fn clause_names(&self) -> Vec<String> {
        self.clauses.iter().map(ToString::to_string).collect()
    }

    /// Pipe-joined form, e.g. `nullable|string|max:255`
    pub fn to_flat_string(&self) -> String {
        self.clause_names().join("|")
    }

    pub fn is_structured(&self) -> bool {
        self.unique_except_current
    }
}

/// Synthesize the validation rule for a column
pub fn synthesize(column: &ColumnDescriptor) -> RuleExpression {
    let semantic = classify(&column.raw_type);
    let mut clauses = Vec::new();

    let nullable = if column.name == "id" {
        semantic == SemanticType::Integer
    } else {
        column.nullable
    };
    clauses.push(if nullable {
        Clause::Nullable
    } else {
        Clause::Required
    });

    match semantic {
        SemanticType::Boolean => clauses.push(Clause::Boolean),
        SemanticType::Integer => {
            clauses.push(Clause::Numeric);
            clauses.push(Clause::Integer);
        }
        SemanticType::Float => clauses.push(Clause::Numeric),
        SemanticType::Date | SemanticType::DateTime | SemanticType::Time => {
            clauses.push(Clause::Date)
        }
        SemanticType::ArrayBlob => clauses.push(Clause::Array),
        SemanticType::String => {
            clauses.push(Clause::String);
            if let Some(length) = extract_length(&column.raw_type) {
                clauses.push(Clause::Max(length));
            }
            if EMAIL_COLUMN.is_match(&column.name) {
                clauses.push(Clause::Email);
            }
        }
    }

    RuleExpression {
        clauses,
        unique_except_current: column.is_unique(),
    }
}
