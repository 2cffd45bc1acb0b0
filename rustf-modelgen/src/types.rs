//! Core data types shared by the inference engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key role reported by the schema provider for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyRole {
    #[default]
    None,
    Primary,
    Unique,
}

impl KeyRole {
    /// Parse the MySQL `COLUMN_KEY` notation (`PRI`, `UNI`, anything else)
    pub fn from_column_key(key: &str) -> Self {
        match key.trim().to_ascii_uppercase().as_str() {
            "PRI" => KeyRole::Primary,
            "UNI" => KeyRole::Unique,
            _ => KeyRole::None,
        }
    }
}

/// A column as described by the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub raw_type: String,
    pub nullable: bool,
    pub key_role: KeyRole,
    pub default_value: Option<String>,
}

impl ColumnDescriptor {
    /// Create a non-nullable column without key role or default
    pub fn new(name: impl Into<String>, raw_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_type: raw_type.into(),
            nullable: false,
            key_role: KeyRole::None,
            default_value: None,
        }
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn key_role(mut self, key_role: KeyRole) -> Self {
        self.key_role = key_role;
        self
    }

    pub fn is_primary(&self) -> bool {
        self.key_role == KeyRole::Primary
    }

    pub fn is_unique(&self) -> bool {
        self.key_role == KeyRole::Unique
    }
}

/// A table and its columns in provider order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub name: String,
    pub columns: Vec<ColumnDescriptor>,
}

impl TableDescriptor {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDescriptor>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }
}

/// Semantic type derived from a raw column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Boolean,
    Integer,
    Float,
    String,
    Date,
    DateTime,
    Time,
    ArrayBlob,
}

impl SemanticType {
    /// Date, DateTime and Time
    pub fn is_temporal(self) -> bool {
        matches!(
            self,
            SemanticType::Date | SemanticType::DateTime | SemanticType::Time
        )
    }

    /// Cast name for the model's cast table, `None` for types that are not cast
    pub fn cast(self) -> Option<&'static str> {
        match self {
            SemanticType::Boolean => Some("boolean"),
            SemanticType::Integer => Some("integer"),
            SemanticType::Float => Some("float"),
            SemanticType::ArrayBlob => Some("array"),
            SemanticType::String
            | SemanticType::Date
            | SemanticType::DateTime
            | SemanticType::Time => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SemanticType::Boolean => "boolean",
            SemanticType::Integer => "integer",
            SemanticType::Float => "float",
            SemanticType::String => "string",
            SemanticType::Date => "date",
            SemanticType::DateTime => "datetime",
            SemanticType::Time => "time",
            SemanticType::ArrayBlob => "array",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of an inferred relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    BelongsTo,
    HasMany,
    ParentSelf,
}

/// An inferred relation between two models
///
/// For `HasMany`, `local_column` is the key column that lives on the related
/// table and points back at this model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDescriptor {
    pub kind: RelationKind,
    pub local_column: String,
    pub related_table: String,
    pub related_model_name: String,
    pub accessor_name: String,
}
