//! Schema snapshot fetched once per run

use crate::types::TableDescriptor;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Every table of the active schema with its columns, in provider order
///
/// The snapshot is read-only once built and is passed explicitly to every
/// component that needs to look across tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    tables: Vec<TableDescriptor>,
}

impl SchemaSnapshot {
    pub fn new(tables: Vec<TableDescriptor>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &[TableDescriptor] {
        &self.tables
    }

    /// Get a table by name
    pub fn table(&self, name: &str) -> Option<&TableDescriptor> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Get all table names in provider order
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Tables whose name is `token` or `<letters>_<token>`, in descending order
    pub fn tables_named_like(&self, token: &str) -> Vec<&str> {
        let pattern = format!(r"^(?:[A-Za-z]*_)?{}$", regex::escape(token));
        let Ok(matcher) = Regex::new(&pattern) else {
            return Vec::new();
        };

        let mut matches: Vec<&str> = self
            .tables
            .iter()
            .map(|t| t.name.as_str())
            .filter(|name| matcher.is_match(name))
            .collect();
        matches.sort_unstable_by(|a, b| b.cmp(a));
        matches
    }
}
