//! Shared table-name prefix detection and stripping

use crate::prompt::PrefixConfirmer;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

static PREFIX_CANDIDATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]+_).+").expect("prefix: invalid candidate regex")
});

/// Confirmed table-name prefixes for the current run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrefixSet {
    prefixes: BTreeSet<String>,
}

impl PrefixSet {
    /// Build a set from an explicit prefix, bypassing detection
    ///
    /// A trailing underscore is added when missing, so `t` and `t_` are the same.
    pub fn from_override(prefix: &str) -> Self {
        let prefix = prefix.trim();
        let mut prefixes = BTreeSet::new();
        if !prefix.is_empty() {
            if prefix.ends_with('_') {
                prefixes.insert(prefix.to_string());
            } else {
                prefixes.insert(format!("{}_", prefix));
            }
        }
        Self { prefixes }
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.prefixes.contains(prefix)
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(String::as_str)
    }

    /// Longest confirmed prefix that `table` starts with
    fn matching_prefix(&self, table: &str) -> Option<&str> {
        self.iter()
            .filter(|p| table.len() > p.len() && table.starts_with(p))
            .max_by_key(|p| p.len())
    }

    /// Whether `table` carries one of the confirmed prefixes
    pub fn matches(&self, table: &str) -> bool {
        self.matching_prefix(table).is_some()
    }

    /// Strip the longest matching prefix once, e.g. `t_customers` -> `customers`
    pub fn strip<'a>(&self, table: &'a str) -> &'a str {
        match self.matching_prefix(table) {
            Some(prefix) => &table[prefix.len()..],
            None => table,
        }
    }
}

/// Detect shared prefixes across all table names
///
/// Each distinct candidate shared by at least two tables is put to the
/// confirmer exactly once; confirmed candidates apply to every table.
pub fn detect<S: AsRef<str>>(table_names: &[S], confirmer: &mut dyn PrefixConfirmer) -> PrefixSet {
    let names: Vec<&str> = table_names.iter().map(AsRef::as_ref).collect();
    let mut confirmed = BTreeSet::new();
    let mut rejected = HashSet::new();

    for name in &names {
        let Some(captures) = PREFIX_CANDIDATE.captures(name) else {
            continue;
        };
        let candidate = &captures[1];
        if confirmed.contains(candidate) || rejected.contains(candidate) {
            continue;
        }

        let sharing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|n| n.starts_with(candidate))
            .collect();
        if sharing.len() <= 1 {
            continue;
        }

        log::debug!(
            "Prefix candidate '{}' shared by {} tables",
            candidate,
            sharing.len()
        );
        if confirmer.confirm(candidate, &sharing) {
            confirmed.insert(candidate.to_string());
        } else {
            rejected.insert(candidate.to_string());
        }
    }

    if !confirmed.is_empty() {
        log::info!(
            "Stripping table prefixes: {}",
            confirmed.iter().cloned().collect::<Vec<_>>().join(", ")
        );
    }

    PrefixSet {
        prefixes: confirmed,
    }
}
