//! Decision strategies injected into prefix detection and relation inference
//!
//! The engine never talks to a terminal itself. Interactive callers plug in a
//! prompting implementation; batch callers use one of the deterministic
//! policies below.

use crate::{GeneratorError, Result};

/// Decides whether a shared table-name prefix should be stripped
pub trait PrefixConfirmer {
    /// `tables` are the table names that share `candidate`
    fn confirm(&mut self, candidate: &str, tables: &[&str]) -> bool;
}

/// Picks one related table when several tables match a foreign key column
pub trait AmbiguityResolver {
    /// Must return one of `candidates`; any other answer is rejected and the
    /// resolver is asked again. Returning an error aborts the table.
    fn resolve(&mut self, column: &str, candidates: &[&str]) -> Result<String>;
}

impl<F> PrefixConfirmer for F
where
    F: FnMut(&str, &[&str]) -> bool,
{
    fn confirm(&mut self, candidate: &str, tables: &[&str]) -> bool {
        self(candidate, tables)
    }
}

/// Confirm every detected prefix
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl PrefixConfirmer for AlwaysConfirm {
    fn confirm(&mut self, candidate: &str, _tables: &[&str]) -> bool {
        log::debug!("Auto-confirming table prefix '{}'", candidate);
        true
    }
}

/// Reject every detected prefix
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverConfirm;

impl PrefixConfirmer for NeverConfirm {
    fn confirm(&mut self, _candidate: &str, _tables: &[&str]) -> bool {
        false
    }
}

/// Always pick the first offered candidate
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCandidate;

impl AmbiguityResolver for FirstCandidate {
    fn resolve(&mut self, column: &str, candidates: &[&str]) -> Result<String> {
        let first = candidates.first().ok_or_else(|| GeneratorError::Resolution {
            column: column.to_string(),
            reason: "no candidates offered".to_string(),
        })?;
        log::debug!("Resolved '{}' to '{}' (first candidate)", column, first);
        Ok(first.to_string())
    }
}

/// Refuse to guess: every ambiguous column is an error
#[derive(Debug, Clone, Copy, Default)]
pub struct FailOnAmbiguity;

impl AmbiguityResolver for FailOnAmbiguity {
    fn resolve(&mut self, column: &str, candidates: &[&str]) -> Result<String> {
        Err(GeneratorError::Resolution {
            column: column.to_string(),
            reason: format!("ambiguous between {}", candidates.join(", ")),
        })
    }
}

/// Replays a fixed list of answers, for scripted runs and tests
#[derive(Debug, Clone, Default)]
pub struct ScriptedResolver {
    answers: std::collections::VecDeque<String>,
    pub asked: usize,
}

impl ScriptedResolver {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: 0,
        }
    }
}

impl AmbiguityResolver for ScriptedResolver {
    fn resolve(&mut self, column: &str, _candidates: &[&str]) -> Result<String> {
        self.asked += 1;
        self.answers
            .pop_front()
            .ok_or_else(|| GeneratorError::Resolution {
                column: column.to_string(),
                reason: "no scripted answer left".to_string(),
            })
    }
}
