//! Relation inference from `*_id` naming conventions
//!
//! Two directions are inferred for a table:
//! - outgoing: a `customer_id` column points at a table named `customers`
//!   (optionally prefixed, e.g. `t_customers`), or at the model itself for
//!   `parent_id` when no `parents` table exists
//! - incoming: any other table carrying `<singular of this table>_id`

use crate::inflect;
use crate::prefix::PrefixSet;
use crate::prompt::AmbiguityResolver;
use crate::snapshot::SchemaSnapshot;
use crate::types::{RelationDescriptor, RelationKind, TableDescriptor};
use crate::Result;

const SELF_REFERENCE_COLUMN: &str = "parent_id";

/// Infers relations for tables of one snapshot
pub struct RelationInference<'a> {
    snapshot: &'a SchemaSnapshot,
    prefixes: &'a PrefixSet,
}

impl<'a> RelationInference<'a> {
    pub fn new(snapshot: &'a SchemaSnapshot, prefixes: &'a PrefixSet) -> Self {
        Self { snapshot, prefixes }
    }

    /// All relations of `table`: outgoing first, then incoming
    pub fn infer(
        &self,
        table: &TableDescriptor,
        resolver: &mut dyn AmbiguityResolver,
    ) -> Result<Vec<RelationDescriptor>> {
        let mut relations = self.outgoing(table, resolver)?;
        relations.extend(self.incoming(table));
        Ok(relations)
    }

    /// `belongs_to` and `parent` relations declared by this table's columns
    pub fn outgoing(
        &self,
        table: &TableDescriptor,
        resolver: &mut dyn AmbiguityResolver,
    ) -> Result<Vec<RelationDescriptor>> {
        let mut relations = Vec::new();

        for column in &table.columns {
            if column.name == "id" {
                continue;
            }
            let Some(stem) = column.name.strip_suffix("_id") else {
                continue;
            };
            if stem.is_empty() {
                continue;
            }

            let plural = inflect::plural(stem);
            let candidates = self.snapshot.tables_named_like(&plural);

            let related = match candidates.len() {
                0 => {
                    if column.name == SELF_REFERENCE_COLUMN {
                        relations.push(self.parent_relation(table, &column.name));
                    } else {
                        log::debug!(
                            "No table matches '{}' for column {}.{}",
                            plural,
                            table.name,
                            column.name
                        );
                    }
                    continue;
                }
                1 => candidates[0].to_string(),
                _ => resolve_candidate(resolver, &column.name, &candidates)?,
            };

            let stripped = self.prefixes.strip(&related);
            relations.push(RelationDescriptor {
                kind: RelationKind::BelongsTo,
                local_column: column.name.clone(),
                related_model_name: inflect::class_name(stripped),
                accessor_name: inflect::singular(stripped),
                related_table: related,
            });
        }

        Ok(relations)
    }

    /// `has_many` relations from other tables pointing at this one
    pub fn incoming(&self, table: &TableDescriptor) -> Vec<RelationDescriptor> {
        let stripped = self.prefixes.strip(&table.name);
        let foreign_key = format!("{}_id", inflect::singular(stripped));

        self.snapshot
            .tables()
            .iter()
            .filter(|other| other.name != table.name && other.has_column(&foreign_key))
            .map(|other| {
                let other_stripped = self.prefixes.strip(&other.name);
                RelationDescriptor {
                    kind: RelationKind::HasMany,
                    local_column: foreign_key.clone(),
                    related_table: other.name.clone(),
                    related_model_name: inflect::class_name(other_stripped),
                    accessor_name: other_stripped.to_string(),
                }
            })
            .collect()
    }

    fn parent_relation(&self, table: &TableDescriptor, column: &str) -> RelationDescriptor {
        let stripped = self.prefixes.strip(&table.name);
        RelationDescriptor {
            kind: RelationKind::ParentSelf,
            local_column: column.to_string(),
            related_table: table.name.clone(),
            related_model_name: inflect::class_name(stripped),
            accessor_name: "parent".to_string(),
        }
    }
}

/// Ask the resolver until it names one of the offered candidates
///
/// There is no retry bound here; non-interactive resolvers either answer
/// from the list or return an error.
fn resolve_candidate(
    resolver: &mut dyn AmbiguityResolver,
    column: &str,
    candidates: &[&str],
) -> Result<String> {
    loop {
        let answer = resolver.resolve(column, candidates)?;
        let answer = answer.trim();
        if candidates.contains(&answer) {
            return Ok(answer.to_string());
        }
        log::warn!(
            "'{}' is not one of the tables offered for '{}': {}",
            answer,
            column,
            candidates.join(", ")
        );
    }
}
