//! PostgreSQL database introspection implementation
//!
//! Raw types are rebuilt in the MySQL-like notation the classifier reads:
//! `character varying(255)`, `decimal(10,2)`, `tinyint(1)` for booleans.

use super::SchemaIntrospector;
use anyhow::Result;
use async_trait::async_trait;
use rustf_modelgen::{ColumnDescriptor, KeyRole};
use sqlx::{Pool, Postgres, Row};
use std::collections::{BTreeMap, HashSet};

pub struct PostgresIntrospector {
    pool: Pool<Postgres>,
}

impl PostgresIntrospector {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// `(constraint, column)` pairs of one constraint type
    async fn constrained_columns(
        &self,
        table_name: &str,
        kind: &str,
    ) -> Result<Vec<(String, String)>> {
        let rows = sqlx::query(
            r#"
            SELECT tc.constraint_name::text as constraint_name,
                kcu.column_name::text as column_name
            FROM information_schema.table_constraints tc
            JOIN information_schema.key_column_usage kcu
                ON tc.constraint_name = kcu.constraint_name
                AND tc.table_schema = kcu.table_schema
            WHERE tc.table_name = $1
                AND tc.table_schema = 'public'
                AND tc.constraint_type = $2
            "#,
        )
        .bind(table_name)
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;

        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            columns.push((row.try_get("constraint_name")?, row.try_get("column_name")?));
        }
        Ok(columns)
    }
}

/// Columns that are unique on their own
///
/// A column that only appears in multi-column constraints is not unique by itself.
pub(crate) fn single_column_keys(pairs: &[(String, String)]) -> HashSet<String> {
    let mut by_constraint: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (constraint, column) in pairs {
        by_constraint
            .entry(constraint.as_str())
            .or_default()
            .push(column.as_str());
    }

    by_constraint
        .into_values()
        .filter(|columns| columns.len() == 1)
        .flatten()
        .map(String::from)
        .collect()
}

/// Rebuild a raw column type with its length, e.g. `character varying(255)`
pub(crate) fn raw_type(
    data_type: &str,
    max_length: Option<i32>,
    precision: Option<i32>,
    scale: Option<i32>,
) -> String {
    match (data_type, max_length, precision) {
        ("boolean", _, _) => "tinyint(1)".to_string(),
        ("numeric", _, Some(precision)) => {
            format!("decimal({},{})", precision, scale.unwrap_or(0))
        }
        ("numeric", _, None) => "decimal".to_string(),
        (_, Some(length), _) => format!("{}({})", data_type, length),
        _ => data_type.to_string(),
    }
}

#[async_trait]
impl SchemaIntrospector for PostgresIntrospector {
    async fn list_tables(&self) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT table_name::text as table_name
            FROM information_schema.tables
            WHERE table_schema = 'public' AND table_type = 'BASE TABLE'
            ORDER BY table_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut tables = Vec::with_capacity(rows.len());
        for row in rows {
            tables.push(row.try_get("table_name")?);
        }
        Ok(tables)
    }

    async fn describe_columns(&self, table_name: &str) -> Result<Vec<ColumnDescriptor>> {
        let rows = sqlx::query(
            r#"
            SELECT
                c.column_name::text as column_name,
                c.data_type::text as data_type,
                c.is_nullable::text as is_nullable,
                c.column_default::text as column_default,
                c.character_maximum_length::int4 as character_maximum_length,
                c.numeric_precision::int4 as numeric_precision,
                c.numeric_scale::int4 as numeric_scale
            FROM information_schema.columns c
            WHERE c.table_name = $1 AND c.table_schema = 'public'
            ORDER BY c.ordinal_position
            "#,
        )
        .bind(table_name)
        .fetch_all(&self.pool)
        .await?;

        let primary_keys: HashSet<String> = self
            .constrained_columns(table_name, "PRIMARY KEY")
            .await?
            .into_iter()
            .map(|(_, column)| column)
            .collect();
        let unique_keys = single_column_keys(&self.constrained_columns(table_name, "UNIQUE").await?);

        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row.try_get("column_name")?;
            let data_type: String = row.try_get("data_type")?;
            let is_nullable: String = row.try_get("is_nullable")?;

            let key_role = if primary_keys.contains(&name) {
                KeyRole::Primary
            } else if unique_keys.contains(&name) {
                KeyRole::Unique
            } else {
                KeyRole::None
            };

            let raw = raw_type(
                &data_type,
                row.try_get("character_maximum_length")?,
                row.try_get("numeric_precision")?,
                row.try_get("numeric_scale")?,
            );

            let mut column = ColumnDescriptor::new(name, raw)
                .nullable(is_nullable == "YES")
                .key_role(key_role);
            column.default_value = row.try_get("column_default")?;
            columns.push(column);
        }

        Ok(columns)
    }
}
