//! SQLite database introspection implementation

use super::SchemaIntrospector;
use anyhow::Result;
use async_trait::async_trait;
use rustf_modelgen::{ColumnDescriptor, KeyRole};
use sqlx::{Pool, Row, Sqlite};
use std::collections::HashSet;

pub struct SqliteIntrospector {
    pool: Pool<Sqlite>,
}

impl SqliteIntrospector {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Columns covered by a single-column unique index
    async fn unique_columns(&self, table_name: &str) -> Result<HashSet<String>> {
        let indexes = sqlx::query(
            r#"SELECT name FROM pragma_index_list(?1) WHERE "unique" = 1 AND origin != 'pk'"#,
        )
        .bind(table_name)
        .fetch_all(&self.pool)
        .await?;

        let mut unique = HashSet::new();
        for index in indexes {
            let index_name: String = index.try_get("name")?;
            let columns = sqlx::query("SELECT name FROM pragma_index_info(?1)")
                .bind(&index_name)
                .fetch_all(&self.pool)
                .await?;
            if let [column] = columns.as_slice() {
                unique.insert(column.try_get("name")?);
            }
        }
        Ok(unique)
    }
}

#[async_trait]
impl SchemaIntrospector for SqliteIntrospector {
    async fn list_tables(&self) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT name FROM sqlite_master
            WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut tables = Vec::with_capacity(rows.len());
        for row in rows {
            tables.push(row.try_get("name")?);
        }
        Ok(tables)
    }

    async fn describe_columns(&self, table_name: &str) -> Result<Vec<ColumnDescriptor>> {
        let rows = sqlx::query(
            r#"SELECT name, type, "notnull", dflt_value, pk FROM pragma_table_info(?1) ORDER BY cid"#,
        )
        .bind(table_name)
        .fetch_all(&self.pool)
        .await?;

        let unique_keys = self.unique_columns(table_name).await?;

        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row.try_get("name")?;
            let raw_type: String = row.try_get("type")?;
            let not_null: i64 = row.try_get("notnull")?;
            let pk: i64 = row.try_get("pk")?;

            let key_role = if pk > 0 {
                KeyRole::Primary
            } else if unique_keys.contains(&name) {
                KeyRole::Unique
            } else {
                KeyRole::None
            };

            let mut column = ColumnDescriptor::new(name, raw_type.to_lowercase())
                .nullable(not_null == 0 && pk == 0)
                .key_role(key_role);
            column.default_value = row.try_get("dflt_value").ok().flatten();
            columns.push(column);
        }

        Ok(columns)
    }
}
