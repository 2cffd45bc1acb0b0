//! MySQL database introspection implementation

use super::SchemaIntrospector;
use anyhow::Result;
use async_trait::async_trait;
use rustf_modelgen::{ColumnDescriptor, KeyRole};
use sqlx::{MySql, Pool, Row};

pub struct MySqlIntrospector {
    pool: Pool<MySql>,
    db_name: String,
}

impl MySqlIntrospector {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = sqlx::mysql::MySqlPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        // Get database name
        let db_name_row = sqlx::query("SELECT DATABASE() as db_name")
            .fetch_one(&pool)
            .await?;
        let db_name: Option<String> = db_name_row.try_get("db_name")?;
        let db_name = db_name
            .ok_or_else(|| anyhow::anyhow!("The MySQL URL does not select a database"))?;

        Ok(Self { pool, db_name })
    }
}

#[async_trait]
impl SchemaIntrospector for MySqlIntrospector {
    async fn list_tables(&self) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT CAST(TABLE_NAME AS CHAR) as table_name
            FROM information_schema.tables
            WHERE TABLE_SCHEMA = ? AND TABLE_TYPE = 'BASE TABLE'
            ORDER BY TABLE_NAME
            "#,
        )
        .bind(&self.db_name)
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
                CAST(c.COLUMN_NAME AS CHAR) as column_name,
                CAST(c.COLUMN_TYPE AS CHAR) as column_type,
                CAST(c.IS_NULLABLE AS CHAR) as is_nullable,
                CAST(c.COLUMN_KEY AS CHAR) as column_key,
                CAST(c.COLUMN_DEFAULT AS CHAR) as column_default
            FROM information_schema.columns c
            WHERE c.TABLE_NAME = ? AND c.TABLE_SCHEMA = ?
            ORDER BY c.ORDINAL_POSITION
            "#,
        )
        .bind(table_name)
        .bind(&self.db_name)
        .fetch_all(&self.pool)
        .await?;

        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row.try_get("column_name")?;
            let column_type: String = row.try_get("column_type")?;
            let is_nullable: String = row.try_get("is_nullable")?;
            let column_key: Option<String> = row.try_get("column_key")?;
            let default_value: Option<String> = row.try_get("column_default").ok().flatten();

            let mut column = ColumnDescriptor::new(name, column_type)
                .nullable(is_nullable == "YES")
                .key_role(KeyRole::from_column_key(column_key.as_deref().unwrap_or_default()));
            column.default_value = default_value;
            columns.push(column);
        }

        Ok(columns)
    }
}
