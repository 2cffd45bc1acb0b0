//! Live database introspection into a schema snapshot

mod mysql;
mod postgres;
mod sqlite;

use anyhow::Result;
use async_trait::async_trait;
use rustf_modelgen::{ColumnDescriptor, SchemaSnapshot, TableDescriptor};

use self::{mysql::MySqlIntrospector, postgres::PostgresIntrospector, sqlite::SqliteIntrospector};

/// Database introspector trait for database-specific implementations
#[async_trait]
pub trait SchemaIntrospector: Send + Sync {
    /// Base table names of the active schema
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Columns of a table in ordinal order
    async fn describe_columns(&self, table_name: &str) -> Result<Vec<ColumnDescriptor>>;

    /// Fetch every table with its columns, once
    async fn snapshot(&self) -> Result<SchemaSnapshot> {
        let names = self.list_tables().await?;
        let mut tables = Vec::with_capacity(names.len());
        for name in names {
            let columns = self.describe_columns(&name).await?;
            log::debug!("Introspected '{}' ({} columns)", name, columns.len());
            tables.push(TableDescriptor::new(name, columns));
        }
        Ok(SchemaSnapshot::new(tables))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    PostgreSQL,
    MySQL,
    SQLite,
}

impl DatabaseType {
    pub fn from_url(url: &str) -> Result<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Ok(DatabaseType::PostgreSQL)
        } else if url.starts_with("mysql://") {
            Ok(DatabaseType::MySQL)
        } else if url.starts_with("sqlite:") {
            Ok(DatabaseType::SQLite)
        } else {
            anyhow::bail!("Unsupported database URL: {}", url)
        }
    }
}

/// Create a database introspector based on the database URL
pub async fn create_introspector(database_url: &str) -> Result<Box<dyn SchemaIntrospector>> {
    match DatabaseType::from_url(database_url)? {
        DatabaseType::MySQL => Ok(Box::new(MySqlIntrospector::new(database_url).await?)),
        DatabaseType::PostgreSQL => Ok(Box::new(PostgresIntrospector::new(database_url).await?)),
        DatabaseType::SQLite => Ok(Box::new(SqliteIntrospector::new(database_url).await?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_type_from_url() {
        assert_eq!(
            DatabaseType::from_url("mysql://root@localhost/app").unwrap(),
            DatabaseType::MySQL
        );
        assert_eq!(
            DatabaseType::from_url("postgresql://localhost/app").unwrap(),
            DatabaseType::PostgreSQL
        );
        assert_eq!(
            DatabaseType::from_url("sqlite://app.db").unwrap(),
            DatabaseType::SQLite
        );
        assert_eq!(
            DatabaseType::from_url("sqlite::memory:").unwrap(),
            DatabaseType::SQLite
        );
        assert!(DatabaseType::from_url("oracle://db").is_err());
    }
}
