//! RustF ModelGen - Schema-driven model generation
//!
//! This crate inspects table and column metadata captured from a database and
//! infers everything needed to generate RustF model files: field lists,
//! validation rules, casts and relations guessed from naming conventions.
//!
//! # Features
//!
//! - **Type classification** of raw column types into semantic types
//! - **Validation rule synthesis** per column
//! - **Table prefix detection** with an injected confirmation strategy
//! - **Relation inference** (`belongs_to`, `has_many`, `parent`) from `*_id` columns
//! - **Idempotent emission** of an editable wrapper model and a regenerated base model
//!
//! # Example
//!
//! ```rust
//! use rustf_modelgen::{ColumnDescriptor, KeyRole, SchemaSnapshot, TableDescriptor};
//! use rustf_modelgen::descriptor::{DescriptorOptions, ModelDescriptorBuilder};
//! use rustf_modelgen::prefix::PrefixSet;
//! use rustf_modelgen::prompt::FirstCandidate;
//!
//! # fn example() -> rustf_modelgen::Result<()> {
//! let snapshot = SchemaSnapshot::new(vec![
//!     TableDescriptor::new("posts", vec![
//!         ColumnDescriptor::new("id", "int(10)").key_role(KeyRole::Primary),
//!         ColumnDescriptor::new("title", "varchar(255)"),
//!     ]),
//! ]);
//!
//! let prefixes = PrefixSet::default();
//! let options = DescriptorOptions::default();
//! let mut resolver = FirstCandidate;
//! let builder = ModelDescriptorBuilder::new(&snapshot, &prefixes, &options);
//! let model = builder.build(&snapshot.tables()[0], &mut resolver)?;
//! assert_eq!(model.class_name, "Post");
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

pub mod classifier;
pub mod codegen;
pub mod descriptor;
pub mod emit;
pub mod inflect;
pub mod prefix;
pub mod prompt;
pub mod relations;
pub mod rules;
pub mod snapshot;
pub mod types;

pub use descriptor::{ModelDescriptor, ModelDescriptorBuilder};
pub use emit::{GenerateOptions, GenerationReport, Generator};
pub use snapshot::SchemaSnapshot;
pub use types::*;

/// Model generation errors
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Table '{table}' maps to model file '{file_name}' already generated for '{existing}'")]
    DuplicateModel {
        table: String,
        file_name: String,
        existing: String,
    },

    #[error("Could not resolve related table for column '{column}': {reason}")]
    Resolution { column: String, reason: String },

    #[error("Template error: {0}")]
    Template(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GeneratorError>;
