//! `generate` command: introspect the database and write model files

use crate::config::{self, ProjectConfig};
use crate::db::create_introspector;
use crate::prompt::TerminalPrompter;
use crate::templates;
use anyhow::Result;
use clap::Args;
use rustf_modelgen::emit::{FileAction, DEFAULT_FOLDER};
use rustf_modelgen::prompt::{AlwaysConfirm, FirstCandidate};
use rustf_modelgen::{GenerateOptions, GenerationReport, Generator};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct GenerateCommand {
    /// Tables to generate, comma separated
    #[arg(short, long, value_delimiter = ',')]
    pub table: Vec<String>,

    /// Generate every table of the database
    #[arg(short, long)]
    pub all: bool,

    /// Model class name (single table only)
    #[arg(long)]
    pub model_name: Option<String>,

    /// Trait implemented by generated models
    #[arg(long)]
    pub base_class: Option<String>,

    /// Table prefix to strip, skips prefix detection
    #[arg(long)]
    pub prefix: Option<String>,

    /// Only generate tables carrying a stripped prefix
    #[arg(long)]
    pub prefixed_only: bool,

    /// Output folder, relative to the project
    #[arg(long, default_value = DEFAULT_FOLDER)]
    pub folder: PathBuf,

    /// Module path of the generated models
    #[arg(long)]
    pub namespace: Option<String>,

    /// Named connection from config.toml
    #[arg(long)]
    pub connection: Option<String>,

    /// Database URL, overrides config.toml and DATABASE_URL
    #[arg(long)]
    pub database_url: Option<String>,

    /// Confirm every prefix and pick the first candidate table without asking
    #[arg(short = 'y', long)]
    pub assume_yes: bool,

    /// Log every model descriptor as JSON
    #[arg(long)]
    pub debug: bool,
}

impl GenerateCommand {
    pub fn options(&self, project_path: &Path) -> GenerateOptions {
        GenerateOptions {
            tables: self.table.clone(),
            all: self.all,
            model_name: self.model_name.clone(),
            base_class: self.base_class.clone(),
            table_prefix: self.prefix.clone(),
            prefixed_only: self.prefixed_only,
            folder: project_path.join(&self.folder),
            namespace: self.namespace.clone(),
            connection: self.connection.clone(),
            debug: self.debug,
        }
    }

    pub async fn execute(self, project_path: PathBuf) -> Result<()> {
        let options = self.options(&project_path);
        options.validate()?;

        let config = ProjectConfig::load(&project_path)?;
        let database_url = config::resolve_database_url(
            self.database_url.as_deref(),
            self.connection.as_deref(),
            &config,
            config::env_database_url(),
        )?;

        println!("🔌 Connecting to {}", config::redact_url(&database_url));
        let introspector = create_introspector(&database_url).await?;
        let snapshot = introspector.snapshot().await?;
        println!("📊 Found {} table(s)", snapshot.len());

        let mut sink = templates::file_sink()?;
        let generator = Generator::new(&snapshot, options);

        println!("🚀 Generating RustF models with base/wrapper pattern...");
        println!("📁 Output: {}", generator.options().folder.display());

        let report = if self.assume_yes {
            generator.run(&mut sink, &mut AlwaysConfirm, &mut FirstCandidate)?
        } else {
            let mut confirmer = TerminalPrompter::new();
            let mut resolver = TerminalPrompter::new();
            generator.run(&mut sink, &mut confirmer, &mut resolver)?
        };

        print_report(&report);

        if !report.is_success() {
            anyhow::bail!("{} table(s) failed to generate", report.failures.len());
        }
        Ok(())
    }
}

fn print_report(report: &GenerationReport) {
    let prefixes: Vec<&str> = report.prefixes.iter().collect();
    if !prefixes.is_empty() {
        println!("✂️  Stripping table prefix(es): {}", prefixes.join(", "));
    }

    for file in &report.files {
        match file.action {
            FileAction::Created => println!("✅ Created: {}", file.path.display()),
            FileAction::Updated => println!("🔄 Regenerated: {}", file.path.display()),
            FileAction::Preserved => {
                println!("⚠️  Preserving existing business logic: {}", file.path.display())
            }
        }
    }

    for failure in &report.failures {
        println!("❌ {}: {}", failure.table, failure.error);
    }

    println!();
    println!("🎉 Model generation completed!");
    println!(
        "📊 {} model(s), {} file(s) created, {} regenerated, {} preserved",
        report.models(),
        report.count(FileAction::Created),
        report.count(FileAction::Updated),
        report.count(FileAction::Preserved)
    );
    println!("⚠️  Only files in base/ will be overwritten on regeneration");
}
