//! Template rendering for generated model files
//!
//! Every model produces two files:
//! - an editable wrapper (`<folder>/<file>.rs`), written only when absent
//! - a generated base (`<folder>/base/<file>.inc.rs`), rewritten on every run
//!
//! Templates are plain text with `{{placeholder}}` markers filled from a flat
//! placeholder map built by [`render::placeholders`].

use crate::Result;
use indexmap::IndexMap;
use std::fs;
use std::path::Path;

pub mod render;

pub use render::{placeholders, RenderContext};

/// Flat placeholder map, in insertion order
pub type TemplateVars = IndexMap<String, String>;

/// Which of the two model templates to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// User-owned wrapper, never overwritten
    Editable,
    /// Generated base, always overwritten
    Base,
}

impl TemplateKind {
    pub fn name(self) -> &'static str {
        match self {
            TemplateKind::Editable => "wrapper_model",
            TemplateKind::Base => "base_model",
        }
    }
}

/// Destination for rendered templates
pub trait TemplateSink {
    fn exists(&self, path: &Path) -> bool;

    /// Render `kind` with `vars` and write the result to `path`,
    /// creating parent directories as needed
    fn render(&mut self, kind: TemplateKind, vars: &TemplateVars, path: &Path) -> Result<()>;
}

/// Sink writing rendered templates to the filesystem
#[derive(Debug, Clone)]
pub struct FileSink {
    editable_template: String,
    base_template: String,
}

impl FileSink {
    pub fn new(editable_template: impl Into<String>, base_template: impl Into<String>) -> Self {
        Self {
            editable_template: editable_template.into(),
            base_template: base_template.into(),
        }
    }

    fn template(&self, kind: TemplateKind) -> &str {
        match kind {
            TemplateKind::Editable => &self.editable_template,
            TemplateKind::Base => &self.base_template,
        }
    }
}

impl TemplateSink for FileSink {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn render(&mut self, kind: TemplateKind, vars: &TemplateVars, path: &Path) -> Result<()> {
        let content = process_template(self.template(kind), vars);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
                log::debug!("Created directory {}", parent.display());
            }
        }

        fs::write(path, content)?;
        log::debug!("Rendered {} into {}", kind.name(), path.display());
        Ok(())
    }
}

/// Process a template by replacing `{{key}}` placeholders with values
pub fn process_template(content: &str, variables: &TemplateVars) -> String {
    let mut processed = content.to_string();

    log::debug!("Processing template with {} variables", variables.len());
    for (key, value) in variables {
        let placeholder = format!("{{{{{}}}}}", key);
        let display_value = match value.char_indices().nth(100) {
            Some((cut, _)) => format!("{}...", &value[..cut]),
            None => value.clone(),
        };
        log::debug!(
            "Replacing '{}' with '{}' (length: {})",
            placeholder,
            display_value,
            value.len()
        );
        processed = processed.replace(&placeholder, value);
    }

    let remaining_vars = processed.matches("{{").count();
    if remaining_vars > 0 {
        log::warn!(
            "Template still contains {} unreplaced variables",
            remaining_vars
        );
    }

    processed
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> TemplateVars {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_process_template_replaces_every_occurrence() {
        let out = process_template(
            "struct {{model_name}}; // {{model_name}} for {{table_name}}",
            &vars(&[("model_name", "Post"), ("table_name", "posts")]),
        );
        assert_eq!(out, "struct Post; // Post for posts");
    }

    #[test]
    fn test_process_template_leaves_unknown_placeholders() {
        let out = process_template("{{known}} {{unknown}}", &vars(&[("known", "x")]));
        assert_eq!(out, "x {{unknown}}");
    }

    #[test]
    fn test_file_sink_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("models/base/post.inc.rs");
        let mut sink = FileSink::new("editable {{model_name}}", "base {{model_name}}");

        assert!(!sink.exists(&path));
        sink.render(TemplateKind::Base, &vars(&[("model_name", "Post")]), &path)
            .unwrap();

        assert!(sink.exists(&path));
        assert_eq!(fs::read_to_string(&path).unwrap(), "base Post");
    }
}
