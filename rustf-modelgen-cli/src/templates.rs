//! Model templates embedded in the binary

use anyhow::{anyhow, Result};
use rust_embed::RustEmbed;
use rustf_modelgen::codegen::{FileSink, TemplateKind};

#[derive(RustEmbed)]
#[folder = "templates/"]
struct Templates;

fn template_path(kind: TemplateKind) -> String {
    format!("models/{}.rs.template", kind.name())
}

/// Load one embedded model template
pub fn load(kind: TemplateKind) -> Result<String> {
    let path = template_path(kind);
    let template = Templates::get(&path).ok_or_else(|| anyhow!("Template not found: {}", path))?;
    let content = std::str::from_utf8(template.data.as_ref())?;
    Ok(content.to_string())
}

/// Filesystem sink backed by the embedded wrapper and base templates
pub fn file_sink() -> Result<FileSink> {
    Ok(FileSink::new(
        load(TemplateKind::Editable)?,
        load(TemplateKind::Base)?,
    ))
}
