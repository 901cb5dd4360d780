//! @acp:module "File Headers"
//! @acp:summary "Renders and compares file header comments"
//! @acp:domain cli
//! @acp:layer service

use chrono::Datelike;

use super::templates::{Properties, TemplateEngine};
use crate::element::CompilationUnit;
use crate::error::Result;

/// Properties available to the header template
pub fn header_properties(unit: &CompilationUnit) -> Properties {
    let mut properties = Properties::new();
    let file_name = unit
        .path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    properties.insert("fileName".to_string(), file_name);
    properties.insert("typeName".to_string(), unit.primary_type_name());
    properties.insert("package".to_string(), unit.package.clone().unwrap_or_default());
    properties.insert("year".to_string(), chrono::Local::now().year().to_string());
    properties
}

/// @acp:summary "Evaluate the header template for a unit"
pub fn render_header(engine: &dyn TemplateEngine, template: &str, unit: &CompilationUnit) -> Result<String> {
    let text = engine.evaluate_template(template, "header", &header_properties(unit))?;
    Ok(text.trim_end().to_string())
}

/// Equality ignoring all whitespace
pub fn same_text(a: &str, b: &str) -> bool {
    strip_whitespace(a) == strip_whitespace(b)
}

pub fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
