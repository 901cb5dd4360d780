//! @acp:module "Templates"
//! @acp:summary "User template rules rendered with handlebars"
//! @acp:domain cli
//! @acp:layer service
//!
//! A rule applies to one element kind and matches the whole element name
//! with a regex. The first matching rule wins. Its handlebars text is
//! rendered with the element properties plus the regex captures as
//! `g1..gN`; the output is comment text that the caller parses.

use std::collections::BTreeMap;

use handlebars::Handlebars;
use regex::Regex;

use crate::config::{TemplateKind, TemplateRule};
use crate::error::{AutodocError, Result};

/// Property bag handed to templates
pub type Properties = BTreeMap<String, String>;

/// @acp:summary "Template engine contract"
pub trait TemplateEngine: Send + Sync {
    /// Render the first rule matching `kind` and `name`, if any
    fn apply_template(&self, kind: TemplateKind, name: &str, properties: &Properties) -> Result<Option<String>>;

    /// Render free-standing template text such as a file header
    fn evaluate_template(&self, template: &str, label: &str, properties: &Properties) -> Result<String>;

    fn apply_parameter_template(&self, name: &str, properties: &Properties) -> Result<Option<String>> {
        self.apply_template(TemplateKind::Parameter, name, properties)
    }

    fn apply_exception_template(&self, name: &str, properties: &Properties) -> Result<Option<String>> {
        self.apply_template(TemplateKind::Exception, name, properties)
    }
}

/// Engine without rules; evaluation returns the text unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTemplates;

impl TemplateEngine for NoTemplates {
    fn apply_template(&self, _kind: TemplateKind, _name: &str, _properties: &Properties) -> Result<Option<String>> {
        Ok(None)
    }

    fn evaluate_template(&self, template: &str, _label: &str, _properties: &Properties) -> Result<String> {
        Ok(template.to_string())
    }
}

struct CompiledRule {
    kind: TemplateKind,
    pattern: Regex,
    name: String,
}

/// @acp:summary "Handlebars-backed template engine"
pub struct HandlebarsTemplates {
    handlebars: Handlebars<'static>,
    rules: Vec<CompiledRule>,
}

impl HandlebarsTemplates {
    pub fn new(rules: &[TemplateRule]) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);

        let mut compiled = Vec::with_capacity(rules.len());
        for (i, rule) in rules.iter().enumerate() {
            let name = format!("{}-{}", kind_label(rule.kind), i);
            // Rules match the whole element name
            let pattern = Regex::new(&format!("^(?:{})$", rule.pattern))
                .map_err(|e| AutodocError::InvalidConfig(format!("invalid template pattern '{}': {}", rule.pattern, e)))?;
            handlebars
                .register_template_string(&name, &rule.template)
                .map_err(|e| AutodocError::template(&name, e))?;
            compiled.push(CompiledRule {
                kind: rule.kind,
                pattern,
                name,
            });
        }

        Ok(Self {
            handlebars,
            rules: compiled,
        })
    }
}

impl TemplateEngine for HandlebarsTemplates {
    fn apply_template(&self, kind: TemplateKind, name: &str, properties: &Properties) -> Result<Option<String>> {
        for rule in self.rules.iter().filter(|r| r.kind == kind) {
            let Some(caps) = rule.pattern.captures(name) else {
                continue;
            };

            let mut data = properties.clone();
            for (i, group) in caps.iter().enumerate().skip(1) {
                data.insert(format!("g{}", i), group.map(|m| m.as_str().to_string()).unwrap_or_default());
            }

            let text = self
                .handlebars
                .render(&rule.name, &data)
                .map_err(|e| AutodocError::template(&rule.name, e))?;
            tracing::debug!(template = %rule.name, element = name, "applied template");
            return Ok(Some(text));
        }
        Ok(None)
    }

    fn evaluate_template(&self, template: &str, label: &str, properties: &Properties) -> Result<String> {
        self.handlebars
            .render_template(template, properties)
            .map_err(|e| AutodocError::template(label, e))
    }
}

fn kind_label(kind: TemplateKind) -> &'static str {
    match kind {
        TemplateKind::Type => "type",
        TemplateKind::Field => "field",
        TemplateKind::Method => "method",
        TemplateKind::Parameter => "parameter",
        TemplateKind::Exception => "exception",
    }
}
