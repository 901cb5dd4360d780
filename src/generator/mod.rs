//! @acp:module "Documentation Generator"
//! @acp:summary "Produces a complete comment for a member from its metadata"
//! @acp:domain cli
//! @acp:layer service
//!
//! # Generation Order
//!
//! Every slot of the comment is filled from the first source that has
//! something to say:
//!
//! 1. the existing comment (free text gets its missing period)
//! 2. getter/setter derivation from the field's own documentation
//! 3. user templates
//! 4. heuristic text built from names (only with dummy comments enabled)
//!
//! Slots that nothing fills stay empty; tags for parameters, return values
//! and declared exceptions are still present, just without text. Template
//! failures are logged and skipped.

pub mod accessors;
pub mod edit;
pub mod header;
pub mod templates;

pub use accessors::AccessorDoc;
pub use edit::{apply_edits, plan_edits, unified_diff, EditPlan, TextEdit};
pub use templates::{HandlebarsTemplates, NoTemplates, Properties, TemplateEngine};

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::config::{ConfigSnapshot, TemplateKind};
use crate::conventions::{
    field_for_parameter, AccessorResolver, BeanConventions, CaseMode, NameScope, PhraseConverter,
    PhraseOptions,
};
use crate::element::{
    simple_type_name, FieldElement, Member, MethodElement, Parameter, RecordElement, TypeElement,
};
use crate::error::{AutodocError, Result};
use crate::javadoc::{self, has_text, CommentMerger, CommentMode, JavadocComment, RenderOptions, Tag};

/// @acp:summary "Documentation generator bound to one configuration snapshot"
#[derive(Clone)]
pub struct Generator {
    config: Arc<ConfigSnapshot>,
    templates: Arc<dyn TemplateEngine>,
    resolver: Arc<dyn AccessorResolver>,
}

/// Sources gathered once per member before slots are filled
struct Sources {
    accessor: Option<AccessorDoc>,
    template: Option<JavadocComment>,
}

impl Generator {
    pub fn new(config: Arc<ConfigSnapshot>, templates: Arc<dyn TemplateEngine>) -> Self {
        Self {
            config,
            templates,
            resolver: Arc::new(BeanConventions::new()),
        }
    }

    /// Generator using the configured handlebars template rules
    pub fn from_config(config: Arc<ConfigSnapshot>) -> Result<Self> {
        let templates = HandlebarsTemplates::new(config.templates())?;
        Ok(Self::new(config, Arc::new(templates)))
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn AccessorResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &ConfigSnapshot {
        &self.config
    }

    pub fn templates(&self) -> &dyn TemplateEngine {
        self.templates.as_ref()
    }

    fn phrases(&self) -> PhraseConverter<'_> {
        PhraseConverter::new(self.config.replacements())
    }

    /// Whether a member is in scope for generation
    pub fn should_document(&self, member: &Member, fields: &[FieldElement]) -> bool {
        if matches!(member, Member::Parameter(_)) || !self.config.visibility().includes(member.visibility()) {
            return false;
        }
        if self.config.getters_setters_only() {
            return match member {
                Member::Method(m) => self.resolver.resolve(m, fields).is_some(),
                _ => false,
            };
        }
        true
    }

    /// @acp:summary "Combine existing documentation with generated content per the comment mode"
    pub fn document(
        &self,
        member: &Member,
        existing: &JavadocComment,
        fields: &[FieldElement],
    ) -> Result<JavadocComment> {
        let mode = self.config.mode();
        if mode == CommentMode::Complete {
            return self.generate(member, existing, fields);
        }
        let generated = self.generate(member, &JavadocComment::new(), fields)?;
        Ok(CommentMerger::new(mode).merge(existing, &generated))
    }

    /// @acp:summary "Fill every slot of `existing` for `member`"
    pub fn generate(
        &self,
        member: &Member,
        existing: &JavadocComment,
        fields: &[FieldElement],
    ) -> Result<JavadocComment> {
        check_metadata(member)?;

        let sources = Sources {
            accessor: self.accessor_doc(member, fields),
            template: self.member_template(member),
        };

        let mut comment = JavadocComment {
            is_markdown: existing.is_markdown || self.config.markdown_style(),
            ..Default::default()
        };

        comment.free_text = self.free_text(member, existing, &sources);

        match member {
            Member::Method(method) => {
                comment.params = self.method_params(method, existing, &sources, fields);
                comment.return_tag = self.return_tag(method, existing, &sources);
                comment.throws = self.throws(&method.thrown_types, existing, &sources);
            }
            Member::Type(t) => {
                comment.params = self.type_params(&t.type_parameters, &[], existing, &sources);
            }
            Member::Record(r) => {
                comment.params = self.type_params(&r.type_parameters, &r.components, existing, &sources);
            }
            Member::Field(_) | Member::Parameter(_) => {}
        }

        comment.other_tags = existing.other_tags.clone();
        if let Some(fragment) = &sources.template {
            for tag in &fragment.other_tags {
                if !existing.other_tags.iter().any(|t| t.kind == tag.kind) {
                    comment.other_tags.push(tag.clone());
                }
            }
        }

        Ok(comment)
    }

    /// @acp:summary "Render a comment at the member's indentation"
    pub fn render(&self, member: &Member, comment: &JavadocComment) -> String {
        let options = RenderOptions {
            indent: &member.declaration().indent,
            markdown: comment.is_markdown,
            single_line: matches!(member, Member::Field(_)) && self.config.single_line_field_comment(),
            tag_order: self.config.tag_order(),
        };
        javadoc::render(comment, &options)
    }

    // =========================================================================
    // Free text
    // =========================================================================

    fn free_text(&self, member: &Member, existing: &JavadocComment, sources: &Sources) -> Vec<String> {
        let mut lines = if existing.has_free_text() {
            existing.free_text.clone()
        } else if let Some(accessor) = &sources.accessor {
            vec![accessor.free_text.clone()]
        } else if let Some(fragment) = sources.template.as_ref().filter(|f| f.has_free_text()) {
            fragment.free_text.clone()
        } else if self.config.create_dummy_comment() {
            vec![self.dummy_free_text(member)]
        } else {
            Vec::new()
        };

        if self.config.add_missing_period() {
            javadoc::ensure_terminal_period(&mut lines);
        }
        lines
    }

    fn dummy_free_text(&self, member: &Member) -> String {
        let phrases = self.phrases();
        match member {
            Member::Type(TypeElement { name, kind, .. }) => format!("The {} {}.", kind.label(), name),
            Member::Record(RecordElement { name, .. }) => format!("The Record {}.", name),
            Member::Field(field) => {
                let phrase = phrases.to_phrase(
                    &field.name,
                    NameScope::Field,
                    PhraseOptions::default().with_case(CaseMode::FirstLower),
                );
                if field.is_constant() || field.is_enum_constant {
                    format!("The constant {}.", phrase)
                } else {
                    format!("The {}.", phrase)
                }
            }
            Member::Method(method) if method.is_constructor => {
                let phrase = phrases.to_phrase(
                    &method.enclosing_type,
                    NameScope::Type,
                    PhraseOptions::default().with_case(CaseMode::FirstLower),
                );
                format!("Instantiates a new {}.", phrase)
            }
            Member::Method(method) if method.is_main() => "The main method.".to_string(),
            Member::Method(method) => {
                let phrase = phrases.to_phrase(
                    &method.name,
                    NameScope::Method,
                    PhraseOptions::default().with_case(CaseMode::FirstUpper),
                );
                format!("{}.", phrase)
            }
            Member::Parameter(p) => self.dummy_parameter_text(&p.parameter.name, false),
        }
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    fn method_params(
        &self,
        method: &MethodElement,
        existing: &JavadocComment,
        sources: &Sources,
        fields: &[FieldElement],
    ) -> IndexMap<String, Tag> {
        let mut params = IndexMap::new();

        for (i, parameter) in method.parameters.iter().enumerate() {
            let text = existing_text(existing.params.get(&parameter.name))
                .or_else(|| {
                    (i == 0)
                        .then(|| sources.accessor.as_ref().and_then(|a| a.parameter.clone()))
                        .flatten()
                        .map(|t| vec![t])
                })
                .or_else(|| self.constructor_field_text(method, &parameter.name, fields))
                .or_else(|| self.parameter_template(&parameter.name, &parameter.type_name, sources))
                .or_else(|| {
                    self.config.create_dummy_comment().then(|| {
                        vec![if method.is_main() {
                            "the arguments".to_string()
                        } else {
                            self.dummy_parameter_text(&parameter.name, false)
                        }]
                    })
                })
                .unwrap_or_default();
            insert_tag(&mut params, Tag::new(javadoc::TagKind::Param, Some(parameter.name.clone()), text));
        }

        for name in &method.type_parameters {
            self.push_type_param(&mut params, name, existing, sources);
        }
        params
    }

    fn type_params(
        &self,
        type_parameters: &[String],
        components: &[Parameter],
        existing: &JavadocComment,
        sources: &Sources,
    ) -> IndexMap<String, Tag> {
        let mut params = IndexMap::new();
        for component in components {
            let text = existing_text(existing.params.get(&component.name))
                .or_else(|| self.parameter_template(&component.name, &component.type_name, sources))
                .or_else(|| {
                    self.config
                        .create_dummy_comment()
                        .then(|| vec![self.dummy_parameter_text(&component.name, false)])
                })
                .unwrap_or_default();
            insert_tag(&mut params, Tag::new(javadoc::TagKind::Param, Some(component.name.clone()), text));
        }
        for name in type_parameters {
            self.push_type_param(&mut params, name, existing, sources);
        }
        params
    }

    fn push_type_param(
        &self,
        params: &mut IndexMap<String, Tag>,
        name: &str,
        existing: &JavadocComment,
        sources: &Sources,
    ) {
        let key = format!("<{}>", name);
        let text = existing_text(existing.params.get(&key))
            .or_else(|| self.parameter_template(&key, name, sources))
            .or_else(|| {
                self.config
                    .create_dummy_comment()
                    .then(|| vec![self.dummy_parameter_text(name, true)])
            })
            .unwrap_or_default();
        insert_tag(params, Tag::new(javadoc::TagKind::Param, Some(key), text));
    }

    /// Constructor parameter copying the first sentence of the matching field
    fn constructor_field_text(&self, method: &MethodElement, name: &str, fields: &[FieldElement]) -> Option<Vec<String>> {
        if !self.config.getter_setter_from_field() {
            return None;
        }
        let field = field_for_parameter(method, name, fields)?;
        let doc = javadoc::parse(&field.doc.as_ref()?.text);
        if !doc.has_free_text() {
            return None;
        }
        let sentence = doc.first_sentence();
        let text = sentence.trim_end_matches('.').to_lowercase();
        (!text.is_empty()).then(|| vec![text])
    }

    fn parameter_template(&self, name: &str, type_name: &str, sources: &Sources) -> Option<Vec<String>> {
        if let Some(text) = sources
            .template
            .as_ref()
            .and_then(|f| existing_text(f.params.get(name)))
        {
            return Some(text);
        }
        let properties = self.properties(name, NameScope::Parameter, type_name, "");
        let rendered = self.try_template(name, || self.templates.apply_parameter_template(name, &properties))?;
        let lines = lines_of(&rendered);
        has_text(&lines).then_some(lines)
    }

    fn dummy_parameter_text(&self, name: &str, type_parameter: bool) -> String {
        if type_parameter {
            if name.chars().count() == 1 {
                return "the generic type".to_string();
            }
            let phrase = self.phrases().to_phrase(
                name,
                NameScope::Parameter,
                PhraseOptions::default().with_case(CaseMode::FirstLower),
            );
            return format!("the {} type", phrase);
        }
        let phrase = self.phrases().to_phrase(
            name,
            NameScope::Parameter,
            PhraseOptions::default().with_case(CaseMode::FirstLower),
        );
        with_article(&phrase)
    }

    // =========================================================================
    // Return and throws
    // =========================================================================

    fn return_tag(&self, method: &MethodElement, existing: &JavadocComment, sources: &Sources) -> Option<Vec<String>> {
        if method.is_void() {
            return None;
        }
        if existing.has_return_text() {
            return existing.return_tag.clone();
        }
        let text = sources
            .accessor
            .as_ref()
            .and_then(|a| a.return_text.clone())
            .map(|t| vec![t])
            .or_else(|| {
                sources
                    .template
                    .as_ref()
                    .filter(|f| f.has_return_text())
                    .and_then(|f| f.return_tag.clone())
            })
            .or_else(|| {
                self.config
                    .create_dummy_comment()
                    .then(|| vec![self.dummy_return_text(method)])
            })
            .unwrap_or_default();
        Some(text)
    }

    fn dummy_return_text(&self, method: &MethodElement) -> String {
        let phrases = self.phrases();
        let options = PhraseOptions::default().with_case(CaseMode::FirstLower);
        let return_type = method.return_type.as_deref().unwrap_or_default();

        if matches!(return_type, "boolean" | "Boolean") {
            return format!("true, if {}", phrases.to_phrase(&method.name, NameScope::Return, options));
        }
        if let Some(rest) = method.name.strip_prefix("get").filter(|r| !r.is_empty()) {
            return with_article(&phrases.to_phrase(rest, NameScope::Return, options));
        }
        with_article(&phrases.to_phrase(simple_type_name(return_type), NameScope::Return, options))
    }

    fn throws(&self, thrown_types: &[String], existing: &JavadocComment, sources: &Sources) -> IndexMap<String, Tag> {
        let mut throws = IndexMap::new();
        let mut used = HashSet::new();

        for thrown in thrown_types {
            let simple = simple_type_name(thrown);
            let existing_tag = existing
                .throws
                .iter()
                .find(|(name, _)| simple_type_name(name) == simple);
            if let Some((name, _)) = existing_tag {
                used.insert(name.clone());
            }
            let key = existing_tag.map(|(name, _)| name.clone()).unwrap_or_else(|| simple.to_string());

            let text = existing_text(existing_tag.map(|(_, tag)| tag))
                .or_else(|| self.exception_template(simple, sources))
                .or_else(|| {
                    self.config.create_dummy_comment().then(|| {
                        vec![with_article(&self.phrases().to_phrase(
                            simple,
                            NameScope::Exception,
                            PhraseOptions::default().with_case(CaseMode::FirstLower),
                        ))]
                    })
                })
                .unwrap_or_default();
            insert_tag(&mut throws, Tag::new(javadoc::TagKind::Throws, Some(key), text));
        }

        // Documented but undeclared exceptions (often unchecked) stay after the declared ones
        for (name, tag) in &existing.throws {
            if !used.contains(name) && !throws.contains_key(name) {
                throws.insert(name.clone(), tag.clone());
            }
        }
        throws
    }

    fn exception_template(&self, name: &str, sources: &Sources) -> Option<Vec<String>> {
        if let Some(text) = sources
            .template
            .as_ref()
            .and_then(|f| f.throws.iter().find(|(n, _)| simple_type_name(n) == name))
            .and_then(|(_, tag)| existing_text(Some(tag)))
        {
            return Some(text);
        }
        let properties = self.properties(name, NameScope::Exception, name, "");
        let rendered = self.try_template(name, || self.templates.apply_exception_template(name, &properties))?;
        let lines = lines_of(&rendered);
        has_text(&lines).then_some(lines)
    }

    // =========================================================================
    // Sources
    // =========================================================================

    fn accessor_doc(&self, member: &Member, fields: &[FieldElement]) -> Option<AccessorDoc> {
        if !self.config.create_dummy_comment() || !self.config.getter_setter_from_field() {
            return None;
        }
        let Member::Method(method) = member else {
            return None;
        };
        let accessor = self.resolver.resolve(method, fields)?;
        accessors::derive(&accessor, &self.config)
    }

    fn member_template(&self, member: &Member) -> Option<JavadocComment> {
        let (type_name, enclosing) = match member {
            Member::Field(f) => (f.type_name.as_str(), f.enclosing_type.as_str()),
            Member::Method(m) => (m.return_type.as_deref().unwrap_or_default(), m.enclosing_type.as_str()),
            Member::Parameter(p) => (p.parameter.type_name.as_str(), p.enclosing_type.as_str()),
            Member::Type(_) | Member::Record(_) => ("", ""),
        };
        let scope = match member {
            Member::Field(_) => NameScope::Field,
            Member::Method(_) => NameScope::Method,
            Member::Parameter(_) => NameScope::Parameter,
            Member::Type(_) | Member::Record(_) => NameScope::Type,
        };
        let properties = self.properties(member.name(), scope, type_name, enclosing);
        let kind = TemplateKind::for_member(member.kind());
        let rendered =
            self.try_template(member.name(), || self.templates.apply_template(kind, member.name(), &properties))?;
        let fragment = javadoc::parse(&rendered);
        (!fragment.is_empty()).then_some(fragment)
    }

    fn try_template<F>(&self, element: &str, apply: F) -> Option<String>
    where
        F: FnOnce() -> Result<Option<String>>,
    {
        match apply() {
            Ok(rendered) => rendered,
            Err(e) => {
                tracing::warn!(element, error = %e, "template failed, falling back");
                None
            }
        }
    }

    fn properties(&self, name: &str, scope: NameScope, type_name: &str, enclosing: &str) -> Properties {
        let phrase = self.phrases().to_phrase(
            name.trim_matches(|c| c == '<' || c == '>'),
            scope,
            PhraseOptions::default().with_case(CaseMode::FirstLower),
        );
        let mut properties = Properties::new();
        properties.insert("name".to_string(), name.to_string());
        properties.insert("phrase".to_string(), phrase);
        properties.insert("type".to_string(), type_name.to_string());
        properties.insert("enclosingType".to_string(), enclosing.to_string());
        properties
    }
}

/// Reject members whose metadata cannot be documented consistently
fn check_metadata(member: &Member) -> Result<()> {
    if member.name().trim().is_empty() {
        return Err(AutodocError::metadata(member.qualified_name(), "member has no name"));
    }
    let names: Vec<&str> = match member {
        Member::Method(m) => m.parameters.iter().map(|p| p.name.as_str()).collect(),
        Member::Record(r) => r.components.iter().map(|p| p.name.as_str()).collect(),
        _ => return Ok(()),
    };
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(AutodocError::metadata(
                member.qualified_name(),
                format!("duplicate parameter '{}'", name),
            ));
        }
    }
    Ok(())
}

fn existing_text(tag: Option<&Tag>) -> Option<Vec<String>> {
    tag.filter(|t| t.has_text()).map(|t| t.comments.clone())
}

fn insert_tag(map: &mut IndexMap<String, Tag>, tag: Tag) {
    let key = tag.name.clone().unwrap_or_default();
    map.insert(key, tag);
}

fn lines_of(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = text.lines().map(|l| l.trim().to_string()).collect();
    javadoc::trim_blank_edges(&mut lines);
    lines
}

/// Prefix "the" unless the phrase already starts with it
fn with_article(phrase: &str) -> String {
    let lower = phrase.to_lowercase();
    if lower == "the" || lower.starts_with("the ") {
        phrase.to_string()
    } else {
        format!("the {}", phrase)
    }
}
