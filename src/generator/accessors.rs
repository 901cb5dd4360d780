//! @acp:module "Accessor Documentation"
//! @acp:summary "Derives getter/setter documentation from the field comment"
//! @acp:domain cli
//! @acp:layer service

use crate::config::ConfigSnapshot;
use crate::conventions::{apply_case, Accessor, CaseMode};
use crate::javadoc::{self, first_sentence};
use crate::replacements::ReplacementScope;

/// Documentation pieces derived for one accessor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorDoc {
    pub free_text: String,
    /// Text for the setter's parameter
    pub parameter: Option<String>,
    /// Text for the getter's `@return`
    pub return_text: Option<String>,
}

/// @acp:summary "Build accessor docs; `None` when the field is undocumented"
pub fn derive(accessor: &Accessor<'_>, config: &ConfigSnapshot) -> Option<AccessorDoc> {
    let field_doc = javadoc::parse(&accessor.field.doc.as_ref()?.text);
    if !field_doc.has_free_text() {
        return None;
    }

    let joined = field_doc.free_text_joined();
    let text = if config.getter_setter_first_sentence_only() {
        first_sentence(&joined).to_string()
    } else {
        joined
    };

    let replacements = config.get_set_replacements();
    let (rule, body) = match replacements.find(&text) {
        Some((rule, rest)) => (rule.clone(), rest.to_string()),
        None => (replacements.fallback(), apply_case(&text, CaseMode::FirstLower)),
    };

    let verb = verb_phrase(accessor.kind.prefix(), config);
    let free_text = format!("{} {}", verb, body);
    let bare = body.trim_end_matches('.').trim_end();

    let (parameter, return_text) = if accessor.kind.is_setter() {
        (Some(join_prefix(&rule.parameter_prefix, bare)), None)
    } else {
        (None, Some(join_prefix(&rule.return_prefix, bare)))
    };

    Some(AccessorDoc {
        free_text,
        parameter,
        return_text,
    })
}

/// `get` → `Gets the` through the method-scope replacements
fn verb_phrase(prefix: &str, config: &ConfigSnapshot) -> String {
    let word = apply_case(prefix, CaseMode::FirstUpper);
    config
        .replacements()
        .apply(&[word], ReplacementScope::Method)
        .join(" ")
}

fn join_prefix(prefix: &str, text: &str) -> String {
    if prefix.trim().is_empty() {
        text.to_string()
    } else {
        format!("{} {}", prefix.trim(), text)
    }
}
