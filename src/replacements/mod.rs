//! @acp:module "Replacement Registry"
//! @acp:summary "Ordered shortcut substitutions applied during phrase conversion"
//! @acp:domain cli
//! @acp:layer model
//!
//! # Replacement Registry
//!
//! A [`ReplacementRegistry`] is an ordered list of [`Replacement`] rules. For
//! each word position the first rule (by list position) whose scope applies
//! and whose shortcut matches substitutes its text; unmatched words pass
//! through. Shortcuts may cover several camel-case words (`nrOf` matches the
//! words `nr of`).
//!
//! [`GetSetReplacements`] holds the accessor prefixes used when field
//! documentation is turned into getter/setter documentation. Its sort order
//! (empty prefix last) and its identity (lowercase prefix) are kept apart:
//! sorting never decides which entries count as duplicates.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::conventions::naming::split_identifier;

/// @acp:summary "Where a replacement applies"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplacementScope {
    Field,
    Method,
    Both,
}

impl ReplacementScope {
    /// Whether a rule with this scope may fire for `target`
    pub fn applies_to(&self, target: ReplacementScope) -> bool {
        matches!(self, ReplacementScope::Both) || *self == target || target == ReplacementScope::Both
    }
}

/// @acp:summary "How a shortcut is compared against words"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Only at the start of the identifier
    #[default]
    Prefix,
    /// At any word position
    Whole,
}

/// @acp:summary "One shortcut substitution rule"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Replacement {
    pub shortcut: String,
    pub replacement: String,
    pub scope: ReplacementScope,
    #[serde(default)]
    pub mode: MatchMode,
}

impl Replacement {
    pub fn new(shortcut: &str, replacement: &str, scope: ReplacementScope, mode: MatchMode) -> Self {
        Self {
            shortcut: shortcut.to_string(),
            replacement: replacement.to_string(),
            scope,
            mode,
        }
    }

    /// Duplicate detection key: lowercase shortcut plus scope
    pub fn identity(&self) -> (String, ReplacementScope) {
        (self.shortcut.to_lowercase(), self.scope)
    }

    fn shortcut_words(&self) -> Vec<String> {
        split_identifier(&self.shortcut)
    }

    /// Number of words matched at `index`, if any
    fn matches_at(&self, words: &[String], index: usize) -> Option<usize> {
        if self.mode == MatchMode::Prefix && index != 0 {
            return None;
        }
        let shortcut = self.shortcut_words();
        if shortcut.is_empty() || index + shortcut.len() > words.len() {
            return None;
        }
        shortcut
            .iter()
            .zip(&words[index..])
            .all(|(s, w)| s.eq_ignore_ascii_case(w))
            .then_some(shortcut.len())
    }
}

/// @acp:summary "Ordered, immutable set of replacement rules"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplacementRegistry {
    entries: Vec<Replacement>,
}

impl ReplacementRegistry {
    pub fn new(entries: Vec<Replacement>) -> Self {
        Self { entries }
    }

    /// Built-in rules used when no configuration overrides them
    pub fn defaults() -> Self {
        use MatchMode::*;
        use ReplacementScope::*;

        let rules = [
            ("get", "Gets the", Method, Prefix),
            ("set", "Sets the", Method, Prefix),
            ("is", "Checks if is", Method, Prefix),
            ("has", "Checks for", Method, Prefix),
            ("add", "Adds the", Method, Prefix),
            ("remove", "Removes the", Method, Prefix),
            ("create", "Creates the", Method, Prefix),
            ("init", "Inits the", Method, Prefix),
            ("nr", "number", Field, Whole),
            ("cnt", "count", Field, Whole),
            ("max", "maximum", Field, Whole),
            ("min", "minimum", Field, Whole),
            ("msg", "message", Field, Whole),
        ];
        Self::new(
            rules
                .iter()
                .map(|(s, r, scope, mode)| Replacement::new(s, r, *scope, *mode))
                .collect(),
        )
    }

    pub fn entries(&self) -> &[Replacement] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Shortcuts configured more than once for the same scope
    pub fn duplicates(&self) -> Vec<String> {
        let mut seen = Vec::new();
        let mut duplicates = Vec::new();
        for entry in &self.entries {
            let identity = entry.identity();
            if seen.contains(&identity) {
                duplicates.push(entry.shortcut.clone());
            } else {
                seen.push(identity);
            }
        }
        duplicates
    }

    /// Substitute shortcuts in a word sequence
    pub fn apply(&self, words: &[String], scope: ReplacementScope) -> Vec<String> {
        let mut out = Vec::with_capacity(words.len());
        let mut i = 0;
        while i < words.len() {
            let hit = self
                .entries
                .iter()
                .filter(|r| r.scope.applies_to(scope))
                .find_map(|r| r.matches_at(words, i).map(|n| (r, n)));
            match hit {
                Some((rule, consumed)) => {
                    if !rule.replacement.is_empty() {
                        out.push(rule.replacement.clone());
                    }
                    i += consumed;
                }
                None => {
                    out.push(words[i].clone());
                    i += 1;
                }
            }
        }
        out
    }
}

/// @acp:summary "Phrases for turning field docs into accessor docs"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSetFromFieldReplacement {
    /// Leading words stripped from the field comment ("The")
    pub field_prefix: String,
    /// Prefix of the getter's `@return` text
    pub return_prefix: String,
    /// Prefix of the setter's `@param` text
    pub parameter_prefix: String,
}

impl GetSetFromFieldReplacement {
    pub fn new(field_prefix: &str, return_prefix: &str, parameter_prefix: &str) -> Self {
        Self {
            field_prefix: field_prefix.to_string(),
            return_prefix: return_prefix.to_string(),
            parameter_prefix: parameter_prefix.to_string(),
        }
    }

    pub fn identity(&self) -> String {
        self.field_prefix.trim().to_lowercase()
    }

    pub fn is_fallback(&self) -> bool {
        self.field_prefix.trim().is_empty()
    }

    /// Text after the prefix when `text` starts with it followed by whitespace
    pub fn strip<'a>(&self, text: &'a str) -> Option<&'a str> {
        let prefix = self.field_prefix.trim();
        if prefix.is_empty() {
            return None;
        }
        let head = text.get(..prefix.len())?;
        let rest = &text[prefix.len()..];
        (head.eq_ignore_ascii_case(prefix) && rest.starts_with(char::is_whitespace))
            .then(|| rest.trim_start())
    }
}

/// Sort order only: case-insensitive prefix, empty prefix last
fn display_order(a: &GetSetFromFieldReplacement, b: &GetSetFromFieldReplacement) -> Ordering {
    match (a.is_fallback(), b.is_fallback()) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => a.identity().cmp(&b.identity()),
    }
}

/// @acp:summary "Ordered accessor prefix rules with a fallback entry"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<GetSetFromFieldReplacement>", into = "Vec<GetSetFromFieldReplacement>")]
pub struct GetSetReplacements {
    entries: Vec<GetSetFromFieldReplacement>,
}

impl GetSetReplacements {
    /// Keeps the first entry per identity, then sorts for display
    pub fn new(entries: Vec<GetSetFromFieldReplacement>) -> Self {
        let mut unique: Vec<GetSetFromFieldReplacement> = Vec::with_capacity(entries.len());
        for entry in entries {
            if !unique.iter().any(|e| e.identity() == entry.identity()) {
                unique.push(entry);
            }
        }
        unique.sort_by(display_order);
        Self { entries: unique }
    }

    pub fn defaults() -> Self {
        Self::new(vec![
            GetSetFromFieldReplacement::new("The", "the", "the new"),
            GetSetFromFieldReplacement::new("A", "a", "the new"),
            GetSetFromFieldReplacement::new("An", "an", "the new"),
            GetSetFromFieldReplacement::new("", "the", "the new"),
        ])
    }

    pub fn entries(&self) -> &[GetSetFromFieldReplacement] {
        &self.entries
    }

    /// First non-fallback entry whose prefix starts `text`, with the rest of the text
    pub fn find<'a>(&self, text: &'a str) -> Option<(&GetSetFromFieldReplacement, &'a str)> {
        self.entries
            .iter()
            .filter(|e| !e.is_fallback())
            .find_map(|e| e.strip(text).map(|rest| (e, rest)))
    }

    /// Entry with the empty prefix, or the built-in one
    pub fn fallback(&self) -> GetSetFromFieldReplacement {
        self.entries
            .iter()
            .find(|e| e.is_fallback())
            .cloned()
            .unwrap_or_else(|| GetSetFromFieldReplacement::new("", "the", "the new"))
    }
}

impl Default for GetSetReplacements {
    fn default() -> Self {
        Self::defaults()
    }
}

impl From<Vec<GetSetFromFieldReplacement>> for GetSetReplacements {
    fn from(entries: Vec<GetSetFromFieldReplacement>) -> Self {
        Self::new(entries)
    }
}

impl From<GetSetReplacements> for Vec<GetSetFromFieldReplacement> {
    fn from(set: GetSetReplacements) -> Self {
        set.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_match_wins_by_registry_order() {
        let registry = ReplacementRegistry::new(vec![
            Replacement::new("get", "Gets the", ReplacementScope::Method, MatchMode::Prefix),
            Replacement::new("get", "Returns the", ReplacementScope::Both, MatchMode::Prefix),
        ]);
        let out = registry.apply(&words(&["get", "size"]), ReplacementScope::Method);
        assert_eq!(out, words(&["Gets the", "size"]));

        let out = registry.apply(&words(&["get", "size"]), ReplacementScope::Field);
        assert_eq!(out, words(&["Returns the", "size"]));
    }

    #[test]
    fn test_prefix_only_at_start() {
        let registry = ReplacementRegistry::defaults();
        let out = registry.apply(&words(&["reset", "get", "count"]), ReplacementScope::Method);
        assert_eq!(out, words(&["reset", "get", "count"]));
    }

    #[test]
    fn test_whole_word_anywhere() {
        let registry = ReplacementRegistry::defaults();
        let out = registry.apply(&words(&["retry", "cnt"]), ReplacementScope::Field);
        assert_eq!(out, words(&["retry", "count"]));
        // Whole word only, not a prefix of a longer word
        let out = registry.apply(&words(&["maxim"]), ReplacementScope::Field);
        assert_eq!(out, words(&["maxim"]));
    }

    #[test]
    fn test_multi_word_shortcut() {
        let registry = ReplacementRegistry::new(vec![Replacement::new(
            "nrOf",
            "number of",
            ReplacementScope::Field,
            MatchMode::Whole,
        )]);
        let out = registry.apply(&words(&["max", "nr", "of", "items"]), ReplacementScope::Field);
        assert_eq!(out, words(&["max", "number of", "items"]));
    }

    #[test]
    fn test_duplicates_detected_by_identity() {
        let registry = ReplacementRegistry::new(vec![
            Replacement::new("Get", "Gets the", ReplacementScope::Method, MatchMode::Prefix),
            Replacement::new("get", "Fetches", ReplacementScope::Method, MatchMode::Prefix),
            Replacement::new("get", "the", ReplacementScope::Field, MatchMode::Prefix),
        ]);
        assert_eq!(registry.duplicates(), vec!["get".to_string()]);
    }

    #[test]
    fn test_get_set_sorted_with_fallback_last() {
        let set = GetSetReplacements::new(vec![
            GetSetFromFieldReplacement::new("", "the", "the new"),
            GetSetFromFieldReplacement::new("The", "the", "the new"),
            GetSetFromFieldReplacement::new("a", "a", "the new"),
        ]);
        let prefixes: Vec<_> = set.entries().iter().map(|e| e.field_prefix.as_str()).collect();
        assert_eq!(prefixes, vec!["a", "The", ""]);
    }

    #[test]
    fn test_get_set_identity_is_separate_from_order() {
        let set = GetSetReplacements::new(vec![
            GetSetFromFieldReplacement::new("The", "the", "the new"),
            GetSetFromFieldReplacement::new("the", "a", "a"),
        ]);
        assert_eq!(set.entries().len(), 1);
        assert_eq!(set.entries()[0].return_prefix, "the");
    }

    #[test]
    fn test_get_set_find_requires_whitespace() {
        let set = GetSetReplacements::defaults();
        let (entry, rest) = set.find("The number of questions.").unwrap();
        assert_eq!(entry.field_prefix, "The");
        assert_eq!(rest, "number of questions.");

        assert!(set.find("Theory of everything").is_none());
        assert!(set.find("Annual rate").is_none());
        assert_eq!(set.fallback().return_prefix, "the");
    }
}
