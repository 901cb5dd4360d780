//! @acp:module "Name to Phrase"
//! @acp:summary "Converts Java identifiers into readable phrases"
//! @acp:domain cli
//! @acp:layer analysis
//!
//! # Phrase Conversion Algorithm
//!
//! 1. **Skip** entirely when neither splitting nor replacing is requested
//! 2. **Split** constant names (`MAX_SIZE`) on underscores, everything else on
//!    case and digit boundaries (`parseURLValue2` → `parse URL Value 2`)
//! 3. **Lowercase** every word but the first, keeping acronyms
//! 4. **Replace** shortcuts through the registry for the scope
//! 5. **Adjust** the first letter (lower keeps acronyms, upper always fires)

use serde::{Deserialize, Serialize};

use crate::replacements::{ReplacementRegistry, ReplacementScope};

/// @acp:summary "What an identifier names"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameScope {
    Type,
    Field,
    Method,
    Parameter,
    Return,
    Exception,
}

impl NameScope {
    /// Registry scope consulted for this name scope.
    ///
    /// Exception names never go through the registry.
    pub fn replacement_scope(&self) -> Option<ReplacementScope> {
        match self {
            NameScope::Method => Some(ReplacementScope::Method),
            NameScope::Type | NameScope::Field | NameScope::Parameter | NameScope::Return => {
                Some(ReplacementScope::Field)
            }
            NameScope::Exception => None,
        }
    }
}

/// @acp:summary "First letter adjustment"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseMode {
    #[default]
    None,
    FirstLower,
    FirstUpper,
}

/// Conversion switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhraseOptions {
    pub split: bool,
    pub replace: bool,
    pub case: CaseMode,
}

impl Default for PhraseOptions {
    fn default() -> Self {
        Self {
            split: true,
            replace: true,
            case: CaseMode::None,
        }
    }
}

impl PhraseOptions {
    pub fn with_case(mut self, case: CaseMode) -> Self {
        self.case = case;
        self
    }

    pub fn without_replacements(mut self) -> Self {
        self.replace = false;
        self
    }
}

/// @acp:summary "Identifier to phrase converter bound to a replacement registry"
#[derive(Debug, Clone, Copy)]
pub struct PhraseConverter<'a> {
    registry: &'a ReplacementRegistry,
}

impl<'a> PhraseConverter<'a> {
    pub fn new(registry: &'a ReplacementRegistry) -> Self {
        Self { registry }
    }

    /// Derive a phrase; no trailing punctuation is added
    pub fn to_phrase(&self, identifier: &str, scope: NameScope, options: PhraseOptions) -> String {
        if !options.split && !options.replace {
            return apply_case(identifier, options.case);
        }

        let phrase = if options.split {
            let mut words = if is_constant_name(identifier) {
                identifier
                    .split('_')
                    .filter(|w| !w.is_empty())
                    .map(|w| w.to_lowercase())
                    .collect()
            } else {
                lowercase_tail(split_identifier(identifier))
            };
            if options.replace {
                words = self.replace(words, scope);
            }
            words.join(" ")
        } else {
            let words: Vec<String> = identifier.split_whitespace().map(String::from).collect();
            let replaced = self.replace(words.clone(), scope);
            if replaced == words {
                identifier.to_string()
            } else {
                replaced.join(" ")
            }
        };

        apply_case(&phrase, options.case)
    }

    fn replace(&self, words: Vec<String>, scope: NameScope) -> Vec<String> {
        match scope.replacement_scope() {
            Some(target) => self.registry.apply(&words, target),
            None => words,
        }
    }
}

/// Upper snake case (`MAX_SIZE`, `ID`): letters present, none lowercase
pub fn is_constant_name(identifier: &str) -> bool {
    let letters = identifier.chars().filter(|c| c.is_alphabetic()).count();
    letters > 0
        && !identifier.chars().any(|c| c.is_lowercase())
        && (identifier.contains('_') || letters > 1)
}

/// Split an identifier at case, digit and separator boundaries
pub fn split_identifier(identifier: &str) -> Vec<String> {
    let chars: Vec<char> = identifier.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '$' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if !current.is_empty() {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let boundary = (c.is_uppercase() && (prev.is_lowercase() || prev.is_ascii_digit()))
                || (c.is_uppercase()
                    && prev.is_uppercase()
                    && next.map(|n| n.is_lowercase()).unwrap_or(false))
                || (c.is_ascii_digit() && prev.is_alphabetic());
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Multi-letter all-caps words such as `URL` or `IO`
pub fn is_acronym(word: &str) -> bool {
    word.chars().filter(|c| c.is_alphabetic()).count() > 1 && !word.chars().any(|c| c.is_lowercase())
}

fn lowercase_tail(words: Vec<String>) -> Vec<String> {
    words
        .into_iter()
        .enumerate()
        .map(|(i, w)| if i == 0 || is_acronym(&w) { w } else { w.to_lowercase() })
        .collect()
}

/// Apply the first-letter case mode
pub fn apply_case(text: &str, mode: CaseMode) -> String {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    match mode {
        CaseMode::None => text.to_string(),
        CaseMode::FirstLower => {
            if text.chars().nth(1).map(|c| c.is_uppercase()).unwrap_or(false) {
                text.to_string()
            } else {
                first.to_lowercase().chain(chars).collect()
            }
        }
        CaseMode::FirstUpper => first.to_uppercase().chain(chars).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replacements::{MatchMode, Replacement};

    fn empty_registry() -> ReplacementRegistry {
        ReplacementRegistry::new(vec![])
    }

    #[test]
    fn test_field_phrase_without_replacements() {
        let registry = empty_registry();
        let converter = PhraseConverter::new(&registry);
        assert_eq!(
            converter.to_phrase("numberOfQuestions", NameScope::Field, PhraseOptions::default()),
            "number of questions"
        );
    }

    #[test]
    fn test_return_phrase_first_lower() {
        let registry = empty_registry();
        let converter = PhraseConverter::new(&registry);
        let options = PhraseOptions::default().with_case(CaseMode::FirstLower);
        assert_eq!(
            converter.to_phrase("NumberOfQuestions", NameScope::Return, options),
            "number of questions"
        );
    }

    #[test]
    fn test_split_identifier_boundaries() {
        assert_eq!(split_identifier("parseURLValue"), vec!["parse", "URL", "Value"]);
        assert_eq!(split_identifier("version2Name"), vec!["version", "2", "Name"]);
        assert_eq!(split_identifier("get2nd"), vec!["get", "2nd"]);
        assert_eq!(split_identifier("m_count"), vec!["m", "count"]);
        assert_eq!(split_identifier("IOException"), vec!["IO", "Exception"]);
    }

    #[test]
    fn test_constant_name() {
        assert!(is_constant_name("MAX_SIZE"));
        assert!(is_constant_name("ID"));
        assert!(!is_constant_name("T"));
        assert!(!is_constant_name("maxSize"));

        let registry = empty_registry();
        let converter = PhraseConverter::new(&registry);
        assert_eq!(
            converter.to_phrase("MAX_POOL_SIZE", NameScope::Field, PhraseOptions::default()),
            "max pool size"
        );
    }

    #[test]
    fn test_case_modes() {
        assert_eq!(apply_case("URL value", CaseMode::FirstLower), "URL value");
        assert_eq!(apply_case("Number", CaseMode::FirstLower), "number");
        assert_eq!(apply_case("number", CaseMode::FirstUpper), "Number");
        assert_eq!(apply_case("", CaseMode::FirstUpper), "");
    }

    #[test]
    fn test_no_split_no_replace_returns_input() {
        let registry = empty_registry();
        let converter = PhraseConverter::new(&registry);
        let options = PhraseOptions {
            split: false,
            replace: false,
            case: CaseMode::FirstUpper,
        };
        assert_eq!(converter.to_phrase("numberOf", NameScope::Field, options), "NumberOf");
    }

    #[test]
    fn test_no_split_preserves_spacing() {
        let registry = empty_registry();
        let converter = PhraseConverter::new(&registry);
        let options = PhraseOptions {
            split: false,
            replace: true,
            case: CaseMode::None,
        };
        assert_eq!(
            converter.to_phrase("keep  two  spaces", NameScope::Field, options),
            "keep  two  spaces"
        );
    }

    #[test]
    fn test_method_replacements_apply() {
        let registry = ReplacementRegistry::new(vec![Replacement::new(
            "get",
            "Gets the",
            ReplacementScope::Method,
            MatchMode::Prefix,
        )]);
        let converter = PhraseConverter::new(&registry);
        assert_eq!(
            converter.to_phrase("getNumberOfQuestions", NameScope::Method, PhraseOptions::default()),
            "Gets the number of questions"
        );
        // Field scope does not see method replacements
        assert_eq!(
            converter.to_phrase("getNumber", NameScope::Field, PhraseOptions::default()),
            "get number"
        );
    }

    #[test]
    fn test_exception_scope_skips_replacements() {
        let registry = ReplacementRegistry::new(vec![Replacement::new(
            "io",
            "input output",
            ReplacementScope::Both,
            MatchMode::Whole,
        )]);
        let converter = PhraseConverter::new(&registry);
        assert_eq!(
            converter.to_phrase("IOException", NameScope::Exception, PhraseOptions::default()),
            "IO exception"
        );
        assert_eq!(
            converter.to_phrase("ioBuffer", NameScope::Field, PhraseOptions::default()),
            "input output buffer"
        );
    }
}
