//! @acp:module "Comment Model"
//! @acp:summary "Structured representation of one documentation comment"
//! @acp:domain cli
//! @acp:layer model
//!
//! # Comment Model
//!
//! A [`JavadocComment`] splits a doc block into:
//!
//! - free text lines (the descriptive prose)
//! - `@param` tags keyed by parameter name, in insertion order
//! - the `@return` text
//! - `@throws` tags keyed by exception type, in insertion order
//! - every other tag (`@author`, `@since`, ...), duplicates allowed
//!
//! Parsing lives in [`parse`], rendering and tag ordering in [`render`] and
//! slot-wise merging in [`merge`].

pub mod merge;
pub mod parse;
pub mod render;

pub use merge::{merge, CommentMerger, CommentMode};
pub use parse::parse;
pub use render::{order_other_tags, render, RenderOptions};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// @acp:summary "Tag category"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    Param,
    Return,
    Throws,
    /// Any other tag, holding its keyword without the `@`
    Other(String),
}

impl TagKind {
    /// Classify a tag keyword (without `@`)
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "param" => TagKind::Param,
            "return" | "returns" => TagKind::Return,
            "throws" | "exception" => TagKind::Throws,
            other => TagKind::Other(other.to_string()),
        }
    }

    pub fn keyword(&self) -> &str {
        match self {
            TagKind::Param => "param",
            TagKind::Return => "return",
            TagKind::Throws => "throws",
            TagKind::Other(k) => k,
        }
    }

    /// Kinds whose first token is an identifier
    pub fn is_named(&self) -> bool {
        matches!(self, TagKind::Param | TagKind::Throws)
    }
}

/// @acp:summary "One metadata entry inside a comment"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub kind: TagKind,
    /// Parameter or exception identifier; `None` for return and other tags
    pub name: Option<String>,
    /// Text lines; empty means present but textless
    pub comments: Vec<String>,
}

impl Tag {
    pub fn new(kind: TagKind, name: Option<String>, comments: Vec<String>) -> Self {
        Self {
            kind,
            name,
            comments,
        }
    }

    pub fn other(keyword: &str, comments: Vec<String>) -> Self {
        Self::new(TagKind::Other(keyword.to_string()), None, comments)
    }

    pub fn has_text(&self) -> bool {
        has_text(&self.comments)
    }
}

/// @acp:summary "Parsed or assembled documentation block"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavadocComment {
    pub free_text: Vec<String>,
    pub params: IndexMap<String, Tag>,
    /// `None` when absent, `Some(vec![])` for a textless `@return`
    pub return_tag: Option<Vec<String>>,
    pub throws: IndexMap<String, Tag>,
    pub other_tags: Vec<Tag>,
    /// Written with `///` lines instead of a `/** */` block
    pub is_markdown: bool,
}

impl JavadocComment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        !has_text(&self.free_text) && !self.has_tags()
    }

    pub fn has_tags(&self) -> bool {
        !self.params.is_empty()
            || self.return_tag.is_some()
            || !self.throws.is_empty()
            || !self.other_tags.is_empty()
    }

    pub fn has_free_text(&self) -> bool {
        has_text(&self.free_text)
    }

    /// True if any free text line contains a period
    pub fn contains_period(&self) -> bool {
        contains_period(&self.free_text)
    }

    pub fn ensure_terminal_period(&mut self) -> bool {
        ensure_terminal_period(&mut self.free_text)
    }

    pub fn has_return_text(&self) -> bool {
        self.return_tag.as_deref().map(has_text).unwrap_or(false)
    }

    /// Insert or extend a `@param` tag
    pub fn add_param(&mut self, name: &str, comments: Vec<String>) {
        add_named(&mut self.params, TagKind::Param, name, comments);
    }

    /// Insert or extend a `@throws` tag
    pub fn add_throws(&mut self, name: &str, comments: Vec<String>) {
        add_named(&mut self.throws, TagKind::Throws, name, comments);
    }

    /// Merge text into the single return slot
    pub fn add_return(&mut self, comments: Vec<String>) {
        match &mut self.return_tag {
            Some(existing) => existing.extend(comments),
            None => self.return_tag = Some(comments),
        }
    }

    pub fn add_other(&mut self, keyword: &str, comments: Vec<String>) {
        self.other_tags.push(Tag::other(keyword, comments));
    }

    /// Other tags with the given keyword, in appearance order
    pub fn other_tags_named<'a>(&'a self, keyword: &'a str) -> impl Iterator<Item = &'a Tag> + 'a {
        self.other_tags
            .iter()
            .filter(move |t| t.kind.keyword().eq_ignore_ascii_case(keyword))
    }

    /// Free text joined into a single line
    pub fn free_text_joined(&self) -> String {
        join_lines(&self.free_text)
    }

    /// First sentence of the free text, period included
    pub fn first_sentence(&self) -> String {
        first_sentence(&self.free_text_joined()).to_string()
    }
}

fn add_named(map: &mut IndexMap<String, Tag>, kind: TagKind, name: &str, comments: Vec<String>) {
    match map.get_mut(name) {
        Some(tag) => tag.comments.extend(comments),
        None => {
            map.insert(
                name.to_string(),
                Tag::new(kind, Some(name.to_string()), comments),
            );
        }
    }
}

pub fn has_text(lines: &[String]) -> bool {
    lines.iter().any(|l| !l.trim().is_empty())
}

pub fn contains_period(lines: &[String]) -> bool {
    lines.iter().any(|l| l.contains('.'))
}

/// Append a period to the last non-blank line when no line has one.
///
/// Returns whether the lines were changed. Blocks that already contain a
/// period anywhere are left alone.
pub fn ensure_terminal_period(lines: &mut [String]) -> bool {
    if contains_period(lines) {
        return false;
    }
    match lines.iter_mut().rev().find(|l| !l.trim().is_empty()) {
        Some(last) => {
            let trimmed_len = last.trim_end().len();
            last.truncate(trimmed_len);
            last.push('.');
            true
        }
        None => false,
    }
}

pub fn join_lines(lines: &[String]) -> String {
    lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text up to and including the first period followed by whitespace or end
pub fn first_sentence(text: &str) -> &str {
    let text = text.trim();
    let bytes = text.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'.' && (i + 1 == bytes.len() || bytes[i + 1].is_ascii_whitespace()) {
            return &text[..=i];
        }
    }
    text
}

/// Remove blank lines at both ends of a block
pub(crate) fn trim_blank_edges(lines: &mut Vec<String>) {
    while lines.last().map(|l| l.trim().is_empty()).unwrap_or(false) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|l| l.trim().is_empty()).count();
    lines.drain(..leading);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_period_already_present_elsewhere() {
        let mut comment = JavadocComment::new();
        comment.free_text = lines(&["Do something.", "More text"]);
        assert!(comment.contains_period());
        assert!(!comment.ensure_terminal_period());
        assert_eq!(comment.free_text, lines(&["Do something.", "More text"]));
    }

    #[test]
    fn test_period_appended_to_last_line_only() {
        let mut text = lines(&["First line", "second line  "]);
        assert!(ensure_terminal_period(&mut text));
        assert_eq!(text, lines(&["First line", "second line."]));
        assert_eq!(text.iter().filter(|l| l.contains('.')).count(), 1);
    }

    #[test]
    fn test_period_skips_blank_block() {
        let mut text = lines(&["", "   "]);
        assert!(!ensure_terminal_period(&mut text));
        assert_eq!(text, lines(&["", "   "]));
    }

    #[test]
    fn test_is_empty() {
        let mut comment = JavadocComment::new();
        assert!(comment.is_empty());
        comment.add_param("a", vec![]);
        assert!(!comment.is_empty());
    }

    #[test]
    fn test_first_sentence() {
        assert_eq!(first_sentence("The number. Used for x."), "The number.");
        assert_eq!(first_sentence("Version 1.2 of it"), "Version 1.2 of it");
        assert_eq!(first_sentence("No period"), "No period");
    }

    #[test]
    fn test_add_param_keeps_single_entry() {
        let mut comment = JavadocComment::new();
        comment.add_param("a", lines(&["first"]));
        comment.add_param("a", lines(&["second"]));
        assert_eq!(comment.params.len(), 1);
        assert_eq!(comment.params["a"].comments, lines(&["first", "second"]));
    }

    #[test]
    fn test_trim_blank_edges() {
        let mut text = lines(&["", "a", "", "b", " "]);
        trim_blank_edges(&mut text);
        assert_eq!(text, lines(&["a", "", "b"]));
    }
}
