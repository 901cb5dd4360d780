//! @acp:module "Comment Merger"
//! @acp:summary "Slot-wise merge of existing and generated comments"
//! @acp:domain cli
//! @acp:layer service

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{has_text, JavadocComment, Tag};

/// @acp:summary "How generated content combines with an existing comment"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommentMode {
    /// Documented members are left untouched
    Keep,
    /// Existing content wins; generated content fills gaps
    #[default]
    Complete,
    /// Generated content wins; other tags of the existing comment survive
    Replace,
}

impl std::fmt::Display for CommentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommentMode::Keep => write!(f, "keep"),
            CommentMode::Complete => write!(f, "complete"),
            CommentMode::Replace => write!(f, "replace"),
        }
    }
}

impl std::str::FromStr for CommentMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keep" => Ok(CommentMode::Keep),
            "complete" => Ok(CommentMode::Complete),
            "replace" => Ok(CommentMode::Replace),
            _ => Err(format!("Unknown comment mode: {}", s)),
        }
    }
}

/// @acp:summary "Merges existing documentation with generated documentation"
pub struct CommentMerger {
    mode: CommentMode,
}

impl CommentMerger {
    pub fn new(mode: CommentMode) -> Self {
        Self { mode }
    }

    pub fn merge(&self, existing: &JavadocComment, generated: &JavadocComment) -> JavadocComment {
        match self.mode {
            CommentMode::Keep if !existing.is_empty() => existing.clone(),
            CommentMode::Keep | CommentMode::Complete => merge(existing, generated),
            CommentMode::Replace => {
                let survivors = JavadocComment {
                    other_tags: existing.other_tags.clone(),
                    is_markdown: existing.is_markdown,
                    ..Default::default()
                };
                let mut merged = merge(generated, &survivors);
                merged.is_markdown = existing.is_markdown || generated.is_markdown;
                merged
            }
        }
    }
}

/// @acp:summary "Merge two comments preferring the first non-empty value per slot"
///
/// Named tags keep the first comment's order; names only present in the
/// second comment are appended. Other tags of the second comment are added
/// only for keywords the first comment does not use.
pub fn merge(first: &JavadocComment, second: &JavadocComment) -> JavadocComment {
    let free_text = if has_text(&first.free_text) {
        first.free_text.clone()
    } else {
        second.free_text.clone()
    };

    let return_tag = match (&first.return_tag, &second.return_tag) {
        (Some(a), _) if has_text(a) => Some(a.clone()),
        (_, Some(b)) => Some(b.clone()),
        (a, None) => a.clone(),
    };

    let mut other_tags = first.other_tags.clone();
    for tag in &second.other_tags {
        if !first.other_tags.iter().any(|t| t.kind == tag.kind) {
            other_tags.push(tag.clone());
        }
    }

    JavadocComment {
        free_text,
        params: merge_named(&first.params, &second.params),
        return_tag,
        throws: merge_named(&first.throws, &second.throws),
        other_tags,
        is_markdown: first.is_markdown,
    }
}

fn merge_named(first: &IndexMap<String, Tag>, second: &IndexMap<String, Tag>) -> IndexMap<String, Tag> {
    let mut merged = IndexMap::new();

    for (name, tag) in first {
        let chosen = match second.get(name) {
            Some(other) if !tag.has_text() && other.has_text() => other,
            _ => tag,
        };
        merged.insert(name.clone(), chosen.clone());
    }

    for (name, tag) in second {
        if !merged.contains_key(name) {
            merged.insert(name.clone(), tag.clone());
        }
    }

    merged
}
