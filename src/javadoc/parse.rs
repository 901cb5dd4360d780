//! @acp:module "Comment Parser"
//! @acp:summary "Turns raw doc comment text into a JavadocComment"
//! @acp:domain cli
//! @acp:layer service
//!
//! Delimiters (`/** */`, `/* */`) and line markers (`*`, `///`) are removed
//! first, then a two-state scan splits the lines into free text and tags.
//! Text without delimiters (for example rendered template output) is scanned
//! the same way. A block with an opening delimiter but no closing one is
//! kept entirely as free text.

use std::sync::LazyLock;

use regex::Regex;

use super::{trim_blank_edges, JavadocComment, TagKind};

/// Matches a tag line: `@keyword rest`
static TAG_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@([A-Za-z][\w.-]*)(?:\s+(.*))?$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Text,
    Tags,
}

/// A tag being collected until the next tag line or end of input
struct PendingTag {
    kind: TagKind,
    name: Option<String>,
    comments: Vec<String>,
}

/// @acp:summary "Parse raw comment text into the comment model"
pub fn parse(raw: &str) -> JavadocComment {
    let (lines, is_markdown, balanced) = strip_delimiters(raw);

    let mut comment = JavadocComment {
        is_markdown,
        ..Default::default()
    };

    if !balanced {
        comment.free_text = lines;
        trim_blank_edges(&mut comment.free_text);
        return comment;
    }

    let mut state = State::Text;
    let mut pending: Option<PendingTag> = None;

    for line in lines {
        let trimmed = line.trim();
        if let Some(caps) = TAG_LINE.captures(trimmed) {
            if let Some(tag) = pending.take() {
                commit(&mut comment, tag);
            }
            state = State::Tags;
            let keyword = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let rest = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
            pending = Some(start_tag(keyword, rest));
            continue;
        }

        match state {
            State::Text => comment.free_text.push(line),
            State::Tags => {
                if let Some(tag) = pending.as_mut() {
                    tag.comments.push(trimmed.to_string());
                }
            }
        }
    }

    if let Some(tag) = pending.take() {
        commit(&mut comment, tag);
    }
    trim_blank_edges(&mut comment.free_text);
    comment
}

fn start_tag(keyword: &str, rest: &str) -> PendingTag {
    let kind = TagKind::from_keyword(keyword);
    let mut comments = Vec::new();

    let name = if kind.is_named() {
        let mut parts = rest.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default().to_string();
        let text = parts.next().unwrap_or_default().trim();
        if !text.is_empty() {
            comments.push(text.to_string());
        }
        Some(name)
    } else {
        if !rest.is_empty() {
            comments.push(rest.to_string());
        }
        None
    };

    PendingTag {
        kind,
        name,
        comments,
    }
}

fn commit(comment: &mut JavadocComment, tag: PendingTag) {
    let mut comments = tag.comments;
    trim_blank_edges(&mut comments);

    match tag.kind {
        TagKind::Param => comment.add_param(tag.name.as_deref().unwrap_or_default(), comments),
        TagKind::Throws => comment.add_throws(tag.name.as_deref().unwrap_or_default(), comments),
        TagKind::Return => comment.add_return(comments),
        TagKind::Other(keyword) => comment.add_other(&keyword, comments),
    }
}

/// Strip comment delimiters and per-line markers.
///
/// Returns the content lines, whether `///` markers were used, and whether
/// the delimiters were balanced.
fn strip_delimiters(raw: &str) -> (Vec<String>, bool, bool) {
    let text = raw.trim();

    if text.starts_with("///") {
        let lines = text
            .lines()
            .map(|line| {
                let line = line.trim_start();
                match line.strip_prefix("///") {
                    Some(rest) => strip_one_space(rest).trim_end().to_string(),
                    None => line.trim_end().to_string(),
                }
            })
            .collect();
        return (lines, true, true);
    }

    if let Some(after_open) = text.strip_prefix("/*") {
        let after_open = after_open.strip_prefix('*').unwrap_or(after_open);
        let (body, balanced) = match after_open.strip_suffix("*/") {
            Some(body) => (body, true),
            // `/**/` leaves nothing between the delimiters
            None if text == "/**/" => ("", true),
            None => (after_open, false),
        };
        let lines = body.lines().map(strip_block_marker).collect();
        return (lines, false, balanced);
    }

    let lines = text.lines().map(|l| l.trim_end().to_string()).collect();
    (lines, false, true)
}

fn strip_block_marker(line: &str) -> String {
    let line = line.trim_start();
    let line = match line.strip_prefix('*') {
        Some(rest) if !rest.starts_with('/') => strip_one_space(rest),
        Some(rest) => rest,
        None => line,
    };
    line.trim_end().to_string()
}

fn strip_one_space(s: &str) -> &str {
    s.strip_prefix(' ').unwrap_or(s)
}
