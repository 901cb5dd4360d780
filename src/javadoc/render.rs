//! @acp:module "Comment Renderer"
//! @acp:summary "Renders a JavadocComment back to source text"
//! @acp:domain cli
//! @acp:layer service
//!
//! Tag order is fixed for `@param`, `@return` and `@throws` (in that order,
//! each in insertion order). Every other tag follows, sorted by the
//! configured tag-order list; unknown tags go last and keep their original
//! relative order.

use super::{JavadocComment, Tag};

/// @acp:summary "Layout options for rendering"
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions<'a> {
    /// Whitespace prefixed to every line after the first
    pub indent: &'a str,
    /// Emit `///` lines instead of a `/** */` block
    pub markdown: bool,
    /// Allow `/** text */` when there is one free text line and no tags
    pub single_line: bool,
    /// Ordering for tags other than param/return/throws
    pub tag_order: &'a [String],
}

impl Default for RenderOptions<'_> {
    fn default() -> Self {
        Self {
            indent: "",
            markdown: false,
            single_line: false,
            tag_order: &[],
        }
    }
}

/// @acp:summary "Render a comment; the first line carries no indent"
pub fn render(comment: &JavadocComment, options: &RenderOptions) -> String {
    let body = body_lines(comment, options.tag_order);

    if options.markdown {
        let lines: Vec<String> = if body.is_empty() {
            vec!["///".to_string()]
        } else {
            body.iter().map(|l| marker_line("///", l)).collect()
        };
        return join_with_indent(&lines, options.indent);
    }

    if options.single_line && !comment.has_tags() && body.len() == 1 {
        return format!("/** {} */", body[0]);
    }

    let mut lines = Vec::with_capacity(body.len() + 2);
    lines.push("/**".to_string());
    if body.is_empty() {
        lines.push(" *".to_string());
    }
    lines.extend(body.iter().map(|l| marker_line(" *", l)));
    lines.push(" */".to_string());
    join_with_indent(&lines, options.indent)
}

/// Content lines without markers: free text, separator, tags
fn body_lines(comment: &JavadocComment, tag_order: &[String]) -> Vec<String> {
    let mut lines: Vec<String> = comment.free_text.clone();
    let tags = tag_lines(comment, tag_order);
    if !lines.is_empty() && !tags.is_empty() {
        lines.push(String::new());
    }
    lines.extend(tags);
    lines
}

fn tag_lines(comment: &JavadocComment, tag_order: &[String]) -> Vec<String> {
    let mut lines = Vec::new();

    for tag in comment.params.values() {
        push_tag(&mut lines, tag);
    }
    if let Some(text) = &comment.return_tag {
        push_lines(&mut lines, "@return".to_string(), text);
    }
    for tag in comment.throws.values() {
        push_tag(&mut lines, tag);
    }
    for tag in order_other_tags(&comment.other_tags, tag_order) {
        push_tag(&mut lines, tag);
    }
    lines
}

fn push_tag(lines: &mut Vec<String>, tag: &Tag) {
    let head = match &tag.name {
        Some(name) if !name.is_empty() => format!("@{} {}", tag.kind.keyword(), name),
        _ => format!("@{}", tag.kind.keyword()),
    };
    push_lines(lines, head, &tag.comments);
}

fn push_lines(lines: &mut Vec<String>, head: String, comments: &[String]) {
    match comments.split_first() {
        Some((first, rest)) => {
            lines.push(format!("{} {}", head, first));
            lines.extend(rest.iter().cloned());
        }
        None => lines.push(head),
    }
}

/// @acp:summary "Stable sort of other tags by the configured order"
pub fn order_other_tags<'a>(tags: &'a [Tag], tag_order: &[String]) -> Vec<&'a Tag> {
    let rank = |tag: &Tag| {
        tag_order
            .iter()
            .position(|k| k.trim_start_matches('@').eq_ignore_ascii_case(tag.kind.keyword()))
            .unwrap_or(usize::MAX)
    };
    let mut ordered: Vec<&Tag> = tags.iter().collect();
    ordered.sort_by_key(|t| rank(t));
    ordered
}

fn marker_line(marker: &str, line: &str) -> String {
    if line.is_empty() {
        marker.to_string()
    } else {
        format!("{} {}", marker, line)
    }
}

fn join_with_indent(lines: &[String], indent: &str) -> String {
    let mut out = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
            out.push_str(indent);
        }
        out.push_str(line);
    }
    out
}
