//! @acp:module "Source Edits"
//! @acp:summary "Plans and applies doc comment edits to a compilation unit"
//! @acp:domain cli
//! @acp:layer service
//!
//! Edits are byte-range replacements against the original source. A member
//! with a comment gets its comment range replaced; a member without one gets
//! the rendered comment inserted at its declaration start, followed by a
//! newline and the declaration indent.

use std::collections::HashSet;
use std::path::Path;

use similar::TextDiff;

use super::header::{render_header, same_text};
use super::Generator;
use crate::element::{CompilationUnit, SourceRange};
use crate::error::{AutodocError, Result};
use crate::javadoc::{self, JavadocComment};

/// @acp:summary "One replacement of a source byte range"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub range: SourceRange,
    pub replacement: String,
}

impl TextEdit {
    pub fn insert(offset: usize, text: String) -> Self {
        Self {
            range: SourceRange::new(offset, 0),
            replacement: text,
        }
    }

    pub fn replace(range: SourceRange, text: String) -> Self {
        Self {
            range,
            replacement: text,
        }
    }
}

/// Planned edits plus members that could not be processed
#[derive(Debug, Default)]
pub struct EditPlan {
    pub edits: Vec<TextEdit>,
    pub failures: Vec<(String, AutodocError)>,
}

impl EditPlan {
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }
}

/// @acp:summary "Compute comment edits for every documentable member"
pub fn plan_edits(unit: &CompilationUnit, generator: &Generator) -> EditPlan {
    let mut plan = EditPlan::default();
    let fields = unit.fields();
    let mut insert_points = HashSet::new();
    let mut edited_docs = HashSet::new();

    if let Some(edit) = header_edit(unit, generator) {
        plan.edits.push(edit);
    }

    for member in &unit.members {
        if !generator.should_document(member, &fields) {
            continue;
        }

        let existing = member
            .doc()
            .map(|d| javadoc::parse(&d.text))
            .unwrap_or_else(JavadocComment::new);

        let comment = match generator.document(member, &existing, &fields) {
            Ok(comment) => comment,
            Err(e) => {
                tracing::warn!(member = %member.qualified_name(), error = %e, "skipping member");
                plan.failures.push((member.qualified_name(), e));
                continue;
            }
        };

        match member.doc() {
            Some(doc) => {
                // Keep the author's layout when nothing changed
                if comment == existing {
                    continue;
                }
                // Several field declarators share one comment
                if !edited_docs.insert(doc.range.offset) {
                    continue;
                }
                let rendered = generator.render(member, &comment);
                if rendered != doc.text {
                    plan.edits.push(TextEdit::replace(doc.range, rendered));
                }
            }
            None => {
                if comment.is_empty() {
                    continue;
                }
                let declaration = member.declaration();
                // Several field declarators share one declaration start
                if !insert_points.insert(declaration.start) {
                    continue;
                }
                let rendered = generator.render(member, &comment);
                plan.edits.push(TextEdit::insert(
                    declaration.start,
                    format!("{}\n{}", rendered, declaration.indent),
                ));
            }
        }
    }

    tracing::debug!(path = %unit.path.display(), edits = plan.edits.len(), "planned edits");
    plan
}

fn header_edit(unit: &CompilationUnit, generator: &Generator) -> Option<TextEdit> {
    let config = generator.config();
    if !config.add_header() {
        return None;
    }
    let template = config.header_template()?;
    let rendered = match render_header(generator.templates(), template, unit) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => return None,
        Err(e) => {
            tracing::warn!(path = %unit.path.display(), error = %e, "header template failed");
            return None;
        }
    };

    match &unit.header {
        None => Some(TextEdit::insert(0, format!("{}\n", rendered))),
        Some(existing) if config.replace_header() && !same_text(&existing.text, &rendered) => {
            Some(TextEdit::replace(existing.range, rendered))
        }
        Some(_) => None,
    }
}

/// @acp:summary "Apply non-overlapping edits to the source text"
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> Result<String> {
    let mut ordered: Vec<&TextEdit> = edits.iter().collect();
    ordered.sort_by_key(|e| (e.range.offset, e.range.length));

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in ordered {
        let range = edit.range;
        if range.offset < cursor {
            return Err(AutodocError::Other(format!(
                "overlapping edits at byte {}",
                range.offset
            )));
        }
        let end = range.end();
        if end > source.len() || !source.is_char_boundary(range.offset) || !source.is_char_boundary(end) {
            return Err(AutodocError::Other(format!(
                "edit range {}..{} is outside the source",
                range.offset, end
            )));
        }
        out.push_str(&source[cursor..range.offset]);
        out.push_str(&edit.replacement);
        cursor = end;
    }
    out.push_str(&source[cursor..]);
    Ok(out)
}

/// @acp:summary "Unified diff preview of a planned change"
pub fn unified_diff(path: &Path, old: &str, new: &str) -> String {
    let label = path.display().to_string();
    let (before, after) = (format!("a/{}", label), format!("b/{}", label));
    let diff = TextDiff::from_lines(old, new);
    let mut unified = diff.unified_diff();
    unified.context_radius(3).header(&before, &after);
    unified.to_string()
}
