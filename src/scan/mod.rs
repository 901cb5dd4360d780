//! @acp:module "Defect Scanner"
//! @acp:summary "Walks the members of a unit and classifies documentation defects"
//! @acp:domain cli
//! @acp:layer service
//!
//! # Scan Lifecycle
//!
//! `start_processing → process_file_header → process_member* → stop_processing`
//!
//! Each member is evaluated independently against every enabled defect
//! class. Findings of one member are grouped by location and added to the
//! unit in one step, so cancelling between members never leaves a half-built
//! match behind. A member that fails is recorded and the scan moves on.
//!
//! A scanner instance handles one unit at a time (`&mut self`); scan disjoint
//! units in parallel with one clone per worker.

pub mod findings;
pub mod pattern;

pub use findings::{
    group_findings, DefectKind, Finding, Match, MemberError, ScanStatus, SearchResult, UnitResult,
};
pub use pattern::{CustomTagCheck, SearchPattern, TagModifier};

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::element::{simple_type_name, CompilationUnit, FieldElement, Member, Parameter, SourceRange};
use crate::error::{AutodocError, Result};
use crate::generator::header::{render_header, same_text};
use crate::generator::Generator;
use crate::javadoc::{self, JavadocComment};

/// @acp:summary "Cooperative cancellation flag shared with the host"
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// @acp:summary "Documentation defect scanner"
#[derive(Clone)]
pub struct DefectScanner {
    pattern: SearchPattern,
    generator: Generator,
    current: Option<UnitResult>,
}

impl DefectScanner {
    pub fn new(pattern: SearchPattern, generator: Generator) -> Self {
        Self {
            pattern,
            generator,
            current: None,
        }
    }

    pub fn pattern(&self) -> &SearchPattern {
        &self.pattern
    }

    /// @acp:summary "Run the whole lifecycle over one unit"
    pub fn scan_unit(&mut self, unit: &CompilationUnit, cancel: &CancellationToken) -> UnitResult {
        self.start_processing(unit);
        self.process_file_header(unit);

        let fields = unit.fields();
        let mut status = ScanStatus::Ok;
        for member in &unit.members {
            if cancel.is_cancelled() {
                tracing::debug!(path = %unit.path.display(), "scan cancelled");
                status = ScanStatus::Error(AutodocError::Cancelled.to_string());
                break;
            }
            if let Err(e) = self.process_member(member, &fields) {
                tracing::warn!(member = %member.qualified_name(), error = %e, "member scan failed");
                if let Some(current) = self.current.as_mut() {
                    current.errors.push(MemberError {
                        member: member.qualified_name(),
                        message: e.to_string(),
                    });
                }
            }
        }

        self.stop_processing(status)
    }

    pub fn start_processing(&mut self, unit: &CompilationUnit) {
        self.current = Some(UnitResult::new(unit.path.clone()));
    }

    /// Check for a missing or outdated file header
    pub fn process_file_header(&mut self, unit: &CompilationUnit) {
        if !self.pattern.checks_header() {
            return;
        }
        let element = unit.primary_type_name();

        let finding = match &unit.header {
            None if self.pattern.missing_header => Some((
                SourceRange::new(0, 0),
                Finding::new(DefectKind::MissingHeader, "Missing file header"),
            )),
            None => None,
            Some(header) if self.pattern.outdated_header => self
                .expected_header(unit)
                .filter(|expected| !same_text(&header.text, expected))
                .map(|_| {
                    (
                        header.range,
                        Finding::new(DefectKind::OutdatedHeader, "File header is outdated"),
                    )
                }),
            Some(_) => None,
        };

        if let (Some(current), Some(finding)) = (self.current.as_mut(), finding) {
            current.matches.extend(group_findings(&element, [finding]));
        }
    }

    fn expected_header(&self, unit: &CompilationUnit) -> Option<String> {
        let template = self.generator.config().header_template()?;
        match render_header(self.generator.templates(), template, unit) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!(path = %unit.path.display(), error = %e, "header template failed");
                None
            }
        }
    }

    /// @acp:summary "Evaluate all enabled defect classes for one member"
    pub fn process_member(&mut self, member: &Member, fields: &[FieldElement]) -> Result<()> {
        if self.current.is_none() {
            return Err(AutodocError::Other("process_member called before start_processing".to_string()));
        }
        if !self.pattern.includes(member) {
            return Ok(());
        }

        let findings = self.member_findings(member, fields)?;
        if let Some(current) = self.current.as_mut() {
            current.matches.extend(group_findings(&member.qualified_name(), findings));
        }
        Ok(())
    }

    pub fn stop_processing(&mut self, status: ScanStatus) -> UnitResult {
        let mut result = self.current.take().unwrap_or_else(|| UnitResult::new(""));
        result.status = status;
        result
    }

    fn member_findings(&self, member: &Member, fields: &[FieldElement]) -> Result<Vec<(SourceRange, Finding)>> {
        let pattern = &self.pattern;
        let at = member.declaration().name_range;
        let existing = member
            .doc()
            .map(|d| javadoc::parse(&d.text))
            .unwrap_or_else(JavadocComment::new);

        let mut found = Vec::new();
        let mut push = |kind, message: String| found.push((at, Finding::new(kind, message)));

        if pattern.missing_javadoc && !existing.has_free_text() {
            push(DefectKind::MissingJavadoc, format!("Missing Javadoc for '{}'", member.name()));
        }

        let (formal, type_parameters): (&[Parameter], &[String]) = match member {
            Member::Method(m) => (m.parameters.as_slice(), m.type_parameters.as_slice()),
            Member::Record(r) => (r.components.as_slice(), r.type_parameters.as_slice()),
            Member::Type(t) => (&[][..], t.type_parameters.as_slice()),
            Member::Field(_) | Member::Parameter(_) => (&[][..], &[][..]),
        };
        let mut expected: Vec<String> = formal.iter().map(|p| p.name.clone()).collect();
        expected.extend(type_parameters.iter().map(|t| format!("<{}>", t)));

        if pattern.missing_param {
            for name in &expected {
                if !existing.params.get(name).map(|t| t.has_text()).unwrap_or(false) {
                    push(DefectKind::MissingParam, format!("Missing @param tag for '{}'", name));
                }
            }
        }
        if pattern.invalid_param {
            for name in existing.params.keys() {
                if !expected.contains(name) {
                    push(DefectKind::InvalidParam, format!("Invalid @param tag '{}'", name));
                }
            }
        }

        if let Member::Method(method) = member {
            if pattern.missing_return && !method.is_void() && !existing.has_return_text() {
                push(DefectKind::MissingReturn, "Missing @return tag".to_string());
            }
            if pattern.invalid_return && method.is_void() && existing.return_tag.is_some() {
                push(DefectKind::InvalidReturn, "Invalid @return tag for void method".to_string());
            }

            let declared: HashSet<&str> = method.thrown_types.iter().map(|t| simple_type_name(t)).collect();
            if pattern.missing_throws {
                for thrown in &method.thrown_types {
                    let simple = simple_type_name(thrown);
                    let documented = existing
                        .throws
                        .iter()
                        .any(|(name, tag)| simple_type_name(name) == simple && tag.has_text());
                    if !documented {
                        push(DefectKind::MissingThrows, format!("Missing @throws tag for '{}'", simple));
                    }
                }
            }
            if pattern.invalid_throws {
                for name in existing.throws.keys() {
                    if !declared.contains(simple_type_name(name)) {
                        push(DefectKind::InvalidThrows, format!("Invalid @throws tag '{}'", name));
                    }
                }
            }
        }

        if pattern.missing_period && existing.has_free_text() && !existing.contains_period() {
            push(DefectKind::MissingPeriod, "Missing period in Javadoc".to_string());
        }

        for check in pattern.custom_tags.iter().filter(|c| c.applies_to(member.kind())) {
            let keyword = check.keyword();
            let present = existing.other_tags_named(keyword).next().is_some();
            let has_text = existing.other_tags_named(keyword).any(|t| t.has_text());
            let (report_missing, report_empty) = match check.modifier {
                TagModifier::All => (true, true),
                TagModifier::OnlyMissing => (true, false),
                TagModifier::OnlyEmpty => (false, true),
            };
            if report_missing && !present {
                push(DefectKind::MissingTag, format!("Missing @{} tag", keyword));
            } else if report_empty && present && !has_text {
                push(DefectKind::EmptyTag, format!("Empty @{} tag", keyword));
            }
        }

        if pattern.generated_javadoc && !existing.is_empty() && self.looks_generated(member, &existing, fields)? {
            push(DefectKind::GeneratedJavadoc, "Javadoc looks generated".to_string());
        }

        Ok(found)
    }

    /// Whether the existing comment equals a fresh generation for the member
    fn looks_generated(&self, member: &Member, existing: &JavadocComment, fields: &[FieldElement]) -> Result<bool> {
        let mut generated = self.generator.generate(member, &JavadocComment::new(), fields)?;
        generated.is_markdown = existing.is_markdown;
        let expected = self.generator.render(member, &generated);
        let actual = self.generator.render(member, existing);
        Ok(same_text(&expected, &actual))
    }
}
