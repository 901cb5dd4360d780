//! @acp:module "Findings"
//! @acp:summary "Findings, matches and aggregated search results with filtering"
//! @acp:domain cli
//! @acp:layer model
//!
//! A [`Match`] groups all findings for one source location of one element.
//! A match counts as filtered only when every one of its findings is.
//! [`SearchResult`] derives its counts from the matches on every call, so
//! toggling a filter never leaves a stale total behind.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::element::SourceRange;

/// @acp:summary "Documentation defect class"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefectKind {
    MissingJavadoc,
    MissingParam,
    InvalidParam,
    MissingReturn,
    InvalidReturn,
    MissingThrows,
    InvalidThrows,
    MissingPeriod,
    GeneratedJavadoc,
    MissingHeader,
    OutdatedHeader,
    MissingTag,
    EmptyTag,
}

impl DefectKind {
    pub const ALL: [DefectKind; 13] = [
        DefectKind::MissingJavadoc,
        DefectKind::MissingParam,
        DefectKind::InvalidParam,
        DefectKind::MissingReturn,
        DefectKind::InvalidReturn,
        DefectKind::MissingThrows,
        DefectKind::InvalidThrows,
        DefectKind::MissingPeriod,
        DefectKind::GeneratedJavadoc,
        DefectKind::MissingHeader,
        DefectKind::OutdatedHeader,
        DefectKind::MissingTag,
        DefectKind::EmptyTag,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DefectKind::MissingJavadoc => "missing-javadoc",
            DefectKind::MissingParam => "missing-param",
            DefectKind::InvalidParam => "invalid-param",
            DefectKind::MissingReturn => "missing-return",
            DefectKind::InvalidReturn => "invalid-return",
            DefectKind::MissingThrows => "missing-throws",
            DefectKind::InvalidThrows => "invalid-throws",
            DefectKind::MissingPeriod => "missing-period",
            DefectKind::GeneratedJavadoc => "generated-javadoc",
            DefectKind::MissingHeader => "missing-header",
            DefectKind::OutdatedHeader => "outdated-header",
            DefectKind::MissingTag => "missing-tag",
            DefectKind::EmptyTag => "empty-tag",
        }
    }
}

impl std::fmt::Display for DefectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DefectKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        DefectKind::ALL
            .iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Unknown defect kind: {}", s))
    }
}

/// @acp:summary "One classified defect"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: DefectKind,
    pub message: String,
    #[serde(default)]
    filtered: bool,
}

impl Finding {
    pub fn new(kind: DefectKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            filtered: false,
        }
    }

    pub fn is_filtered(&self) -> bool {
        self.filtered
    }
}

/// @acp:summary "All findings at one location of one element"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Qualified element name
    pub element: String,
    pub range: SourceRange,
    findings: Vec<Finding>,
}

impl Match {
    pub fn new(element: impl Into<String>, range: SourceRange) -> Self {
        Self {
            element: element.into(),
            range,
            findings: Vec::new(),
        }
    }

    pub fn add(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Filtered iff there is at least one finding and all are filtered
    pub fn is_filtered(&self) -> bool {
        !self.findings.is_empty() && self.findings.iter().all(|f| f.filtered)
    }

    pub fn finding_count(&self) -> usize {
        self.findings.len()
    }

    pub fn filtered_finding_count(&self) -> usize {
        self.findings.iter().filter(|f| f.filtered).count()
    }

    fn apply_filters(&mut self, filters: &HashSet<DefectKind>) {
        for finding in &mut self.findings {
            finding.filtered = filters.contains(&finding.kind);
        }
    }
}

/// Group findings by location, one match per distinct `(offset, length)`
pub fn group_findings(
    element: &str,
    findings: impl IntoIterator<Item = (SourceRange, Finding)>,
) -> Vec<Match> {
    let mut grouped: IndexMap<SourceRange, Match> = IndexMap::new();
    for (range, finding) in findings {
        grouped
            .entry(range)
            .or_insert_with(|| Match::new(element, range))
            .add(finding);
    }
    grouped.into_values().collect()
}

/// @acp:summary "Outcome status of scanning one unit"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum ScanStatus {
    Ok,
    Error(String),
}

impl ScanStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ScanStatus::Ok)
    }
}

/// A member that could not be scanned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberError {
    pub member: String,
    pub message: String,
}

/// @acp:summary "Matches found in one compilation unit"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitResult {
    pub path: PathBuf,
    pub status: ScanStatus,
    pub matches: Vec<Match>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<MemberError>,
}

impl UnitResult {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            status: ScanStatus::Ok,
            matches: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Unit that could not be opened or parsed
    pub fn failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            status: ScanStatus::Error(message.into()),
            ..Self::new(path)
        }
    }
}

/// @acp:summary "Aggregated results of a search across units"
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResult {
    units: IndexMap<PathBuf, UnitResult>,
    filters: HashSet<DefectKind>,
}

impl SearchResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or wholesale replace the results of one unit
    pub fn replace_unit(&mut self, mut unit: UnitResult) {
        for m in &mut unit.matches {
            m.apply_filters(&self.filters);
        }
        self.units.insert(unit.path.clone(), unit);
    }

    pub fn remove_unit(&mut self, path: &Path) -> Option<UnitResult> {
        self.units.shift_remove(path)
    }

    pub fn unit(&self, path: &Path) -> Option<&UnitResult> {
        self.units.get(path)
    }

    pub fn units(&self) -> impl Iterator<Item = &UnitResult> {
        self.units.values()
    }

    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.units.values().flat_map(|u| u.matches.iter())
    }

    /// Hide (`true`) or show findings of `kind`
    pub fn set_filter_enabled(&mut self, kind: DefectKind, enabled: bool) {
        let changed = if enabled {
            self.filters.insert(kind)
        } else {
            self.filters.remove(&kind)
        };
        if !changed {
            return;
        }
        for m in self.units.values_mut().flat_map(|u| u.matches.iter_mut()) {
            for finding in m.findings.iter_mut().filter(|f| f.kind == kind) {
                finding.filtered = enabled;
            }
        }
    }

    pub fn is_filter_enabled(&self, kind: DefectKind) -> bool {
        self.filters.contains(&kind)
    }

    pub fn match_count(&self) -> usize {
        self.matches().count()
    }

    pub fn visible_match_count(&self) -> usize {
        self.matches().filter(|m| !m.is_filtered()).count()
    }

    pub fn finding_count(&self) -> usize {
        self.matches().map(Match::finding_count).sum()
    }

    pub fn filtered_finding_count(&self) -> usize {
        self.matches().map(Match::filtered_finding_count).sum()
    }

    pub fn error_count(&self) -> usize {
        self.units
            .values()
            .map(|u| u.errors.len() + usize::from(!u.status.is_ok()))
            .sum()
    }
}
