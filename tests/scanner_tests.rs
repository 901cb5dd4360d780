//! Defect scanner tests
//!
//! Scans parsed Java sources and checks classification, grouping and
//! filtering of findings.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use autodoc::element::ElementProvider;
use autodoc::generator::{apply_edits, plan_edits, Generator, NoTemplates};
use autodoc::scan::{CustomTagCheck, TagModifier};
use autodoc::{
    CancellationToken, CompilationUnit, ConfigSnapshot, DefectKind, DefectScanner, Indexer, JavaSourceParser,
    MemberKind, ScanStatus, SearchPattern, SearchResult, SourceRange, UnitResult,
};
use tempfile::TempDir;

const CALC: &str = r#"package com.acme;

/**
 * Simple calculator.
 */
public class Calc {
    /**
     * Adds.
     * @param a the first operand
     * @return the sum
     */
    public int add(int a, int b) {
        return a + b;
    }

    /**
     * Resets the state
     * @param unused nothing
     * @return nothing
     * @throws java.io.IOException never
     */
    public void reset() {
    }

    public void load() throws java.io.IOException {
    }
}
"#;

fn parse(path: &str, source: &str) -> CompilationUnit {
    JavaSourceParser::new().parse_unit(Path::new(path), source).unwrap()
}

fn scanner(pattern: SearchPattern) -> DefectScanner {
    let generator = Generator::new(Arc::new(ConfigSnapshot::default()), Arc::new(NoTemplates));
    DefectScanner::new(pattern, generator)
}

fn only(kind: DefectKind) -> SearchPattern {
    let mut pattern = SearchPattern::none();
    match kind {
        DefectKind::MissingJavadoc => pattern.missing_javadoc = true,
        DefectKind::MissingParam => pattern.missing_param = true,
        DefectKind::InvalidParam => pattern.invalid_param = true,
        DefectKind::MissingReturn => pattern.missing_return = true,
        DefectKind::InvalidReturn => pattern.invalid_return = true,
        DefectKind::MissingThrows => pattern.missing_throws = true,
        DefectKind::InvalidThrows => pattern.invalid_throws = true,
        DefectKind::MissingPeriod => pattern.missing_period = true,
        DefectKind::GeneratedJavadoc => pattern.generated_javadoc = true,
        DefectKind::MissingHeader => pattern.missing_header = true,
        DefectKind::OutdatedHeader => pattern.outdated_header = true,
        DefectKind::MissingTag | DefectKind::EmptyTag => {}
    }
    pattern
}

fn scan(pattern: SearchPattern, path: &str, source: &str) -> UnitResult {
    scanner(pattern).scan_unit(&parse(path, source), &CancellationToken::new())
}

/// (element, kind) pairs of every finding
fn kinds(result: &UnitResult) -> Vec<(String, DefectKind)> {
    result
        .matches
        .iter()
        .flat_map(|m| m.findings().iter().map(move |f| (m.element.clone(), f.kind)))
        .collect()
}

// =============================================================================
// Member checks
// =============================================================================

mod member_tests {
    use super::*;

    #[test]
    fn test_missing_param_reports_only_undocumented_parameter() {
        let result = scan(only(DefectKind::MissingParam), "Calc.java", CALC);
        assert_eq!(result.matches.len(), 1);

        let m = &result.matches[0];
        assert_eq!(m.element, "Calc.add");
        assert_eq!(m.findings().len(), 1);
        assert!(m.findings()[0].message.contains("'b'"));

        let offset = CALC.find("add(int").unwrap();
        assert_eq!(m.range, SourceRange::new(offset, 3));
    }

    #[test]
    fn test_invalid_tags_on_void_method() {
        let mut pattern = only(DefectKind::InvalidParam);
        pattern.invalid_return = true;
        pattern.invalid_throws = true;
        let result = scan(pattern, "Calc.java", CALC);

        let found = kinds(&result);
        assert!(found.contains(&("Calc.reset".to_string(), DefectKind::InvalidParam)));
        assert!(found.contains(&("Calc.reset".to_string(), DefectKind::InvalidReturn)));
        assert!(found.contains(&("Calc.reset".to_string(), DefectKind::InvalidThrows)));
        // All three share the name range of `reset`
        assert_eq!(result.matches.len(), 1);
    }

    #[test]
    fn test_missing_javadoc_and_throws() {
        let mut pattern = only(DefectKind::MissingJavadoc);
        pattern.missing_throws = true;
        let result = scan(pattern, "Calc.java", CALC);
        let found = kinds(&result);
        assert_eq!(
            found,
            vec![
                ("Calc.load".to_string(), DefectKind::MissingJavadoc),
                ("Calc.load".to_string(), DefectKind::MissingThrows),
            ]
        );
    }

    #[test]
    fn test_missing_period() {
        let result = scan(only(DefectKind::MissingPeriod), "Calc.java", CALC);
        assert_eq!(kinds(&result), vec![("Calc.reset".to_string(), DefectKind::MissingPeriod)]);
    }

    #[test]
    fn test_missing_return() {
        let source = "class A {\n    /** Size. */\n    int size() { return 0; }\n}\n";
        let result = scan(only(DefectKind::MissingReturn), "A.java", source);
        assert_eq!(kinds(&result), vec![("A.size".to_string(), DefectKind::MissingReturn)]);
    }

    #[test]
    fn test_visibility_filter_skips_private_members() {
        let source = "class A {\n    private void hidden() {}\n    public void shown() {}\n}\n";
        let mut pattern = only(DefectKind::MissingJavadoc);
        pattern.visibility.private = false;
        pattern.visibility.package = false;
        let result = scan(pattern, "A.java", source);
        assert_eq!(kinds(&result), vec![("A.shown".to_string(), DefectKind::MissingJavadoc)]);
    }

    #[test]
    fn test_custom_tag_modifiers() {
        let source = "/**\n * Pool.\n * @author\n */\nclass Pool {\n    /** Size. */\n    int size;\n}\n";

        let mut pattern = SearchPattern::none();
        pattern.custom_tags = vec![CustomTagCheck::new("@author", TagModifier::All)];
        let result = scan(pattern.clone(), "Pool.java", source);
        assert_eq!(
            kinds(&result),
            vec![
                ("Pool".to_string(), DefectKind::EmptyTag),
                ("Pool.size".to_string(), DefectKind::MissingTag),
            ]
        );

        pattern.custom_tags = vec![CustomTagCheck::new("author", TagModifier::OnlyMissing)];
        let result = scan(pattern.clone(), "Pool.java", source);
        assert_eq!(kinds(&result), vec![("Pool.size".to_string(), DefectKind::MissingTag)]);

        let mut check = CustomTagCheck::new("author", TagModifier::OnlyEmpty);
        check.kinds = vec![MemberKind::Type];
        pattern.custom_tags = vec![check];
        let result = scan(pattern, "Pool.java", source);
        assert_eq!(kinds(&result), vec![("Pool".to_string(), DefectKind::EmptyTag)]);
    }
}

// =============================================================================
// Generated-looking comments
// =============================================================================

mod generated_tests {
    use super::*;

    const QUIZ: &str = "class Quiz {\n    /** The number of questions. */\n    private int numberOfQuestions;\n\n    public int getNumberOfQuestions() {\n        return numberOfQuestions;\n    }\n\n    public int total() {\n        return 0;\n    }\n}\n";

    fn generated_source() -> String {
        let generator = Generator::new(Arc::new(ConfigSnapshot::default()), Arc::new(NoTemplates));
        let unit = parse("Quiz.java", QUIZ);
        let plan = plan_edits(&unit, &generator);
        apply_edits(QUIZ, &plan.edits).unwrap()
    }

    #[test]
    fn test_untouched_generated_comments_are_flagged() {
        let source = generated_source();
        let result = scan(only(DefectKind::GeneratedJavadoc), "Quiz.java", &source);
        let flagged: Vec<String> = kinds(&result).into_iter().map(|(element, _)| element).collect();
        assert!(flagged.contains(&"Quiz.getNumberOfQuestions".to_string()));
        assert!(flagged.contains(&"Quiz.total".to_string()));
    }

    #[test]
    fn test_edited_comment_is_not_flagged() {
        let source = generated_source().replace("Total.", "Sum of all recorded scores.");
        let result = scan(only(DefectKind::GeneratedJavadoc), "Quiz.java", &source);
        let flagged: Vec<String> = kinds(&result).into_iter().map(|(element, _)| element).collect();
        assert!(!flagged.contains(&"Quiz.total".to_string()));
    }

    #[test]
    fn test_whitespace_differences_are_ignored() {
        let source = generated_source().replace("     * Total.", "     *   Total.  ");
        let result = scan(only(DefectKind::GeneratedJavadoc), "Quiz.java", &source);
        assert!(kinds(&result).iter().any(|(e, _)| e == "Quiz.total"));
    }
}

// =============================================================================
// File headers
// =============================================================================

mod header_tests {
    use super::*;

    fn header_config() -> ConfigSnapshot {
        ConfigSnapshot::builder()
            .header_template(Some("/*\n * {{fileName}}\n */".to_string()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_missing_header() {
        let result = scanner(only(DefectKind::MissingHeader))
            .scan_unit(&parse("A.java", "class A {}\n"), &CancellationToken::new());
        assert_eq!(kinds(&result), vec![("A".to_string(), DefectKind::MissingHeader)]);
    }

    #[test]
    fn test_outdated_header() {
        let generator = Generator::from_config(Arc::new(header_config())).unwrap();
        let mut scanner = DefectScanner::new(only(DefectKind::OutdatedHeader), generator);

        let current = parse("A.java", "/*\n * A.java\n */\nclass A {}\n");
        let result = scanner.scan_unit(&current, &CancellationToken::new());
        assert!(result.matches.is_empty());

        let stale = parse("A.java", "/*\n * Old.java\n */\nclass A {}\n");
        let result = scanner.scan_unit(&stale, &CancellationToken::new());
        assert_eq!(kinds(&result), vec![("A".to_string(), DefectKind::OutdatedHeader)]);
        assert_eq!(result.matches[0].range.offset, 0);
    }
}

// =============================================================================
// Aggregation, filtering and lifecycle
// =============================================================================

mod result_tests {
    use super::*;

    #[test]
    fn test_filters_hide_matches_only_when_all_findings_hidden() {
        let mut pattern = only(DefectKind::MissingJavadoc);
        pattern.missing_throws = true;
        let mut result = SearchResult::new();
        result.replace_unit(scan(pattern, "Calc.java", CALC));
        assert_eq!(result.visible_match_count(), 1);

        result.set_filter_enabled(DefectKind::MissingThrows, true);
        assert_eq!(result.visible_match_count(), 1);
        assert_eq!(result.filtered_finding_count(), 1);

        result.set_filter_enabled(DefectKind::MissingJavadoc, true);
        assert_eq!(result.visible_match_count(), 0);
        assert_eq!(result.match_count(), 1);

        result.set_filter_enabled(DefectKind::MissingThrows, false);
        assert_eq!(result.visible_match_count(), 1);
        assert_eq!(result.filtered_finding_count(), 1);
    }

    #[test]
    fn test_cancelled_scan_reports_error_status() {
        let token = CancellationToken::new();
        token.cancel();
        let result = scanner(SearchPattern::default()).scan_unit(&parse("Calc.java", CALC), &token);
        assert_eq!(result.status, ScanStatus::Error("Operation cancelled".to_string()));
        assert!(result.matches.is_empty());
    }

    #[test]
    fn test_rescan_replaces_unit_results() {
        let mut result = SearchResult::new();
        result.replace_unit(scan(SearchPattern::default(), "Calc.java", CALC));
        let before = result.finding_count();
        assert!(before > 0);

        let fixed = "/** Done. */\npublic class Calc {\n}\n";
        result.replace_unit(scan(SearchPattern::default(), "Calc.java", fixed));
        assert_eq!(result.finding_count(), 0);
        assert_eq!(result.units().count(), 1);
    }

    #[test]
    fn test_scan_directory_with_indexer() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("Calc.java"), CALC).unwrap();
        fs::write(src.join("Empty.java"), "/** Empty. */\nclass Empty {}\n").unwrap();

        let config = ConfigSnapshot::default();
        let indexer = Indexer::new(&config).unwrap();
        let files = indexer.find_files(&[temp.path().to_path_buf()]);
        assert_eq!(files.len(), 2);

        let mut scanner = scanner(only(DefectKind::MissingJavadoc));
        let mut result = SearchResult::new();
        for (path, unit) in indexer.load_units(&files) {
            let unit_result = match unit {
                Ok(unit) => scanner.scan_unit(&unit, &CancellationToken::new()),
                Err(e) => UnitResult::failed(path, e.to_string()),
            };
            result.replace_unit(unit_result);
        }

        assert_eq!(result.error_count(), 0);
        assert_eq!(result.visible_match_count(), 1);
        let paths: Vec<PathBuf> = result.units().map(|u| u.path.clone()).collect();
        assert!(paths.contains(&src.join("Calc.java")));
    }
}
