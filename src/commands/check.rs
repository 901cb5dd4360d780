//! @acp:module "Check Command"
//! @acp:summary "Scan Java sources for documentation defects"
//! @acp:domain cli
//! @acp:layer handler

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use console::style;
use rayon::prelude::*;

use super::{line_col, load_config, roots_or_cwd};
use crate::generator::Generator;
use crate::index::Indexer;
use crate::scan::{
    CancellationToken, DefectKind, DefectScanner, ScanStatus, SearchPattern, SearchResult, UnitResult,
};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Files or directories to scan
    pub paths: Vec<PathBuf>,
    /// Explicit configuration file
    pub config: Option<PathBuf>,
    /// Search pattern file (JSON)
    pub pattern: Option<PathBuf>,
    /// Defect kinds to hide from the report
    pub disable: Vec<DefectKind>,
    /// Print the result as JSON
    pub json: bool,
}

/// Execute the check command, returning the number of visible matches
pub fn execute_check(options: CheckOptions) -> Result<usize> {
    let roots = roots_or_cwd(&options.paths);
    let config = load_config(&roots, options.config.as_deref())?;
    let pattern = match &options.pattern {
        Some(path) => SearchPattern::load(path)
            .with_context(|| format!("loading search pattern {}", path.display()))?,
        None => SearchPattern::default(),
    };

    let indexer = Indexer::new(&config)?;
    let generator = Generator::from_config(Arc::new(config))?;
    let scanner = DefectScanner::new(pattern, generator);
    let cancel = CancellationToken::new();

    let files = indexer.find_files(&roots);
    tracing::info!(files = files.len(), "scanning");

    let scanned: Vec<(UnitResult, Option<String>)> = files
        .par_iter()
        .map_with(scanner, |scanner, path| match indexer.load_unit(path) {
            Ok(unit) => (scanner.scan_unit(&unit, &cancel), Some(unit.source)),
            Err(e) => (UnitResult::failed(path.clone(), e.to_string()), None),
        })
        .collect();

    let mut result = SearchResult::new();
    for kind in &options.disable {
        result.set_filter_enabled(*kind, true);
    }
    let mut sources = HashMap::new();
    for (unit, source) in scanned {
        if let Some(source) = source {
            sources.insert(unit.path.clone(), source);
        }
        result.replace_unit(unit);
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&result, &sources);
    }

    Ok(result.visible_match_count())
}

fn print_report(result: &SearchResult, sources: &HashMap<PathBuf, String>) {
    for unit in result.units() {
        if let ScanStatus::Error(message) = &unit.status {
            println!("{} {}: {}", style("✗").red(), unit.path.display(), message);
        }
        for error in &unit.errors {
            println!(
                "{} {}: {}: {}",
                style("⚠").yellow(),
                unit.path.display(),
                error.member,
                error.message
            );
        }

        let visible: Vec<_> = unit.matches.iter().filter(|m| !m.is_filtered()).collect();
        if visible.is_empty() {
            continue;
        }

        println!("{}", style(unit.path.display()).bold());
        let source = sources.get(&unit.path).map(String::as_str).unwrap_or("");
        for m in visible {
            let (line, col) = line_col(source, m.range.offset);
            for finding in m.findings().iter().filter(|f| !f.is_filtered()) {
                println!(
                    "  {}:{} {} {} {}",
                    line,
                    col,
                    style(&m.element).cyan(),
                    style(format!("[{}]", finding.kind)).dim(),
                    finding.message
                );
            }
        }
    }

    println!();
    let hidden = result.filtered_finding_count();
    let summary = format!(
        "{} matches, {} findings ({} hidden), {} errors",
        result.visible_match_count(),
        result.finding_count() - hidden,
        hidden,
        result.error_count()
    );
    if result.visible_match_count() == 0 && result.error_count() == 0 {
        println!("{} {}", style("✓").green(), summary);
    } else {
        println!("{} {}", style("✗").red(), summary);
    }
}
