//! @acp:module "Generate Command"
//! @acp:summary "Generate or complete doc comments and preview or write the result"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Without `--apply` a unified diff is printed and nothing is written.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use console::style;
use rayon::prelude::*;

use super::{load_config, roots_or_cwd};
use crate::generator::{apply_edits, plan_edits, unified_diff, Generator};
use crate::index::Indexer;
use crate::javadoc::CommentMode;

/// Options for the generate command
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Files or directories to process
    pub paths: Vec<PathBuf>,
    /// Explicit configuration file
    pub config: Option<PathBuf>,
    /// Write changes instead of printing a diff
    pub apply: bool,
    /// Override the configured comment mode
    pub mode: Option<CommentMode>,
}

/// Outcome for one unit
enum UnitOutcome {
    Unchanged,
    Changed { path: PathBuf, before: String, after: String, skipped: usize },
    Failed { path: PathBuf, message: String },
}

/// Execute the generate command
pub fn execute_generate(options: GenerateOptions) -> Result<()> {
    let roots = roots_or_cwd(&options.paths);
    let mut config = load_config(&roots, options.config.as_deref())?;
    if let Some(mode) = options.mode {
        config = config.to_builder().mode(mode).build()?;
    }

    let indexer = Indexer::new(&config)?;
    let generator = Generator::from_config(Arc::new(config))?;
    let files = indexer.find_files(&roots);
    tracing::info!(files = files.len(), mode = %generator.config().mode(), "generating");

    let outcomes: Vec<UnitOutcome> = files
        .par_iter()
        .map(|path| {
            let unit = match indexer.load_unit(path) {
                Ok(unit) => unit,
                Err(e) => {
                    return UnitOutcome::Failed {
                        path: path.clone(),
                        message: e.to_string(),
                    }
                }
            };
            let plan = plan_edits(&unit, &generator);
            for (member, error) in &plan.failures {
                tracing::warn!(path = %path.display(), member = %member, error = %error, "member skipped");
            }
            if plan.is_empty() {
                return UnitOutcome::Unchanged;
            }
            match apply_edits(&unit.source, &plan.edits) {
                Ok(after) => UnitOutcome::Changed {
                    path: path.clone(),
                    before: unit.source,
                    after,
                    skipped: plan.failures.len(),
                },
                Err(e) => UnitOutcome::Failed {
                    path: path.clone(),
                    message: e.to_string(),
                },
            }
        })
        .collect();

    let mut changed = 0;
    let mut failed = 0;
    for outcome in outcomes {
        match outcome {
            UnitOutcome::Unchanged => {}
            UnitOutcome::Changed { path, before, after, skipped } => {
                changed += 1;
                if options.apply {
                    std::fs::write(&path, &after)?;
                    println!("{} Updated {}", style("✓").green(), path.display());
                } else {
                    print!("{}", unified_diff(&path, &before, &after));
                }
                if skipped > 0 {
                    println!(
                        "  {} {} member(s) skipped in {}",
                        style("⚠").yellow(),
                        skipped,
                        path.display()
                    );
                }
            }
            UnitOutcome::Failed { path, message } => {
                failed += 1;
                eprintln!("{} {}: {}", style("✗").red(), path.display(), message);
            }
        }
    }

    let verb = if options.apply { "updated" } else { "would change" };
    println!(
        "{} {} file(s) {}, {} failed",
        style("→").cyan(),
        changed,
        verb,
        failed
    );
    Ok(())
}
