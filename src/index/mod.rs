//! @acp:module "Indexer"
//! @acp:summary "Source discovery and parallel compilation unit loading"
//! @acp:domain cli
//! @acp:layer service
//!
//! Walks the configured roots for Java sources and parses them in parallel
//! through an [`ElementProvider`]. A unit that fails to load is returned as
//! an error entry; it never stops the remaining units.

pub mod java;

pub use java::JavaSourceParser;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glob::{MatchOptions, Pattern};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::config::ConfigSnapshot;
use crate::element::{CompilationUnit, ElementProvider};
use crate::error::{AutodocError, Result};

/// @acp:summary "Finds and loads compilation units"
#[derive(Clone)]
pub struct Indexer {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
    provider: Arc<dyn ElementProvider>,
}

impl Indexer {
    /// Indexer with the include/exclude globs of `config` and the Java parser
    pub fn new(config: &ConfigSnapshot) -> Result<Self> {
        Ok(Self {
            include: compile_patterns(config.include())?,
            exclude: compile_patterns(config.exclude())?,
            provider: Arc::new(JavaSourceParser::new()),
        })
    }

    pub fn with_provider(mut self, provider: Arc<dyn ElementProvider>) -> Self {
        self.provider = provider;
        self
    }

    /// @acp:summary "Collect matching source files below every root"
    ///
    /// A root that is itself a file is taken as-is. Results are sorted and
    /// deduplicated so runs are deterministic.
    pub fn find_files(&self, roots: &[PathBuf]) -> Vec<PathBuf> {
        let match_opts = MatchOptions {
            case_sensitive: true,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };

        let mut files = Vec::new();
        for root in roots {
            if root.is_file() {
                files.push(root.clone());
                continue;
            }
            for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
                if !entry.file_type().is_file() {
                    continue;
                }
                // Patterns match the path relative to the root
                let relative = entry
                    .path()
                    .strip_prefix(root)
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_else(|_| entry.path().to_string_lossy().to_string());

                let included = self.include.is_empty()
                    || self.include.iter().any(|p| p.matches_with(&relative, match_opts));
                let excluded = self.exclude.iter().any(|p| p.matches_with(&relative, match_opts));
                if included && !excluded {
                    files.push(entry.into_path());
                }
            }
        }
        files.sort();
        files.dedup();
        tracing::debug!(count = files.len(), "discovered source files");
        files
    }

    /// @acp:summary "Parse units in parallel, preserving input order"
    pub fn load_units(&self, files: &[PathBuf]) -> Vec<(PathBuf, Result<CompilationUnit>)> {
        files
            .par_iter()
            .map(|path| (path.clone(), self.load_unit(path)))
            .collect()
    }

    pub fn load_unit(&self, path: &Path) -> Result<CompilationUnit> {
        let result = self.provider.load_unit(path);
        if let Err(e) = &result {
            tracing::warn!(path = %path.display(), error = %e, "failed to load unit");
        }
        result
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| AutodocError::InvalidConfig(format!("bad glob '{}': {}", p, e)))
        })
        .collect()
}
