//! @acp:module "Commands"
//! @acp:summary "CLI command implementations"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Each command is in its own submodule and returns `anyhow::Result`.

pub mod check;
pub mod generate;
pub mod init;
pub mod phrase;

pub use check::{execute_check, CheckOptions};
pub use generate::{execute_generate, GenerateOptions};
pub use init::{execute_init, InitOptions};
pub use phrase::{execute_phrase, PhraseCommandOptions};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::ConfigSnapshot;

/// Resolve the configuration for the first root, or the working directory
pub(crate) fn load_config(roots: &[PathBuf], explicit: Option<&Path>) -> Result<ConfigSnapshot> {
    let project_root = roots
        .first()
        .filter(|p| p.is_dir())
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));
    let (config, source) = ConfigSnapshot::load_for(&project_root, explicit)
        .with_context(|| format!("loading configuration for {}", project_root.display()))?;
    match source {
        Some(path) => tracing::info!(path = %path.display(), "using configuration"),
        None => tracing::info!("using default configuration"),
    }
    Ok(config)
}

/// Default to the working directory when no paths are given
pub(crate) fn roots_or_cwd(paths: &[PathBuf]) -> Vec<PathBuf> {
    if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths.to_vec()
    }
}

/// 1-based line and column of a byte offset
pub(crate) fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let col = before.rfind('\n').map(|i| before.len() - i).unwrap_or(before.len() + 1);
    (line, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col() {
        let source = "class A {\n    int x;\n}";
        assert_eq!(line_col(source, 0), (1, 1));
        assert_eq!(line_col(source, 14), (2, 5));
    }

    #[test]
    fn test_roots_default() {
        assert_eq!(roots_or_cwd(&[]), vec![PathBuf::from(".")]);
    }
}
