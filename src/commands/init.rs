//! @acp:module "Init Command"
//! @acp:summary "Write a default project configuration"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Implements `autodoc init`.

use std::path::PathBuf;

use anyhow::{bail, Result};
use console::style;

use crate::config::{workspace_config_path, ConfigSnapshot, PROJECT_CONFIG_FILE};

/// Options for the init command
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Overwrite an existing configuration
    pub force: bool,
    /// Write the workspace configuration instead of the project one
    pub workspace: bool,
    /// Project directory (defaults to the working directory)
    pub root: Option<PathBuf>,
}

/// Execute the init command, returning the written path
pub fn execute_init(options: InitOptions) -> Result<PathBuf> {
    let config_path = if options.workspace {
        match workspace_config_path() {
            Some(path) => path,
            None => bail!("no user configuration directory on this platform"),
        }
    } else {
        options
            .root
            .unwrap_or_else(|| PathBuf::from("."))
            .join(PROJECT_CONFIG_FILE)
    };

    if config_path.exists() && !options.force {
        bail!(
            "{} already exists, use --force to overwrite",
            config_path.display()
        );
    }
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    ConfigSnapshot::default().save(&config_path)?;
    println!("{} Created {}", style("✓").green(), config_path.display());
    Ok(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_config() {
        let temp = TempDir::new().unwrap();
        let options = InitOptions {
            root: Some(temp.path().to_path_buf()),
            ..Default::default()
        };
        let path = execute_init(options.clone()).unwrap();
        assert_eq!(ConfigSnapshot::load(&path).unwrap(), ConfigSnapshot::default());

        assert!(execute_init(options.clone()).is_err());
        assert!(execute_init(InitOptions { force: true, ..options }).is_ok());
    }
}
