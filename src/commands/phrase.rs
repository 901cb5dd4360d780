//! @acp:module "Phrase Command"
//! @acp:summary "Print the phrase derived from one identifier"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::Result;

use super::load_config;
use crate::conventions::{CaseMode, NameScope, PhraseConverter, PhraseOptions};

/// Options for the phrase command
#[derive(Debug, Clone)]
pub struct PhraseCommandOptions {
    pub identifier: String,
    pub scope: NameScope,
    pub split: bool,
    pub replace: bool,
    pub case: CaseMode,
    /// Explicit configuration file providing the replacement registry
    pub config: Option<PathBuf>,
}

/// Execute the phrase command
pub fn execute_phrase(options: PhraseCommandOptions) -> Result<String> {
    let config = load_config(&[], options.config.as_deref())?;
    let converter = PhraseConverter::new(config.replacements());
    let phrase = converter.to_phrase(
        &options.identifier,
        options.scope,
        PhraseOptions {
            split: options.split,
            replace: options.replace,
            case: options.case,
        },
    );
    println!("{}", phrase);
    Ok(phrase)
}
