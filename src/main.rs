#![forbid(unsafe_code)]
//! Autodoc Command Line Interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use autodoc::commands::{
    execute_check, execute_generate, execute_init, execute_phrase, CheckOptions, GenerateOptions,
    InitOptions, PhraseCommandOptions,
};
use autodoc::conventions::{CaseMode, NameScope};
use autodoc::javadoc::CommentMode;
use autodoc::scan::DefectKind;

#[derive(Parser)]
#[command(name = "autodoc")]
#[command(about = "Javadoc synthesis and documentation defect scanning")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (defaults to .autodoc.json, then the workspace config)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan sources for documentation defects
    Check {
        /// Files or directories to scan
        paths: Vec<PathBuf>,

        /// Search pattern file (JSON)
        #[arg(short, long)]
        pattern: Option<PathBuf>,

        /// Hide findings of this kind (can specify multiple)
        #[arg(long)]
        disable: Vec<DefectKind>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate or complete doc comments
    Generate {
        /// Files or directories to process
        paths: Vec<PathBuf>,

        /// Write the changes (default: print a diff)
        #[arg(long)]
        apply: bool,

        /// How generated text combines with existing comments
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
    },

    /// Convert an identifier to a phrase
    Phrase {
        /// Identifier such as numberOfQuestions
        identifier: String,

        /// What the identifier names
        #[arg(long, value_enum, default_value_t = ScopeArg::Field)]
        scope: ScopeArg,

        /// Keep the identifier as one word
        #[arg(long)]
        no_split: bool,

        /// Skip the replacement registry
        #[arg(long)]
        no_replace: bool,

        /// First letter case
        #[arg(long, value_enum)]
        case: Option<CaseArg>,
    },

    /// Write a default configuration
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,

        /// Write the workspace config instead of .autodoc.json
        #[arg(long)]
        workspace: bool,
    },
}

/// Comment mode
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Keep,
    Complete,
    Replace,
}

/// Name scope
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default)]
enum ScopeArg {
    Type,
    #[default]
    Field,
    Method,
    Parameter,
    Return,
    Exception,
}

/// First letter case
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum CaseArg {
    Lower,
    Upper,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "autodoc=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("AUTODOC_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Check { paths, pattern, disable, json } => {
            let options = CheckOptions {
                paths,
                config: cli.config,
                pattern,
                disable,
                json,
            };
            let visible = execute_check(options)?;
            if visible > 0 {
                std::process::exit(1);
            }
        }

        Commands::Generate { paths, apply, mode } => {
            let mode = mode.map(|m| match m {
                ModeArg::Keep => CommentMode::Keep,
                ModeArg::Complete => CommentMode::Complete,
                ModeArg::Replace => CommentMode::Replace,
            });
            let options = GenerateOptions {
                paths,
                config: cli.config,
                apply,
                mode,
            };
            execute_generate(options)?;
        }

        Commands::Phrase { identifier, scope, no_split, no_replace, case } => {
            let scope = match scope {
                ScopeArg::Type => NameScope::Type,
                ScopeArg::Field => NameScope::Field,
                ScopeArg::Method => NameScope::Method,
                ScopeArg::Parameter => NameScope::Parameter,
                ScopeArg::Return => NameScope::Return,
                ScopeArg::Exception => NameScope::Exception,
            };
            let case = match case {
                Some(CaseArg::Lower) => CaseMode::FirstLower,
                Some(CaseArg::Upper) => CaseMode::FirstUpper,
                None => CaseMode::None,
            };
            let options = PhraseCommandOptions {
                identifier,
                scope,
                split: !no_split,
                replace: !no_replace,
                case,
                config: cli.config,
            };
            execute_phrase(options)?;
        }

        Commands::Init { force, workspace } => {
            let options = InitOptions {
                force,
                workspace,
                root: None,
            };
            if let Err(e) = execute_init(options) {
                eprintln!("{} {}", style("✗").red(), e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
