#![forbid(unsafe_code)]

//! @acp:module "Autodoc Library"
//! @acp:summary "Javadoc synthesis and documentation defect scanning"
//! @acp:domain cli
//! @acp:layer api
//! @acp:stability stable
//!
//! # Autodoc
//!
//! Generates Javadoc comments from element metadata and naming conventions,
//! and scans Java sources for documentation defects.
//!
//! ## Features
//!
//! - **Comment Model**: Parses `/** */` and `///` comments into free text and tags
//! - **Name-to-Phrase**: `numberOfQuestions` becomes "number of questions"
//! - **Generator**: Fills missing text, `@param`, `@return` and `@throws`
//! - **Scanner**: Classifies missing, invalid and generated-looking docs
//! - **Templates**: Handlebars rules keyed by element name patterns
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use autodoc::{CancellationToken, ConfigSnapshot, DefectScanner, Generator, Indexer, SearchPattern};
//!
//! fn main() -> autodoc::Result<()> {
//!     let config = ConfigSnapshot::default();
//!     let indexer = Indexer::new(&config)?;
//!     let generator = Generator::from_config(Arc::new(config))?;
//!     let mut scanner = DefectScanner::new(SearchPattern::default(), generator);
//!
//!     for path in indexer.find_files(&[PathBuf::from("src")]) {
//!         let unit = indexer.load_unit(&path)?;
//!         let result = scanner.scan_unit(&unit, &CancellationToken::new());
//!         println!("{}: {} matches", path.display(), result.matches.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod config;
pub mod conventions;
pub mod element;
pub mod error;
pub mod generator;
pub mod index;
pub mod javadoc;
pub mod replacements;
pub mod scan;

// Re-exports
pub use config::{ConfigBuilder, ConfigSnapshot, ConfigStore, TemplateKind, TemplateRule, VisibilityFilter};
pub use conventions::{AccessorResolver, BeanConventions, CaseMode, NameScope, PhraseConverter, PhraseOptions};
pub use element::{CompilationUnit, ElementProvider, Member, MemberKind, SourceRange, Visibility};
pub use error::{AutodocError, Result};
pub use generator::{
    apply_edits, plan_edits, unified_diff, Generator, HandlebarsTemplates, NoTemplates, TemplateEngine,
};
pub use index::{Indexer, JavaSourceParser};
pub use javadoc::{CommentMode, JavadocComment, Tag, TagKind};
pub use replacements::{GetSetFromFieldReplacement, GetSetReplacements, Replacement, ReplacementRegistry, ReplacementScope};
pub use scan::{
    CancellationToken, DefectKind, DefectScanner, Finding, Match, ScanStatus, SearchPattern, SearchResult,
    UnitResult,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
