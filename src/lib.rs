//! Lint style blocks embedded in component files.
//!
//! A component file is parsed, every `<style lang="scss">` block (or whatever
//! [`extractor::BlockSelector`] selects) is cut out together with its line
//! offset, stripped of the indentation it inherits from the markup, handed to a
//! [`style_tools::StyleLinter`], and the diagnostics that come back are moved to
//! the lines they belong to in the original file.
//!
//! ```no_run
//! use vuestyle_lib::extractor::BlockSelector;
//! use vuestyle_lib::pipeline::{LintOptions, lint_document};
//! use vuestyle_lib::style_tools::{ExternalToolLinter, LinterConfig};
//!
//! let linter = ExternalToolLinter::from_config(&LinterConfig::default())?;
//! let source = std::fs::read("src/App.vue")?;
//! let result = lint_document(&source, "src/App.vue", &BlockSelector::default(), &linter, &LintOptions::default())?;
//! for d in &result.diagnostics {
//!     println!("{}:{}:{}: {}", d.file, d.line, d.column, d.message);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod diagnostic;
pub mod exit_codes;
pub mod extractor;
pub mod file_processor;
pub mod init;
pub mod normalizer;
pub mod output;
pub mod parallel;
pub mod pipeline;
pub mod style_tools;

pub use crate::diagnostic::{Diagnostic, Severity};
pub use crate::extractor::{BlockSelector, EmbeddedBlock, ExtractError, extract_blocks};
pub use crate::file_processor::{FileError, ScanResult, scan};
pub use crate::normalizer::{NormalizedFragment, normalize};
pub use crate::pipeline::{LintOptions, lint_document};
pub use crate::style_tools::{LintRequest, LinterError, StyleLinter};
