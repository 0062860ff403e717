//! Style linting through external tools.
//!
//! The pipeline only knows the [`StyleLinter`] trait: text in, diagnostics with
//! fragment-relative line numbers out. [`ExternalToolLinter`] implements it by
//! piping each normalized block into a command such as `stylelint`.
//!
//! # Configuration
//!
//! ```toml
//! [linter]
//! tool = "stylelint"    # built-in or user-defined tool id
//! format = "scss"       # or "auto" to follow the block's lang attribute
//! on-error = "warn"     # or "skip" / "fail"
//! timeout = 30000       # ms per tool run
//!
//! [linter.tools.my-linter]
//! command = ["my-linter", "--syntax={format}", "--name={filename}"]
//! stdin = true
//! ```
//!
//! # Built-in Tools
//!
//! - `stylelint` - SCSS via `postcss-scss`
//! - `stylelint:sass`, `stylelint:less`, `stylelint:css`
//!
//! See [`registry`] for the exact commands.

pub mod config;
pub mod executor;
pub mod external;
pub mod registry;

pub use config::{LinterConfig, OnError, ToolDefinition};
pub use executor::{ExecutorError, ToolExecutor, ToolOutput};
pub use external::ExternalToolLinter;
pub use registry::ToolRegistry;

use crate::diagnostic::Diagnostic;
use thiserror::Error;

/// One normalized block handed to a linter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LintRequest<'a> {
    /// Normalized block text.
    pub text: &'a str,
    /// Path of the component file the block came from.
    pub filename: &'a str,
    /// Style syntax of the block, e.g. `scss`.
    pub format: &'a str,
}

/// Error raised when a linter could not lint a block.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LinterError {
    #[error("Unknown tool '{0}'. Run `vuestyle tools` to list available tools")]
    UnknownTool(String),
    #[error(transparent)]
    Executor(#[from] ExecutorError),
    #[error("{0}")]
    Other(String),
}

/// A style-language linter.
///
/// Implementations return diagnostics whose `line` is 1-based and relative to
/// `request.text`. The caller remaps them to the component file.
pub trait StyleLinter: Send + Sync {
    fn lint(&self, request: &LintRequest<'_>) -> Result<Vec<Diagnostic>, LinterError>;
}

impl<L: StyleLinter + ?Sized> StyleLinter for &L {
    fn lint(&self, request: &LintRequest<'_>) -> Result<Vec<Diagnostic>, LinterError> {
        (**self).lint(request)
    }
}

impl<L: StyleLinter + ?Sized> StyleLinter for Box<L> {
    fn lint(&self, request: &LintRequest<'_>) -> Result<Vec<Diagnostic>, LinterError> {
        (**self).lint(request)
    }
}
