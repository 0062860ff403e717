//! Diagnostics reported against embedded style blocks.
//!
//! This module defines the diagnostic type reported by style linters and the
//! line remapping that moves a diagnostic from fragment coordinates back to the
//! component file it came from.

use serde::Serialize;
use std::fmt;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Infer severity from a free-form tool message.
    pub fn infer(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("error") || lower.starts_with('e') && lower.chars().nth(1).is_some_and(|c| c.is_ascii_digit())
        {
            Severity::Error
        } else if lower.contains("warning") || lower.contains("warn") {
            Severity::Warning
        } else {
            Severity::Info
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single issue reported by a style linter.
///
/// `line` is 1-based. Until [`Diagnostic::remap`] is applied it is relative to
/// the normalized fragment the linter saw; afterwards it is relative to `file`.
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct Diagnostic {
    /// Path of the component file the diagnostic belongs to.
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub severity: Severity,
    pub message: String,
    /// Rule or tool that produced the diagnostic, if the linter reported one.
    pub rule: Option<String>,
}

impl Diagnostic {
    pub fn new(line: usize, column: usize, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            file: String::new(),
            line,
            column,
            severity,
            message: message.into(),
            rule: None,
        }
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    /// Shift the diagnostic by the line offset of the block it was reported in.
    pub fn remap(&mut self, line_offset: usize) {
        self.line += line_offset;
    }
}

/// Remap every diagnostic of one block in place.
pub fn remap_all(diagnostics: &mut [Diagnostic], line_offset: usize) {
    for diagnostic in diagnostics {
        diagnostic.remap(line_offset);
    }
}

/// Count diagnostics per severity as `(errors, warnings, infos)`.
pub fn count_by_severity(diagnostics: &[Diagnostic]) -> (usize, usize, usize) {
    diagnostics
        .iter()
        .fold((0, 0, 0), |(errors, warnings, infos), d| match d.severity {
            Severity::Error => (errors + 1, warnings, infos),
            Severity::Warning => (errors, warnings + 1, infos),
            Severity::Info => (errors, warnings, infos + 1),
        })
}
