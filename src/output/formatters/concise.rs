//! Concise output formatter for easy parsing by editors

use crate::diagnostic::Diagnostic;
use crate::output::OutputFormatter;

/// Concise formatter: file:line:col: [rule] message
pub struct ConciseFormatter;

impl Default for ConciseFormatter {
    fn default() -> Self {
        Self
    }
}

impl ConciseFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputFormatter for ConciseFormatter {
    fn format_diagnostics(&self, diagnostics: &[Diagnostic]) -> String {
        diagnostics
            .iter()
            .map(|d| {
                format!(
                    "{}:{}:{}: [{}] {}",
                    d.file,
                    d.line,
                    d.column,
                    d.rule.as_deref().unwrap_or(d.severity.as_str()),
                    d.message
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
