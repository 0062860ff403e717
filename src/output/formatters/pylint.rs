//! Pylint-compatible output formatter

use crate::diagnostic::{Diagnostic, Severity};
use crate::output::OutputFormatter;

/// Pylint-compatible formatter: file:line:column: [CODE] message
pub struct PylintFormatter;

impl Default for PylintFormatter {
    fn default() -> Self {
        Self
    }
}

impl PylintFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputFormatter for PylintFormatter {
    fn format_diagnostics(&self, diagnostics: &[Diagnostic]) -> String {
        diagnostics
            .iter()
            .map(|d| {
                // Pylint message categories: E error, W warning, C convention
                let category = match d.severity {
                    Severity::Error => 'E',
                    Severity::Warning => 'W',
                    Severity::Info => 'C',
                };
                let code = match &d.rule {
                    Some(rule) => format!("{category}-{rule}"),
                    None => category.to_string(),
                };
                format!("{}:{}:{}: [{code}] {}", d.file, d.line, d.column, d.message)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::formatters::test_support::sample;

    #[test]
    fn test_pylint_format() {
        let output = PylintFormatter::new().format_diagnostics(&sample());
        assert_eq!(
            output,
            "src/App.vue:6:3: [E-stylelint] Expected a trailing semicolon\n\
             src/Button.vue:12:1: [W] Unexpected named color \"red\""
        );
    }
}
