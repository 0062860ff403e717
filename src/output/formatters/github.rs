//! GitHub Actions annotation format

use crate::diagnostic::{Diagnostic, Severity};
use crate::output::OutputFormatter;

/// GitHub Actions formatter
/// Outputs in the format: ::error file=<file>,line=<line>,col=<col>,title=<rule>::<message>
pub struct GitHubFormatter;

impl Default for GitHubFormatter {
    fn default() -> Self {
        Self
    }
}

impl GitHubFormatter {
    pub fn new() -> Self {
        Self
    }
}

/// Escape per the workflow command rules for properties.
fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

fn escape_data(value: &str) -> String {
    value.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

impl OutputFormatter for GitHubFormatter {
    fn format_diagnostics(&self, diagnostics: &[Diagnostic]) -> String {
        diagnostics
            .iter()
            .map(|d| {
                let level = match d.severity {
                    Severity::Error => "error",
                    Severity::Warning => "warning",
                    Severity::Info => "notice",
                };
                format!(
                    "::{level} file={},line={},col={},title={}::{}",
                    escape_property(&d.file),
                    d.line,
                    d.column,
                    escape_property(d.rule.as_deref().unwrap_or("vuestyle")),
                    escape_data(&d.message)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
