//! Grouped output formatter that groups diagnostics by file

use crate::diagnostic::Diagnostic;
use crate::output::OutputFormatter;

/// Grouped formatter: one header per file, diagnostics indented below it
pub struct GroupedFormatter;

impl Default for GroupedFormatter {
    fn default() -> Self {
        Self
    }
}

impl GroupedFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputFormatter for GroupedFormatter {
    fn format_diagnostics(&self, diagnostics: &[Diagnostic]) -> String {
        let mut output = String::new();
        let mut current_file: Option<&str> = None;

        // Diagnostics arrive grouped by file already
        for d in diagnostics {
            if current_file != Some(d.file.as_str()) {
                output.push_str(&format!("{}:\n", d.file));
                current_file = Some(&d.file);
            }
            output.push_str(&format!("  {}:{} {} {}", d.line, d.column, d.severity, d.message));
            if let Some(rule) = &d.rule {
                output.push_str(&format!(" ({rule})"));
            }
            output.push('\n');
        }

        if output.ends_with('\n') {
            output.pop();
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Severity;
    use crate::output::formatters::test_support::sample;

    #[test]
    fn test_grouped_format() {
        let mut diagnostics = sample();
        diagnostics.insert(
            1,
            Diagnostic::new(7, 1, Severity::Info, "Note").with_file("src/App.vue"),
        );
        let output = GroupedFormatter::new().format_diagnostics(&diagnostics);
        assert_eq!(
            output,
            "src/App.vue:\n  6:3 error Expected a trailing semicolon (stylelint)\n  7:1 info Note\n\
             src/Button.vue:\n  12:1 warning Unexpected named color \"red\""
        );
    }

    #[test]
    fn test_grouped_empty() {
        assert_eq!(GroupedFormatter::new().format_diagnostics(&[]), "");
    }
}
