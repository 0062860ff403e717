//! Default text output formatter with colors

use crate::diagnostic::{Diagnostic, Severity, count_by_severity};
use crate::output::OutputFormatter;
use colored::*;

/// Default human-readable formatter with colors
pub struct TextFormatter {
    use_colors: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self { use_colors: true }
    }
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_colors() -> Self {
        Self { use_colors: false }
    }

    fn severity_label(&self, severity: Severity) -> String {
        let label = severity.as_str();
        if !self.use_colors {
            return label.to_string();
        }
        match severity {
            Severity::Error => label.red().bold().to_string(),
            Severity::Warning => label.yellow().bold().to_string(),
            Severity::Info => label.blue().to_string(),
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format_diagnostics(&self, diagnostics: &[Diagnostic]) -> String {
        let mut output = String::new();

        for diagnostic in diagnostics {
            // Format: file:line:column: severity message [rule]
            let location = format!("{}:{}:{}", diagnostic.file, diagnostic.line, diagnostic.column);
            let location = if self.use_colors {
                location.blue().underline().to_string()
            } else {
                location
            };

            let rule = match &diagnostic.rule {
                Some(rule) if self.use_colors => format!(" [{rule}]").dimmed().to_string(),
                Some(rule) => format!(" [{rule}]"),
                None => String::new(),
            };

            output.push_str(&format!(
                "{location}: {} {}{rule}\n",
                self.severity_label(diagnostic.severity),
                diagnostic.message
            ));
        }

        if output.ends_with('\n') {
            output.pop();
        }

        output
    }

    fn format_summary(&self, files_processed: usize, diagnostics: &[Diagnostic], duration_ms: u64) -> Option<String> {
        let file_word = if files_processed == 1 { "file" } else { "files" };

        if diagnostics.is_empty() {
            let message = format!("Success: No issues found in {files_processed} {file_word} ({duration_ms}ms)");
            return Some(if self.use_colors {
                message.green().bold().to_string()
            } else {
                message
            });
        }

        let (errors, warnings, infos) = count_by_severity(diagnostics);
        let mut files: Vec<&str> = diagnostics.iter().map(|d| d.file.as_str()).collect();
        files.dedup();
        let affected = files.len();
        let issue_word = if diagnostics.len() == 1 { "issue" } else { "issues" };

        let message = format!(
            "Found {} {issue_word} in {affected}/{files_processed} {file_word} ({errors} errors, {warnings} warnings, {infos} info) ({duration_ms}ms)",
            diagnostics.len()
        );
        Some(if self.use_colors {
            message.yellow().bold().to_string()
        } else {
            message
        })
    }
}
