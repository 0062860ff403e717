//! JSON Lines output formatter (one JSON object per line)

use super::json::diagnostic_to_json;
use crate::diagnostic::Diagnostic;
use crate::output::OutputFormatter;

/// JSON Lines formatter - one JSON object per line
pub struct JsonLinesFormatter;

impl Default for JsonLinesFormatter {
    fn default() -> Self {
        Self
    }
}

impl JsonLinesFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl OutputFormatter for JsonLinesFormatter {
    fn format_diagnostics(&self, diagnostics: &[Diagnostic]) -> String {
        diagnostics
            .iter()
            .filter_map(|d| serde_json::to_string(&diagnostic_to_json(d)).ok())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::formatters::test_support::sample;
    use serde_json::Value;

    #[test]
    fn test_one_object_per_line() {
        let output = JsonLinesFormatter::new().format_diagnostics(&sample());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["file"], "src/Button.vue");
        assert_eq!(second["line"], 12);
    }
}
