//! JSON output formatter

use crate::diagnostic::Diagnostic;
use crate::output::OutputFormatter;
use serde_json::{Value, json};

/// JSON formatter for machine-readable output
#[derive(Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

pub(crate) fn diagnostic_to_json(d: &Diagnostic) -> Value {
    json!({
        "file": d.file,
        "line": d.line,
        "column": d.column,
        "rule": d.rule,
        "message": d.message,
        "severity": d.severity,
    })
}

impl OutputFormatter for JsonFormatter {
    fn format_diagnostics(&self, diagnostics: &[Diagnostic]) -> String {
        let values: Vec<Value> = diagnostics.iter().map(diagnostic_to_json).collect();
        serde_json::to_string_pretty(&values).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::formatters::test_support::sample;

    #[test]
    fn test_format_empty() {
        assert_eq!(JsonFormatter::new().format_diagnostics(&[]), "[]");
    }

    #[test]
    fn test_format_diagnostics() {
        let output = JsonFormatter::new().format_diagnostics(&sample());
        let parsed: Value = serde_json::from_str(&output).unwrap();
        let array = parsed.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["file"], "src/App.vue");
        assert_eq!(array[0]["line"], 6);
        assert_eq!(array[0]["column"], 3);
        assert_eq!(array[0]["severity"], "error");
        assert_eq!(array[0]["rule"], "stylelint");
        assert_eq!(array[1]["rule"], Value::Null);
        assert_eq!(array[1]["severity"], "warning");
    }
}
