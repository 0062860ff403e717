//! Report formats for diagnostics, selected with `--output-format`.

use crate::diagnostic::Diagnostic;
use std::io::{self, Write};
use std::str::FromStr;

pub mod formatters;

pub use formatters::*;

pub trait OutputFormatter {
    /// Format diagnostics of one or more files. Each diagnostic carries its file.
    fn format_diagnostics(&self, diagnostics: &[Diagnostic]) -> String;

    /// Format a summary of results across multiple files
    fn format_summary(&self, _files_processed: usize, _diagnostics: &[Diagnostic], _duration_ms: u64) -> Option<String> {
        None
    }
}

/// Available output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Default human-readable format with colors
    Text,
    /// Concise format: file:line:col: [rule] message
    Concise,
    /// Grouped format: diagnostics grouped by file
    Grouped,
    /// A single JSON array
    Json,
    /// JSON Lines format (one JSON object per line)
    JsonLines,
    /// GitHub Actions annotation format
    GitHub,
    /// Pylint-compatible format: file:line:column: [CODE] message
    Pylint,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "full" => Ok(OutputFormat::Text),
            "concise" => Ok(OutputFormat::Concise),
            "grouped" => Ok(OutputFormat::Grouped),
            "json" => Ok(OutputFormat::Json),
            "json-lines" | "jsonlines" => Ok(OutputFormat::JsonLines),
            "github" => Ok(OutputFormat::GitHub),
            "pylint" => Ok(OutputFormat::Pylint),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

impl OutputFormat {
    pub fn create_formatter(&self) -> Box<dyn OutputFormatter> {
        match self {
            OutputFormat::Text => Box::new(TextFormatter::new()),
            OutputFormat::Concise => Box::new(ConciseFormatter::new()),
            OutputFormat::Grouped => Box::new(GroupedFormatter::new()),
            OutputFormat::Json => Box::new(JsonFormatter::new()),
            OutputFormat::JsonLines => Box::new(JsonLinesFormatter::new()),
            OutputFormat::GitHub => Box::new(GitHubFormatter::new()),
            OutputFormat::Pylint => Box::new(PylintFormatter::new()),
        }
    }

    /// Machine-readable formats print nothing but diagnostics.
    pub fn is_machine_readable(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::JsonLines | OutputFormat::GitHub)
    }
}

/// Routes report text to stdout, or to stderr with `--stderr`.
pub struct OutputWriter {
    use_stderr: bool,
    quiet: bool,
    silent: bool,
}

impl OutputWriter {
    pub fn new(use_stderr: bool, quiet: bool, silent: bool) -> Self {
        Self {
            use_stderr,
            quiet,
            silent,
        }
    }

    fn sink(&self) -> Box<dyn Write> {
        if self.use_stderr {
            Box::new(io::stderr().lock())
        } else {
            Box::new(io::stdout().lock())
        }
    }

    /// Write diagnostics. Suppressed only by `--silent`.
    pub fn writeln(&self, content: &str) -> io::Result<()> {
        if self.silent {
            return Ok(());
        }
        let mut sink = self.sink();
        writeln!(sink, "{content}")?;
        sink.flush()
    }

    /// Write a status line such as the run summary. Suppressed by `--quiet`.
    pub fn write_status(&self, content: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.writeln(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("jsonlines".parse::<OutputFormat>(), Ok(OutputFormat::JsonLines));
        assert_eq!("github".parse::<OutputFormat>(), Ok(OutputFormat::GitHub));
        assert!("sarif".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_machine_readable() {
        assert!(OutputFormat::Json.is_machine_readable());
        assert!(!OutputFormat::Text.is_machine_readable());
    }

    #[test]
    fn test_silent_writer_writes_nothing() {
        let writer = OutputWriter::new(false, false, true);
        assert!(writer.write_status("x").is_ok());
        assert!(writer.writeln("x").is_ok());
    }
}
