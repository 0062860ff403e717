//! Per-file processing and the run-wide scan.

use crate::diagnostic::Diagnostic;
use crate::extractor::{BlockSelector, ExtractError};
use crate::parallel::{FileParallelProcessor, ParallelConfig};
use crate::pipeline::{DocumentError, DocumentResult, LintOptions, lint_document};
use crate::style_tools::{LinterError, StyleLinter};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use super::discovery::{to_display_path, to_full_path};

/// Why a file produced no diagnostics.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Extract {
        path: String,
        #[source]
        source: ExtractError,
    },
    #[error("{path}:{line}: linter failed: {source}")]
    Linter {
        path: String,
        line: usize,
        #[source]
        source: LinterError,
    },
}

impl FileError {
    pub fn path(&self) -> &str {
        match self {
            FileError::Read { path, .. } | FileError::Extract { path, .. } | FileError::Linter { path, .. } => path,
        }
    }

    /// Linter failures under `on-error = "fail"` fail the whole run.
    pub fn is_tool_error(&self) -> bool {
        matches!(self, FileError::Linter { .. })
    }
}

/// Everything one run produced.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Grouped by file in discovery order, then by block in document order.
    pub diagnostics: Vec<Diagnostic>,
    pub files_processed: usize,
    pub blocks_linted: usize,
    /// Blocks left unlinted after a linter failure under `on-error = "warn"` or `"skip"`.
    pub blocks_skipped: usize,
    pub errors: Vec<FileError>,
}

impl ScanResult {
    pub fn has_tool_errors(&self) -> bool {
        self.errors.iter().any(FileError::is_tool_error)
    }

    fn record(&mut self, outcome: Result<DocumentResult, FileError>) {
        match outcome {
            Ok(mut result) => {
                self.files_processed += 1;
                self.blocks_linted += result.blocks_linted;
                self.blocks_skipped += result.blocks_skipped;
                self.diagnostics.append(&mut result.diagnostics);
            }
            Err(e) => {
                log::error!("{e}");
                self.errors.push(e);
            }
        }
    }
}

/// Settings shared by every file of a run.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub selector: BlockSelector,
    pub lint: LintOptions,
    pub parallel: ParallelConfig,
    /// Report absolute paths instead of project-relative ones
    pub show_full_path: bool,
    pub project_root: Option<PathBuf>,
}

impl ScanOptions {
    fn display_name(&self, path: &str) -> String {
        if self.show_full_path {
            to_full_path(path)
        } else {
            to_display_path(path, self.project_root.as_deref())
        }
    }
}

/// Lint the content of one document that is already in memory.
pub fn process_content<L: StyleLinter + ?Sized>(
    content: &[u8],
    display_name: &str,
    linter: &L,
    options: &ScanOptions,
) -> Result<DocumentResult, FileError> {
    lint_document(content, display_name, &options.selector, linter, &options.lint).map_err(|e| match e {
        DocumentError::Extract(source) => FileError::Extract {
            path: display_name.to_string(),
            source,
        },
        DocumentError::Linter { line, source } => FileError::Linter {
            path: display_name.to_string(),
            line,
            source,
        },
    })
}

/// Read and lint one file. Diagnostics carry `display_name` as their file.
pub fn process_file<L: StyleLinter + ?Sized>(
    path: &str,
    display_name: &str,
    linter: &L,
    options: &ScanOptions,
) -> Result<DocumentResult, FileError> {
    let content = std::fs::read(path).map_err(|source| FileError::Read {
        path: display_name.to_string(),
        source,
    })?;
    let result = process_content(&content, display_name, linter, options)?;
    log::debug!(
        "{display_name}: {} block(s), {} diagnostic(s)",
        result.blocks_linted,
        result.diagnostics.len()
    );
    Ok(result)
}

/// Lint every file. A failing file is logged and recorded; the others still run.
pub fn scan<L: StyleLinter + ?Sized>(files: &[String], linter: &L, options: &ScanOptions) -> ScanResult {
    let processor = FileParallelProcessor::new(options.parallel.clone());
    let outcomes = processor.process_files(files, |path| {
        let display_name = options.display_name(path);
        process_file(path, &display_name, linter, options)
    });

    let mut result = ScanResult::default();
    for outcome in outcomes {
        result.record(outcome);
    }
    result
}

/// Fold a single already-processed document into a fresh result.
pub fn single_result(outcome: Result<DocumentResult, FileError>) -> ScanResult {
    let mut result = ScanResult::default();
    result.record(outcome);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Severity;
    use crate::style_tools::LintRequest;
    use std::fs;
    use tempfile::tempdir;

    struct OneWarning;

    impl StyleLinter for OneWarning {
        fn lint(&self, _request: &LintRequest<'_>) -> Result<Vec<Diagnostic>, LinterError> {
            Ok(vec![Diagnostic::new(1, 1, Severity::Warning, "Unexpected empty block")])
        }
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let err = process_file("/nonexistent/App.vue", "App.vue", &OneWarning, &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, FileError::Read { .. }));
        assert_eq!(err.path(), "App.vue");
        assert!(!err.is_tool_error());
    }

    #[test]
    fn test_scan_keeps_file_order_and_skips_failures() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("A.vue");
        let b = dir.path().join("B.vue");
        let c = dir.path().join("C.vue");
        fs::write(&a, "<style lang=\"scss\">\na{}\n</style>").unwrap();
        fs::write(&b, b"<style lang=\"scss\">\xff</style>".as_slice()).unwrap();
        fs::write(&c, "\n\n<style lang=\"scss\">\nb{}\n</style>").unwrap();

        let files: Vec<String> = [&a, &b, &c].iter().map(|p| p.to_string_lossy().to_string()).collect();
        let options = ScanOptions {
            show_full_path: true,
            ..Default::default()
        };
        let result = scan(&files, &OneWarning, &options);

        assert_eq!(result.files_processed, 2);
        assert_eq!(result.blocks_linted, 2);
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(result.errors[0], FileError::Extract { .. }));
        assert!(!result.has_tool_errors());

        let lines: Vec<(bool, usize)> = result
            .diagnostics
            .iter()
            .map(|d| (d.file.ends_with("A.vue"), d.line))
            .collect();
        assert_eq!(lines, vec![(true, 1), (false, 3)]);
    }

    #[test]
    fn test_skipped_blocks_are_counted() {
        struct Unavailable;
        impl StyleLinter for Unavailable {
            fn lint(&self, _request: &LintRequest<'_>) -> Result<Vec<Diagnostic>, LinterError> {
                Err(LinterError::Other("stylelint is not installed".to_string()))
            }
        }

        let dir = tempdir().unwrap();
        let a = dir.path().join("A.vue");
        fs::write(&a, "<style lang=\"scss\">\na{}\n</style>\n<style lang=\"scss\">\nb{}\n</style>").unwrap();

        let result = scan(&[a.to_string_lossy().to_string()], &Unavailable, &ScanOptions::default());
        assert_eq!(result.files_processed, 1);
        assert_eq!(result.blocks_linted, 0);
        assert_eq!(result.blocks_skipped, 2);
        assert!(result.errors.is_empty());
    }
}
