//! Per-document linting: extract, normalize, lint, remap.

use crate::diagnostic::{Diagnostic, remap_all};
use crate::extractor::{BlockSelector, ExtractError, extract_blocks_from_bytes};
use crate::normalizer::normalize;
use crate::style_tools::{LintRequest, LinterConfig, LinterError, OnError, StyleLinter};
use thiserror::Error;

/// How blocks of one document are handed to the linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintOptions {
    /// Configured syntax, or `auto` to follow each block's `lang` attribute.
    pub format: String,
    pub on_error: OnError,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            format: "scss".to_string(),
            on_error: OnError::default(),
        }
    }
}

impl From<&LinterConfig> for LintOptions {
    fn from(config: &LinterConfig) -> Self {
        Self {
            format: config.format.clone(),
            on_error: config.on_error,
        }
    }
}

impl LintOptions {
    /// Resolve the syntax for a block with the given `lang` attribute.
    pub fn format_for(&self, lang: Option<&str>) -> String {
        if self.format.eq_ignore_ascii_case("auto") {
            lang.filter(|l| !l.is_empty())
                .map(|l| l.to_ascii_lowercase())
                .unwrap_or_else(|| "css".to_string())
        } else {
            self.format.clone()
        }
    }
}

/// Diagnostics of one document, remapped to document lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentResult {
    /// Grouped by block in document order.
    pub diagnostics: Vec<Diagnostic>,
    pub blocks_linted: usize,
    /// Blocks the linter failed on and that were skipped per `on-error`.
    pub blocks_skipped: usize,
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("linting block at line {line} failed: {source}")]
    Linter {
        /// 1-based document line of the block's first character.
        line: usize,
        #[source]
        source: LinterError,
    },
}

/// Lint every matching block of one document.
///
/// `filename` is set on every returned diagnostic and passed to the linter.
pub fn lint_document<L: StyleLinter + ?Sized>(
    content: impl AsRef<[u8]>,
    filename: &str,
    selector: &BlockSelector,
    linter: &L,
    options: &LintOptions,
) -> Result<DocumentResult, DocumentError> {
    let blocks = extract_blocks_from_bytes(content.as_ref(), selector)?;
    let mut result = DocumentResult::default();

    if blocks.is_empty() {
        log::debug!("{filename}: no <{}> blocks", selector.element);
        return Ok(result);
    }

    for block in &blocks {
        let fragment = normalize(&block.content);
        let format = options.format_for(block.attribute("lang"));
        let request = LintRequest {
            text: &fragment.text,
            filename,
            format: &format,
        };

        let mut diagnostics = match linter.lint(&request) {
            Ok(diagnostics) => diagnostics,
            Err(e) => match options.on_error {
                OnError::Fail => {
                    return Err(DocumentError::Linter {
                        line: block.line_offset + 1,
                        source: e,
                    });
                }
                OnError::Warn => {
                    log::warn!("{filename}:{}: skipping block: {e}", block.line_offset + 1);
                    result.blocks_skipped += 1;
                    continue;
                }
                OnError::Skip => {
                    log::debug!("{filename}:{}: skipping block: {e}", block.line_offset + 1);
                    result.blocks_skipped += 1;
                    continue;
                }
            },
        };

        remap_all(&mut diagnostics, block.line_offset);
        for diagnostic in &mut diagnostics {
            diagnostic.file = filename.to_string();
        }
        result.diagnostics.append(&mut diagnostics);
        result.blocks_linted += 1;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Severity;
    use std::sync::Mutex;

    /// Reports one diagnostic on line 2 of every block and records what it saw.
    #[derive(Default)]
    struct RecordingLinter {
        seen: Mutex<Vec<(String, String)>>,
    }

    impl StyleLinter for RecordingLinter {
        fn lint(&self, request: &LintRequest<'_>) -> Result<Vec<Diagnostic>, LinterError> {
            self.seen
                .lock()
                .unwrap()
                .push((request.text.to_string(), request.format.to_string()));
            Ok(vec![Diagnostic::new(2, 3, Severity::Warning, "Expected a semicolon")])
        }
    }

    struct FailingLinter;

    impl StyleLinter for FailingLinter {
        fn lint(&self, _request: &LintRequest<'_>) -> Result<Vec<Diagnostic>, LinterError> {
            Err(LinterError::Other("tool crashed".to_string()))
        }
    }

    const COMPONENT: &str = "<template>\n  <div/>\n</template>\n\n<style lang=\"scss\">\n  .a {\n    color: red\n  }\n</style>\n";

    #[test]
    fn test_diagnostics_are_remapped_and_tagged() {
        let linter = RecordingLinter::default();
        let result = lint_document(
            COMPONENT,
            "src/App.vue",
            &BlockSelector::default(),
            &linter,
            &LintOptions::default(),
        )
        .unwrap();

        assert_eq!(result.blocks_linted, 1);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].line, 6);
        assert_eq!(result.diagnostics[0].column, 3);
        assert_eq!(result.diagnostics[0].file, "src/App.vue");

        let seen = linter.seen.lock().unwrap();
        assert_eq!(seen[0].0, "\n.a {\n  color: red\n}\n");
        assert_eq!(seen[0].1, "scss");
    }

    #[test]
    fn test_auto_format_follows_lang() {
        let linter = RecordingLinter::default();
        let options = LintOptions {
            format: "auto".to_string(),
            ..Default::default()
        };
        let selector = BlockSelector::new("style", "lang", None);
        lint_document(
            "<style lang=\"less\">a{}</style>",
            "x.vue",
            &selector,
            &linter,
            &options,
        )
        .unwrap();
        assert_eq!(linter.seen.lock().unwrap()[0].1, "less");
    }

    #[test]
    fn test_format_for() {
        let mut options = LintOptions::default();
        assert_eq!(options.format_for(Some("less")), "scss");

        options.format = "auto".to_string();
        assert_eq!(options.format_for(Some("Less")), "less");
        assert_eq!(options.format_for(Some("")), "css");
        assert_eq!(options.format_for(None), "css");
    }

    #[test]
    fn test_on_error_warn_skips_block() {
        let result = lint_document(
            COMPONENT,
            "App.vue",
            &BlockSelector::default(),
            &FailingLinter,
            &LintOptions::default(),
        )
        .unwrap();
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.blocks_linted, 0);
        assert_eq!(result.blocks_skipped, 1);
    }

    #[test]
    fn test_on_error_fail_stops_document() {
        let options = LintOptions {
            on_error: OnError::Fail,
            ..Default::default()
        };
        let err = lint_document(COMPONENT, "App.vue", &BlockSelector::default(), &FailingLinter, &options)
            .unwrap_err();
        assert!(matches!(err, DocumentError::Linter { line: 5, .. }));
    }

    #[test]
    fn test_extract_error_is_propagated() {
        let err = lint_document(
            b"<style lang=\"scss\">\xff</style>".as_slice(),
            "bad.vue",
            &BlockSelector::default(),
            &RecordingLinter::default(),
            &LintOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, DocumentError::Extract(ExtractError::InvalidUtf8(_))));
    }
}
