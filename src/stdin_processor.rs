//! Stdin processing for component linting

use anyhow::{Context, Result};
use std::io::{self, Read};
use vuestyle_lib::file_processor::{ScanOptions, ScanResult, process_content, single_result};
use vuestyle_lib::style_tools::StyleLinter;

use crate::cli_types::CheckArgs;

/// Lint one component read from stdin.
pub fn process_stdin<L: StyleLinter + ?Sized>(args: &CheckArgs, linter: &L, options: &ScanOptions) -> Result<ScanResult> {
    let mut content = Vec::new();
    io::stdin()
        .read_to_end(&mut content)
        .context("Failed to read from stdin")?;

    let display_filename = args.stdin_filename.as_deref().unwrap_or("<stdin>");
    log::debug!("Read {} bytes from stdin as {display_filename}", content.len());

    Ok(single_result(process_content(&content, display_filename, linter, options)))
}
