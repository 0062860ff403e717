//! Indentation normalization for embedded style blocks.
//!
//! Style blocks inherit the indentation of the markup around them. Before a
//! block is handed to a linter the indentation of its first non-empty line is
//! removed from every line that has at least that much of it. Lines are never
//! added, dropped or merged, so a line number reported against the normalized
//! text is still a line number in the block.

/// Indentation detected on the first non-empty line of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indentation {
    /// Nothing to strip.
    None,
    /// A run of this many spaces.
    Spaces(usize),
    /// A single leading tab.
    Tab,
}

/// Result of normalizing one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFragment {
    pub text: String,
    pub indentation: Indentation,
    /// Lines left untouched because they had less indentation than detected.
    /// Blank lines are not counted.
    pub underindented_lines: usize,
}

impl NormalizedFragment {
    pub fn line_count(&self) -> usize {
        split_lines(&self.text).len()
    }
}

/// Split on `\n`, dropping a single `\r` before each `\n`.
///
/// A trailing newline produces a trailing empty line, so the number of items
/// is always the number of `\n` characters plus one.
pub fn split_lines(content: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = content.split('\n').collect();
    let last = lines.len() - 1;
    // Only a `\r` that precedes a `\n` is part of the line ending.
    for line in &mut lines[..last] {
        if let Some(stripped) = line.strip_suffix('\r') {
            *line = stripped;
        }
    }
    lines
}

fn leading_spaces(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}

/// Detect the indentation to strip from a block.
pub fn detect_indentation(lines: &[&str]) -> Indentation {
    let Some(first) = lines.iter().find(|line| !line.is_empty()) else {
        return Indentation::None;
    };

    match leading_spaces(first) {
        0 if first.starts_with('\t') => Indentation::Tab,
        0 => Indentation::None,
        n => Indentation::Spaces(n),
    }
}

/// Strip the detected indentation from every line of `content`.
pub fn normalize(content: &str) -> NormalizedFragment {
    let lines = split_lines(content);
    let indentation = detect_indentation(&lines);
    let mut underindented_lines = 0;

    let stripped: Vec<&str> = lines
        .iter()
        .map(|line| {
            let strip = match indentation {
                Indentation::None => 0,
                Indentation::Spaces(n) if leading_spaces(line) >= n => n,
                Indentation::Tab if line.starts_with('\t') => 1,
                Indentation::Spaces(_) | Indentation::Tab => {
                    if !line.trim().is_empty() {
                        underindented_lines += 1;
                    }
                    0
                }
            };
            &line[strip..]
        })
        .collect();

    if underindented_lines > 0 {
        log::debug!("{underindented_lines} line(s) have less indentation than {indentation:?}, left unchanged");
    }

    NormalizedFragment {
        text: stripped.join("\n"),
        indentation,
        underindented_lines,
    }
}
