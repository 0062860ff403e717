//! Initialization utilities, such as writing a default configuration file.

use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Error type for initialization operations
#[derive(Error, Debug)]
pub enum InitError {
    #[error("Configuration file already exists at {path}")]
    FileExists { path: String },
    #[error("Failed to write file {path}: {source}")]
    IoError { source: io::Error, path: String },
}

/// Commented default configuration, valid TOML that parses to the defaults.
pub const DEFAULT_CONFIG: &str = r#"# vuestyle configuration file

[global]
# File or directory patterns to exclude from linting
exclude = [
    "node_modules",
    "dist",
]

# Extensions of component files to scan
extensions = ["vue"]

# Respect .gitignore files when scanning directories
respect-gitignore = true

# Output format: text, concise, grouped, json, json-lines, github, pylint
# output-format = "text"

# Exit with code 1 on: any, warning, error, never
# fail-on = "any"

# Which elements hold style code. An empty value only requires the attribute.
[blocks]
element = "style"
attribute = "lang"
value = "scss"

[linter]
# Tool id. Run `vuestyle tools` to list the built-in ones.
tool = "stylelint"

# Syntax passed to the tool, or "auto" to use each block's lang attribute
format = "scss"

# What to do when the tool cannot be run: warn, skip, fail
on-error = "warn"

# Timeout per tool run in milliseconds
timeout = 30000

# Custom tools. {filename} and {format} are substituted in command and args.
# [linter.tools.my-stylelint]
# command = ["npx", "stylelint", "--stdin", "--stdin-filename={filename}", "--formatter=unix"]
# args = ["--custom-syntax=postcss-{format}"]
"#;

/// Create a default configuration file at the specified path.
///
/// # Errors
///
/// Refuses to overwrite an existing file, and reports write failures.
pub fn create_default_config(path: &str) -> Result<(), InitError> {
    if Path::new(path).exists() {
        return Err(InitError::FileExists { path: path.to_string() });
    }

    fs::write(path, DEFAULT_CONFIG).map_err(|source| InitError::IoError {
        source,
        path: path.to_string(),
    })
}
