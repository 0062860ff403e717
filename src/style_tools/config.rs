//! Configuration types for style linting tools.
//!
//! This module defines the `[linter]` section of the configuration: which tool
//! lints the extracted blocks, what syntax it is told to expect, and how tool
//! failures are handled.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration of the style linter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct LinterConfig {
    /// Tool id, looked up in `tools` first and then in the built-in registry
    #[serde(default = "default_tool")]
    pub tool: String,

    /// Syntax passed to the tool (`scss`, `sass`, `less`, `css`, or `auto` to
    /// use the block's `lang` attribute)
    #[serde(default = "default_format")]
    pub format: String,

    /// Error handling strategy when the tool cannot be run
    #[serde(default)]
    pub on_error: OnError,

    /// Timeout per tool execution in milliseconds (default: 30000)
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Worker threads used to process files (default: one per core)
    #[serde(default)]
    pub threads: Option<usize>,

    /// Custom tool definitions (override built-ins)
    #[serde(default)]
    pub tools: HashMap<String, ToolDefinition>,
}

fn default_tool() -> String {
    "stylelint".to_string()
}

fn default_format() -> String {
    "scss".to_string()
}

fn default_timeout() -> u64 {
    30_000
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self {
            tool: default_tool(),
            format: default_format(),
            on_error: OnError::default(),
            timeout: default_timeout(),
            threads: None,
            tools: HashMap::new(),
        }
    }
}

/// Error handling strategy for tool execution failures.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OnError {
    /// Stop processing the file and report a tool error
    Fail,
    /// Skip the block silently
    Skip,
    /// Log a warning and skip the block
    #[default]
    Warn,
}

impl std::str::FromStr for OnError {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fail" => Ok(OnError::Fail),
            "skip" => Ok(OnError::Skip),
            "warn" => Ok(OnError::Warn),
            _ => Err(format!("Unknown on-error strategy: {s}")),
        }
    }
}

/// Definition of an external tool.
///
/// `{filename}` and `{format}` in `command` or `args` are replaced with the
/// component path and the block syntax before the tool is run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct ToolDefinition {
    /// Command to run (first element is the binary, rest are arguments)
    pub command: Vec<String>,

    /// Whether the tool reads the block from stdin (default: true)
    #[serde(default = "default_true")]
    pub stdin: bool,

    /// Additional arguments appended to the command
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Default for ToolDefinition {
    fn default() -> Self {
        Self {
            command: Vec::new(),
            stdin: true,
            args: Vec::new(),
        }
    }
}
