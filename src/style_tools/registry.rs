//! Built-in tool registry with definitions for common style linters.
//!
//! Users can override these or add their own under `[linter.tools.<id>]`.

use super::config::ToolDefinition;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Registry of tool definitions.
#[derive(Clone)]
pub struct ToolRegistry {
    /// User-defined tools (override built-ins)
    user_tools: HashMap<String, ToolDefinition>,
}

impl ToolRegistry {
    pub fn new(user_tools: HashMap<String, ToolDefinition>) -> Self {
        Self { user_tools }
    }

    /// Get a tool definition by ID.
    ///
    /// Checks user tools first, then falls back to built-in tools.
    pub fn get(&self, tool_id: &str) -> Option<&ToolDefinition> {
        self.user_tools.get(tool_id).or_else(|| BUILTIN_TOOLS.get(tool_id))
    }

    /// The definition that runs `tool_id` on blocks of the given syntax.
    ///
    /// A `<tool_id>:<format>` variant wins when the user defines it, or when it
    /// is built in and `tool_id` itself has not been overridden. Otherwise the
    /// tool itself is used. Returns the id that was resolved with it.
    pub fn resolve_for_format(&self, tool_id: &str, format: &str) -> Option<(String, &ToolDefinition)> {
        let variant = format!("{tool_id}:{}", format.to_ascii_lowercase());
        if let Some(tool) = self.user_tools.get(&variant) {
            return Some((variant, tool));
        }
        if !self.user_tools.contains_key(tool_id)
            && let Some(tool) = BUILTIN_TOOLS.get(variant.as_str())
        {
            return Some((variant, tool));
        }
        self.get(tool_id).map(|tool| (tool_id.to_string(), tool))
    }

    pub fn contains(&self, tool_id: &str) -> bool {
        self.user_tools.contains_key(tool_id) || BUILTIN_TOOLS.contains_key(tool_id)
    }

    /// List all available tool IDs, sorted.
    pub fn list_tools(&self) -> Vec<&str> {
        let mut tools: Vec<&str> = self.user_tools.keys().map(|s| s.as_str()).collect();
        for key in BUILTIN_TOOLS.keys() {
            if !self.user_tools.contains_key(*key) {
                tools.push(key);
            }
        }
        tools.sort();
        tools
    }

    pub fn is_builtin(tool_id: &str) -> bool {
        BUILTIN_TOOLS.contains_key(tool_id)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new(HashMap::new())
    }
}

fn stylelint(syntax_args: &[&str]) -> ToolDefinition {
    let mut command = vec![
        "stylelint".to_string(),
        "--stdin".to_string(),
        "--stdin-filename={filename}".to_string(),
        "--formatter=unix".to_string(),
    ];
    command.extend(syntax_args.iter().map(|s| s.to_string()));
    ToolDefinition {
        command,
        stdin: true,
        args: vec![],
    }
}

/// Built-in tool definitions. All of them read the block from stdin.
///
/// `stylelint:<format>` entries are picked per block when the configured tool
/// is `stylelint`; see [`ToolRegistry::resolve_for_format`].
static BUILTIN_TOOLS: LazyLock<HashMap<&'static str, ToolDefinition>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    // SCSS through the postcss-scss custom syntax
    m.insert("stylelint", stylelint(&["--custom-syntax=postcss-scss"]));

    // Indented Sass syntax
    m.insert("stylelint:sass", stylelint(&["--custom-syntax=postcss-sass"]));

    m.insert("stylelint:less", stylelint(&["--custom-syntax=postcss-less"]));

    // Plain CSS, no custom syntax
    m.insert("stylelint:css", stylelint(&[]));

    m
});
