//! [`StyleLinter`] backed by an external command.

use super::config::{LinterConfig, ToolDefinition};
use super::executor::{ToolExecutor, ToolOutput};
use super::registry::ToolRegistry;
use super::{LintRequest, LinterError, StyleLinter};
use crate::diagnostic::{Diagnostic, Severity};
use std::collections::HashMap;

/// Runs a configured tool once per block and parses what it prints.
///
/// The tool is resolved per block from the block's syntax, so the built-in
/// `stylelint` runs as `stylelint:less` on a `less` block.
#[derive(Clone)]
pub struct ExternalToolLinter {
    tool_id: String,
    registry: ToolRegistry,
    executor: ToolExecutor,
    timeout_ms: u64,
}

impl ExternalToolLinter {
    /// Resolve `config.tool` against the user tools and the built-in registry.
    pub fn from_config(config: &LinterConfig) -> Result<Self, LinterError> {
        let registry = ToolRegistry::new(config.tools.clone());
        if !registry.contains(&config.tool) {
            return Err(LinterError::UnknownTool(config.tool.clone()));
        }
        Ok(Self::with_registry(config.tool.clone(), registry, config.timeout))
    }

    /// A linter for a single tool definition, used for every syntax.
    pub fn new(tool_id: impl Into<String>, tool: ToolDefinition, timeout_ms: u64) -> Self {
        let tool_id = tool_id.into();
        let registry = ToolRegistry::new(HashMap::from([(tool_id.clone(), tool)]));
        Self::with_registry(tool_id, registry, timeout_ms)
    }

    fn with_registry(tool_id: String, registry: ToolRegistry, timeout_ms: u64) -> Self {
        Self {
            tool_id,
            registry,
            executor: ToolExecutor::new(timeout_ms),
            timeout_ms,
        }
    }

    pub fn tool_id(&self) -> &str {
        &self.tool_id
    }

    /// The tool id and definition that lint blocks of `format`.
    pub fn tool_for(&self, format: &str) -> Result<(String, &ToolDefinition), LinterError> {
        self.registry
            .resolve_for_format(&self.tool_id, format)
            .ok_or_else(|| LinterError::UnknownTool(self.tool_id.clone()))
    }
}

/// Arguments after the binary with `{filename}` and `{format}` filled in.
fn build_args(tool: &ToolDefinition, request: &LintRequest<'_>) -> Vec<String> {
    tool.command
        .iter()
        .skip(1)
        .chain(tool.args.iter())
        .map(|arg| {
            arg.replace("{filename}", request.filename)
                .replace("{format}", request.format)
        })
        .collect()
}

impl StyleLinter for ExternalToolLinter {
    fn lint(&self, request: &LintRequest<'_>) -> Result<Vec<Diagnostic>, LinterError> {
        let (resolved_id, tool) = self.tool_for(request.format)?;
        let args = build_args(tool, request);
        log::debug!("Running '{resolved_id}' on {} ({})", request.filename, request.format);

        let output = self
            .executor
            .execute(tool, &args, request.text, Some(self.timeout_ms))?;

        Ok(parse_tool_output(&output, &self.tool_id))
    }
}

/// Parse tool output into fragment-relative diagnostics.
///
/// Tools vary widely in what they print, so this is best-effort. Lines that
/// match none of the known shapes are ignored.
pub fn parse_tool_output(output: &ToolOutput, tool_id: &str) -> Vec<Diagnostic> {
    let combined = format!("{}\n{}", output.stdout, output.stderr);
    let mut diagnostics: Vec<Diagnostic> = combined
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| parse_standard_format(line).or_else(|| parse_eslint_format(line)))
        .map(|d| d.with_rule(tool_id))
        .collect();

    if diagnostics.is_empty() && !output.success {
        let message = output
            .stderr
            .lines()
            .chain(output.stdout.lines())
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Tool exited with code {}", output.exit_code));

        diagnostics.push(Diagnostic::new(1, 1, Severity::Error, message).with_rule(tool_id));
    }

    diagnostics
}

/// Parse `file:line:col: message` or `file:line: message`.
///
/// stylelint's unix formatter prints `file:line:col: message [severity]`.
fn parse_standard_format(line: &str) -> Option<Diagnostic> {
    let parts: Vec<&str> = line.splitn(4, ':').collect();
    if parts.len() < 3 {
        return None;
    }
    let line_num = parts[1].trim().parse::<usize>().ok()?;

    let (column, message) = match parts.get(3) {
        Some(rest) => match parts[2].trim().parse::<usize>() {
            Ok(col) => (col, rest.trim()),
            // `file:line: message: more` has no column
            Err(_) => (1, line.splitn(3, ':').nth(2)?.trim()),
        },
        None => (1, parts[2].trim()),
    };

    if message.is_empty() {
        return None;
    }

    let (message, severity) = split_trailing_severity(message);
    Some(Diagnostic::new(line_num.max(1), column.max(1), severity, message))
}

/// Parse eslint-style `line:col severity message`.
fn parse_eslint_format(line: &str) -> Option<Diagnostic> {
    let parts: Vec<&str> = line.splitn(3, ' ').collect();
    if parts.len() < 2 {
        return None;
    }
    let (line_part, col_part) = parts[0].split_once(':')?;
    let line_num = line_part.parse::<usize>().ok()?;
    let col = col_part.parse::<usize>().ok()?;

    let (severity, message) = match parts[1] {
        "error" => (Severity::Error, parts.get(2).copied().unwrap_or_default()),
        "warning" | "warn" => (Severity::Warning, parts.get(2).copied().unwrap_or_default()),
        _ => {
            let message = parts[1..].join(" ");
            return Some(Diagnostic::new(
                line_num.max(1),
                col.max(1),
                Severity::infer(&message),
                message,
            ));
        }
    };

    Some(Diagnostic::new(line_num.max(1), col.max(1), severity, message.trim()))
}

/// Split a stylelint-style `message [error]` suffix off the message.
fn split_trailing_severity(message: &str) -> (String, Severity) {
    if let Some(stripped) = message.strip_suffix(']')
        && let Some(open) = stripped.rfind('[')
    {
        let tag = &stripped[open + 1..];
        let severity = match tag {
            "error" => Some(Severity::Error),
            "warning" => Some(Severity::Warning),
            _ => None,
        };
        if let Some(severity) = severity {
            return (stripped[..open].trim_end().to_string(), severity);
        }
    }
    (message.to_string(), Severity::infer(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(stdout: &str, stderr: &str, exit_code: i32) -> ToolOutput {
        ToolOutput {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            exit_code,
            success: exit_code == 0,
        }
    }

    #[test]
    fn test_parse_stylelint_unix_output() {
        let out = output(
            "src/App.vue:2:14: Expected a trailing semicolon (declaration-block-trailing-semicolon) [error]\n\n1 problem\n",
            "",
            2,
        );
        let diagnostics = parse_tool_output(&out, "stylelint");
        assert_eq!(diagnostics.len(), 1);
        let d = &diagnostics[0];
        assert_eq!(d.line, 2);
        assert_eq!(d.column, 14);
        assert_eq!(d.severity, Severity::Error);
        assert_eq!(
            d.message,
            "Expected a trailing semicolon (declaration-block-trailing-semicolon)"
        );
        assert_eq!(d.rule.as_deref(), Some("stylelint"));
    }

    #[test]
    fn test_parse_line_without_column() {
        let d = parse_standard_format("App.vue:3: Unexpected empty block").expect("should parse");
        assert_eq!(d.line, 3);
        assert_eq!(d.column, 1);
        assert_eq!(d.message, "Unexpected empty block");
    }

    #[test]
    fn test_parse_warning_suffix() {
        let d = parse_standard_format("-:1:1: Unexpected named color \"red\" [warning]").expect("should parse");
        assert_eq!(d.severity, Severity::Warning);
        assert_eq!(d.message, "Unexpected named color \"red\"");
    }

    #[test]
    fn test_parse_eslint_format() {
        let d = parse_eslint_format("4:2 warning Unexpected unknown unit").expect("should parse");
        assert_eq!(d.line, 4);
        assert_eq!(d.column, 2);
        assert_eq!(d.severity, Severity::Warning);
        assert_eq!(d.message, "Unexpected unknown unit");
    }

    #[test]
    fn test_unparseable_lines_are_ignored() {
        let out = output("All good\nChecked 1 file\n", "", 0);
        assert!(parse_tool_output(&out, "stylelint").is_empty());
    }

    #[test]
    fn test_failure_without_parseable_output() {
        let out = output("", "Error: Cannot find module 'postcss-scss'\n", 1);
        let diagnostics = parse_tool_output(&out, "stylelint");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(diagnostics[0].message, "Error: Cannot find module 'postcss-scss'");
    }

    #[test]
    fn test_failure_without_any_output() {
        let diagnostics = parse_tool_output(&output("", "", 78), "x");
        assert_eq!(diagnostics[0].message, "Tool exited with code 78");
    }

    #[test]
    fn test_build_args_substitutes_placeholders() {
        let tool = ToolDefinition {
            command: vec!["lint".to_string(), "--name={filename}".to_string()],
            stdin: true,
            args: vec!["--syntax".to_string(), "{format}".to_string()],
        };
        let request = LintRequest {
            text: "",
            filename: "src/App.vue",
            format: "scss",
        };
        assert_eq!(
            build_args(&tool, &request),
            vec!["--name=src/App.vue", "--syntax", "scss"]
        );
    }

    #[test]
    fn test_from_config_unknown_tool() {
        let config = LinterConfig {
            tool: "sass-lint".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            ExternalToolLinter::from_config(&config),
            Err(LinterError::UnknownTool(id)) if id == "sass-lint"
        ));
    }

    #[test]
    fn test_default_stylelint_picks_syntax_per_block() {
        let linter = ExternalToolLinter::from_config(&LinterConfig::default()).unwrap();

        let (id, tool) = linter.tool_for("less").unwrap();
        assert_eq!(id, "stylelint:less");
        assert!(tool.command.contains(&"--custom-syntax=postcss-less".to_string()));

        let (id, _) = linter.tool_for("scss").unwrap();
        assert_eq!(id, "stylelint");
    }

    #[test]
    #[cfg(unix)]
    fn test_auto_format_runs_the_less_variant_on_less_blocks() {
        use crate::extractor::BlockSelector;
        use crate::pipeline::{LintOptions, lint_document};

        fn echo_tool(syntax: &str) -> ToolDefinition {
            ToolDefinition {
                command: vec![
                    "sh".to_string(),
                    "-c".to_string(),
                    format!("cat >/dev/null; echo \"{{filename}}:1:1: linted as {syntax} ({{format}})\""),
                ],
                stdin: true,
                args: vec![],
            }
        }

        let config = LinterConfig {
            tool: "fake".to_string(),
            format: "auto".to_string(),
            tools: HashMap::from([
                ("fake".to_string(), echo_tool("default")),
                ("fake:less".to_string(), echo_tool("less")),
            ]),
            ..Default::default()
        };
        let linter = ExternalToolLinter::from_config(&config).unwrap();
        let document = "<style lang=\"less\">\n@c: red;\n</style>\n<style lang=\"scss\">\n$c: red;\n</style>\n";

        let result = lint_document(
            document,
            "App.vue",
            &BlockSelector::new("style", "lang", None),
            &linter,
            &LintOptions::from(&config),
        )
        .unwrap();

        let messages: Vec<&str> = result.diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["linted as less (less)", "linted as default (scss)"]);
    }

    #[test]
    #[cfg(unix)]
    fn test_lint_with_shell_tool() {
        let tool = ToolDefinition {
            command: vec![
                "sh".to_string(),
                "-c".to_string(),
                "cat >/dev/null; echo \"{filename}:2:3: Expected a semicolon\"".to_string(),
            ],
            stdin: true,
            args: vec![],
        };
        let linter = ExternalToolLinter::new("fake", tool, 5000);
        let request = LintRequest {
            text: "a {\n  color: red\n}",
            filename: "App.vue",
            format: "scss",
        };
        let diagnostics = linter.lint(&request).expect("lint should run");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 2);
        assert_eq!(diagnostics[0].column, 3);
        assert_eq!(diagnostics[0].message, "Expected a semicolon");
    }
}
