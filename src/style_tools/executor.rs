//! Process execution for external style linters.
//!
//! A fragment is written to the tool's stdin while two reader threads drain
//! stdout and stderr, so a chatty linter cannot block on a full pipe. The
//! child is polled until it exits or the timeout elapses.

use super::config::ToolDefinition;
use std::collections::HashMap;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// What a linter process produced.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, or -1 when the process was killed by a signal.
    pub exit_code: i32,
    pub success: bool,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutorError {
    #[error("Tool '{tool}' not found in PATH")]
    ToolNotFound { tool: String },
    #[error("Tool '{tool}' failed: {message}")]
    ExecutionFailed { tool: String, message: String },
    #[error("Tool '{tool}' timed out after {timeout_ms}ms")]
    Timeout { tool: String, timeout_ms: u64 },
    #[error("I/O error: {message}")]
    IoError { message: String },
}

impl ExecutorError {
    fn io(context: &str, tool: &str, e: io::Error) -> Self {
        Self::IoError {
            message: format!("{context} '{tool}': {e}"),
        }
    }
}

/// Runs linter commands. Clones share the PATH lookup cache, so a parallel
/// scan resolves each binary once.
#[derive(Clone)]
pub struct ToolExecutor {
    resolved: Arc<Mutex<HashMap<String, bool>>>,
    default_timeout_ms: u64,
}

impl ToolExecutor {
    pub fn new(default_timeout_ms: u64) -> Self {
        Self {
            resolved: Arc::default(),
            default_timeout_ms,
        }
    }

    /// Whether `program` can be started, looked up once per executor.
    pub fn is_tool_available(&self, program: &str) -> bool {
        match self.resolved.lock() {
            Ok(mut resolved) => *resolved
                .entry(program.to_string())
                .or_insert_with(|| program_exists(program)),
            Err(_) => program_exists(program),
        }
    }

    /// Run `tool_def` with `args` (placeholders already substituted) and
    /// `input` on stdin when the tool reads stdin.
    ///
    /// A `timeout_ms` of `Some(0)` waits indefinitely.
    pub fn execute(
        &self,
        tool_def: &ToolDefinition,
        args: &[String],
        input: &str,
        timeout_ms: Option<u64>,
    ) -> Result<ToolOutput, ExecutorError> {
        let program = tool_def
            .command
            .first()
            .ok_or_else(|| ExecutorError::ExecutionFailed {
                tool: "unknown".to_string(),
                message: "Empty command".to_string(),
            })?;

        if !self.is_tool_available(program) {
            return Err(ExecutorError::ToolNotFound { tool: program.clone() });
        }

        let mut child = Command::new(program)
            .args(args)
            .stdin(if tool_def.stdin { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ExecutorError::io("Failed to spawn", program, e))?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(input.as_bytes()) {
                // Linters may exit without reading everything
                Err(e) if e.kind() != io::ErrorKind::BrokenPipe => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ExecutorError::io("Failed to write stdin of", program, e));
                }
                _ => {}
            }
        }

        let timeout_ms = timeout_ms.unwrap_or(self.default_timeout_ms);
        let Some(status) = wait_with_timeout(&mut child, timeout_ms, program)? else {
            let _ = collect(stdout);
            let _ = collect(stderr);
            return Err(ExecutorError::Timeout {
                tool: program.clone(),
                timeout_ms,
            });
        };

        Ok(ToolOutput {
            stdout: collect(stdout)?,
            stderr: collect(stderr)?,
            exit_code: status.code().unwrap_or(-1),
            success: status.success(),
        })
    }
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self::new(30_000)
    }
}

fn program_exists(program: &str) -> bool {
    if program.contains(std::path::MAIN_SEPARATOR) {
        return Path::new(program).is_file();
    }

    #[cfg(windows)]
    let finder = "where";
    #[cfg(not(windows))]
    let finder = "which";

    Command::new(finder)
        .arg(program)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|status| status.success())
}

/// `None` when the child was killed after `timeout_ms`.
fn wait_with_timeout(child: &mut Child, timeout_ms: u64, program: &str) -> Result<Option<ExitStatus>, ExecutorError> {
    if timeout_ms == 0 {
        return child
            .wait()
            .map(Some)
            .map_err(|e| ExecutorError::io("Failed to wait for", program, e));
    }

    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
    loop {
        if let Some(status) = child
            .try_wait()
            .map_err(|e| ExecutorError::io("Failed to poll", program, e))?
        {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            log::debug!("Killing '{program}' after {timeout_ms}ms");
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

type Drain = Option<JoinHandle<io::Result<String>>>;

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Drain {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            pipe.read_to_end(&mut buf)?;
            Ok(String::from_utf8_lossy(&buf).into_owned())
        })
    })
}

fn collect(handle: Drain) -> Result<String, ExecutorError> {
    let Some(handle) = handle else {
        return Ok(String::new());
    };
    let message = match handle.join() {
        Ok(Ok(text)) => return Ok(text),
        Ok(Err(e)) => format!("Failed to read output: {e}"),
        Err(_) => "Output reader thread panicked".to_string(),
    };
    Err(ExecutorError::IoError { message })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool(command: &[&str], stdin: bool) -> ToolDefinition {
        ToolDefinition {
            command: command.iter().map(|s| s.to_string()).collect(),
            stdin,
            args: vec![],
        }
    }

    #[test]
    fn test_tool_not_found() {
        let executor = ToolExecutor::default();
        let result = executor.execute(&tool(&["nonexistent-tool-xyz123"], true), &[], "a{}", None);
        assert!(matches!(result, Err(ExecutorError::ToolNotFound { tool }) if tool == "nonexistent-tool-xyz123"));
    }

    #[test]
    fn test_empty_command() {
        let executor = ToolExecutor::default();
        let result = executor.execute(&tool(&[], true), &[], "a{}", None);
        assert!(matches!(result, Err(ExecutorError::ExecutionFailed { .. })));
    }

    #[test]
    fn test_availability_is_cached() {
        let executor = ToolExecutor::default();
        let clone = executor.clone();
        assert!(!executor.is_tool_available("nonexistent-tool-xyz123"));
        assert_eq!(clone.resolved.lock().unwrap().get("nonexistent-tool-xyz123"), Some(&false));
    }

    #[test]
    #[cfg(unix)]
    fn test_fragment_is_piped_to_stdin() {
        let executor = ToolExecutor::default();
        let output = executor
            .execute(&tool(&["cat"], true), &[], "a {\n  color: red;\n}", None)
            .expect("cat should succeed");
        assert!(output.success);
        assert_eq!(output.stdout, "a {\n  color: red;\n}");
    }

    #[test]
    #[cfg(unix)]
    fn test_exit_code_and_stderr_are_reported() {
        let executor = ToolExecutor::default();
        let args = vec!["-c".to_string(), "echo oops >&2; exit 3".to_string()];

        let output = executor.execute(&tool(&["sh"], false), &args, "", None).expect("sh should run");
        assert!(!output.success);
        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stderr.trim(), "oops");
    }

    #[test]
    #[cfg(unix)]
    fn test_timeout() {
        let executor = ToolExecutor::new(50);
        let result = executor.execute(&tool(&["sleep"], false), &["5".to_string()], "", None);
        assert!(matches!(result, Err(ExecutorError::Timeout { timeout_ms: 50, .. })));
    }

    #[test]
    #[cfg(unix)]
    fn test_zero_timeout_waits() {
        let executor = ToolExecutor::new(50);
        let args = vec!["-c".to_string(), "sleep 0.2; echo done".to_string()];
        let output = executor.execute(&tool(&["sh"], false), &args, "", Some(0)).expect("sh should run");
        assert_eq!(output.stdout.trim(), "done");
    }
}
