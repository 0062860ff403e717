//! Exit codes for vuestyle, following Ruff's convention
//!
//! These exit codes allow users and CI/CD systems to distinguish between
//! style violations and failures of the tool itself.

/// Success - No diagnostics at or above the `fail-on` threshold
pub const SUCCESS: i32 = 0;

/// Diagnostics found - One or more style violations detected
pub const VIOLATIONS_FOUND: i32 = 1;

/// Tool error - Configuration error, or a linter failure under `on-error = "fail"`
pub const TOOL_ERROR: i32 = 2;

/// Helper functions for consistent exit behavior
pub mod exit {
    use super::TOOL_ERROR;

    /// Exit with tool error code (2)
    pub fn tool_error() -> ! {
        std::process::exit(TOOL_ERROR);
    }
}

/// Exit code for a finished run.
pub fn for_run(tool_failed: bool, violations: bool) -> i32 {
    if tool_failed {
        TOOL_ERROR
    } else if violations {
        VIOLATIONS_FOUND
    } else {
        SUCCESS
    }
}
