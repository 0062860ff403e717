use clap::Args;

pub use vuestyle_lib::config::FailOn;

#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Files or directories to lint (defaults to the current directory)
    #[arg(required = false)]
    pub paths: Vec<String>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Ignore all configuration files and use defaults
    #[arg(long, conflicts_with = "config")]
    pub no_config: bool,

    /// Exclude specific files or directories (comma-separated glob patterns)
    #[arg(long)]
    pub exclude: Option<String>,

    /// Component file extensions to scan (comma-separated, default: vue)
    #[arg(long)]
    pub extensions: Option<String>,

    /// Respect .gitignore files when scanning directories
    /// When not specified, uses config file value (default: true)
    #[arg(
        long,
        num_args(0..=1),
        require_equals(true),
        default_missing_value = "true",
        help = "Respect .gitignore files when scanning directories (does not apply to explicitly provided paths)"
    )]
    pub respect_gitignore: Option<bool>,

    /// Linter tool id (see `vuestyle tools`)
    #[arg(long)]
    pub tool: Option<String>,

    /// Style syntax passed to the linter: scss, sass, less, css, or auto
    #[arg(long)]
    pub format: Option<String>,

    /// Output format for linting results
    #[arg(long, value_parser = ["text", "concise", "grouped", "json", "json-lines", "github", "pylint"],
          help = "Output format (default: text, or $VUESTYLE_OUTPUT_FORMAT, or output-format in config)")]
    pub output_format: Option<String>,

    /// Show absolute file paths instead of project-relative paths
    #[arg(long, help = "Show absolute file paths in output instead of relative paths")]
    pub show_full_path: bool,

    /// Control when to exit with code 1: any (default), warning, error, or never
    #[arg(long, value_parser = ["any", "warning", "error", "never"],
          help = "Exit code behavior: 'any' exits 1 on any diagnostic, 'warning' on warning+error, 'error' only on errors, 'never' always exits 0")]
    pub fail_on: Option<String>,

    /// What to do when the linter cannot run on a block: warn (default), skip, or fail
    #[arg(long, value_parser = ["warn", "skip", "fail"],
          help = "Linter failure handling: 'warn' logs and skips the block, 'skip' skips it silently, 'fail' exits 2")]
    pub on_error: Option<String>,

    /// Number of worker threads (default: one per core)
    #[arg(long, value_parser = clap::value_parser!(usize))]
    pub threads: Option<usize>,

    /// Process files one at a time
    #[arg(long, conflicts_with = "threads")]
    pub no_parallel: bool,

    /// Read from stdin instead of files
    #[arg(long, help = "Read from stdin instead of files")]
    pub stdin: bool,

    /// Filename to use for stdin input (for context and error messages)
    #[arg(long, help = "Filename to use when reading from stdin (e.g., App.vue)")]
    pub stdin_filename: Option<String>,

    /// Output linting results to stderr instead of stdout
    #[arg(long, help = "Output diagnostics to stderr instead of stdout")]
    pub stderr: bool,

    /// Show detailed output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print diagnostics, but nothing else
    #[arg(short, long, help = "Print diagnostics, but nothing else")]
    pub quiet: bool,

    /// Disable all logging (but still exit with status code upon detecting diagnostics)
    #[arg(
        short,
        long,
        help = "Disable all logging (but still exit with status code upon detecting diagnostics)"
    )]
    pub silent: bool,
}

/// Split a comma-separated CLI value into trimmed, non-empty items.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}
