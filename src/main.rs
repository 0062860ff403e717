use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use std::time::Instant;

use vuestyle_lib::config::{self, Config, OUTPUT_FORMAT_ENV};
use vuestyle_lib::exit_codes::{self, exit};
use vuestyle_lib::file_processor::{ScanOptions, ScanResult, find_component_files, scan};
use vuestyle_lib::init::create_default_config;
use vuestyle_lib::output::{OutputFormat, OutputWriter};
use vuestyle_lib::parallel::ParallelConfig;
use vuestyle_lib::pipeline::LintOptions;
use vuestyle_lib::style_tools::{ExternalToolLinter, OnError, ToolRegistry};

mod cli_types;
mod stdin_processor;

use cli_types::{CheckArgs, FailOn, split_list};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint style blocks in component files
    Check(CheckArgs),
    /// Create a default configuration file
    Init {
        /// Where to write the configuration
        #[arg(long, default_value = ".vuestyle.toml")]
        path: String,
    },
    /// List the available linter tools
    Tools {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<String>,

        /// Ignore all configuration files
        #[arg(long, conflicts_with = "config")]
        no_config: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let outcome = match &cli.command {
        Commands::Check(args) => run_check(args),
        Commands::Init { path } => run_init(path),
        Commands::Tools { config, no_config } => run_tools(config.as_deref(), *no_config),
    };

    match outcome {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {e:#}", "Error".red().bold());
            exit::tool_error();
        }
    }
}

fn init_logging(verbose: bool, quiet: bool, silent: bool) {
    let level = if silent {
        "off"
    } else if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    // RUST_LOG, when set, takes precedence over the flags
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

/// Fold CLI flags into the loaded configuration. CLI values win.
fn apply_cli_overrides(config: &mut Config, args: &CheckArgs) -> Result<()> {
    if let Some(exclude) = &args.exclude {
        config.global.exclude = split_list(exclude);
    }
    if let Some(extensions) = &args.extensions {
        let extensions = split_list(extensions);
        if extensions.is_empty() {
            bail!("--extensions must name at least one extension");
        }
        config.global.extensions = extensions;
    }
    if let Some(respect) = args.respect_gitignore {
        config.global.respect_gitignore = respect;
    }
    if let Some(fail_on) = &args.fail_on {
        config.global.fail_on = fail_on.parse::<FailOn>().map_err(anyhow::Error::msg)?;
    }
    if let Some(on_error) = &args.on_error {
        config.linter.on_error = on_error.parse::<OnError>().map_err(anyhow::Error::msg)?;
    }
    if let Some(tool) = &args.tool {
        config.linter.tool = tool.clone();
    }
    if let Some(format) = &args.format {
        config.linter.format = format.clone();
    }
    if let Some(threads) = args.threads {
        if threads == 0 {
            bail!("--threads must be at least 1");
        }
        config.linter.threads = Some(threads);
    }
    Ok(())
}

/// CLI, then $VUESTYLE_OUTPUT_FORMAT, then config, then text.
fn resolve_output_format(args: &CheckArgs, config: &Config) -> Result<OutputFormat> {
    let env_output_format = std::env::var(OUTPUT_FORMAT_ENV).ok();
    let name = args
        .output_format
        .as_deref()
        .or(env_output_format.as_deref())
        .or(config.global.output_format.as_deref())
        .unwrap_or("text");
    name.parse::<OutputFormat>().map_err(anyhow::Error::msg)
}

fn run_check(args: &CheckArgs) -> Result<i32> {
    init_logging(args.verbose, args.quiet, args.silent);

    let loaded = config::load(args.config.as_deref(), args.no_config)?;
    let mut config = loaded.config;
    apply_cli_overrides(&mut config, args)?;

    let output_format = resolve_output_format(args, &config)?;
    let linter = ExternalToolLinter::from_config(&config.linter)?;
    log::debug!("Linting with '{}' as {}", linter.tool_id(), config.linter.format);

    let options = ScanOptions {
        selector: config.blocks.to_selector(),
        lint: LintOptions::from(&config.linter),
        parallel: ParallelConfig {
            enabled: !args.no_parallel,
            thread_count: config.linter.threads,
            ..Default::default()
        },
        show_full_path: args.show_full_path,
        project_root: loaded.project_root,
    };
    let writer = OutputWriter::new(args.stderr, args.quiet, args.silent);
    let start = Instant::now();

    if args.stdin {
        let result = stdin_processor::process_stdin(args, &linter, &options)?;
        return report(&result, output_format, config.global.fail_on, &writer, start);
    }

    let files = find_component_files(&args.paths, &config.global, options.project_root.as_deref())
        .context("Failed to discover files")?;
    if files.is_empty() {
        log::warn!("No files found to lint");
        return Ok(exit_codes::SUCCESS);
    }
    log::debug!("Found {} file(s) to lint", files.len());

    let result = scan(&files, &linter, &options);
    report(&result, output_format, config.global.fail_on, &writer, start)
}

/// Print diagnostics and the summary, and compute the exit code.
pub(crate) fn report(
    result: &ScanResult,
    output_format: OutputFormat,
    fail_on: FailOn,
    writer: &OutputWriter,
    start: Instant,
) -> Result<i32> {
    let formatter = output_format.create_formatter();

    let formatted = formatter.format_diagnostics(&result.diagnostics);
    if !formatted.is_empty() {
        writer.writeln(&formatted)?;
    }

    if !output_format.is_machine_readable() {
        let duration_ms = start.elapsed().as_millis() as u64;
        if let Some(summary) = formatter.format_summary(result.files_processed, &result.diagnostics, duration_ms) {
            writer.write_status(&summary)?;
        }
    }

    if result.blocks_skipped > 0 {
        log::warn!("{} block(s) skipped after linter failures", result.blocks_skipped);
    }
    if !result.errors.is_empty() {
        log::warn!("{} file(s) could not be linted", result.errors.len());
    }

    Ok(exit_codes::for_run(
        result.has_tool_errors(),
        fail_on.should_fail(&result.diagnostics),
    ))
}

fn run_init(path: &str) -> Result<i32> {
    init_logging(false, false, false);
    create_default_config(path)?;
    println!("Created default configuration file: {path}");
    Ok(exit_codes::SUCCESS)
}

fn run_tools(config_path: Option<&str>, no_config: bool) -> Result<i32> {
    init_logging(false, false, false);
    let loaded = config::load(config_path, no_config)?;
    let registry = ToolRegistry::new(loaded.config.linter.tools.clone());

    for id in registry.list_tools() {
        let source = match (loaded.config.linter.tools.contains_key(id), ToolRegistry::is_builtin(id)) {
            (true, true) => "custom, overrides built-in",
            (true, false) => "custom",
            _ => "built-in",
        };
        let marker = if id == loaded.config.linter.tool { " (selected)" } else { "" };
        let command = registry.get(id).map(|t| t.command.join(" ")).unwrap_or_default();
        println!("{}{marker} [{source}]\n    {command}", id.bold());
    }

    if !registry.contains(&loaded.config.linter.tool) {
        log::warn!("Configured tool '{}' is not defined", loaded.config.linter.tool);
    }
    Ok(exit_codes::SUCCESS)
}
