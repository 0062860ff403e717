//! Configuration loading for vuestyle.
//!
//! Configuration lives in `.vuestyle.toml` or `vuestyle.toml`. The file is
//! found by walking up from the working directory until a `.git` directory or
//! the filesystem root is reached.

use crate::diagnostic::{Diagnostic, Severity};
use crate::extractor::BlockSelector;
use crate::style_tools::LinterConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// File names searched for during discovery, in order of precedence.
pub const CONFIG_FILES: &[&str] = &[".vuestyle.toml", "vuestyle.toml"];

/// Environment variable overriding the configured output format.
pub const OUTPUT_FORMAT_ENV: &str = "VUESTYLE_OUTPUT_FORMAT";

const MAX_DEPTH: usize = 100;

/// Represents errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file at {path}: {source}")]
    IoError { source: io::Error, path: String },

    /// Failed to parse the TOML content
    #[error("Failed to parse config file at {path}: {message}")]
    ParseError { path: String, message: String },

    /// A value is syntactically valid but not usable
    #[error("Invalid configuration: {0}")]
    InvalidValue(String),
}

/// Which severities make the run exit with code 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailOn {
    /// Any diagnostic
    #[default]
    Any,
    /// Warnings and errors
    Warning,
    /// Errors only
    Error,
    /// Always exit 0 on diagnostics
    Never,
}

impl FailOn {
    pub fn should_fail(&self, diagnostics: &[Diagnostic]) -> bool {
        match self {
            FailOn::Any => !diagnostics.is_empty(),
            FailOn::Warning => diagnostics.iter().any(|d| d.severity >= Severity::Warning),
            FailOn::Error => diagnostics.iter().any(|d| d.severity == Severity::Error),
            FailOn::Never => false,
        }
    }
}

impl FromStr for FailOn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "any" => Ok(FailOn::Any),
            "warning" => Ok(FailOn::Warning),
            "error" => Ok(FailOn::Error),
            "never" => Ok(FailOn::Never),
            _ => Err(format!("Invalid fail-on value: {s}. Valid values: any, warning, error, never")),
        }
    }
}

/// `[global]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct GlobalConfig {
    /// Glob patterns of files or directories to skip
    pub exclude: Vec<String>,

    /// File extensions treated as component files
    pub extensions: Vec<String>,

    /// Respect .gitignore files when scanning directories
    pub respect_gitignore: bool,

    /// Output format for diagnostics
    pub output_format: Option<String>,

    /// Severities that make the run fail
    pub fail_on: FailOn,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            extensions: vec!["vue".to_string()],
            respect_gitignore: true,
            output_format: None,
            fail_on: FailOn::default(),
        }
    }
}

/// `[blocks]` section: which elements hold style code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct BlocksConfig {
    pub element: String,
    pub attribute: String,
    /// Required attribute value; an empty string only requires the attribute
    pub value: String,
}

impl Default for BlocksConfig {
    fn default() -> Self {
        Self {
            element: "style".to_string(),
            attribute: "lang".to_string(),
            value: "scss".to_string(),
        }
    }
}

impl BlocksConfig {
    pub fn to_selector(&self) -> BlockSelector {
        let value = (!self.value.is_empty()).then(|| self.value.clone());
        BlockSelector::new(self.element.clone(), self.attribute.clone(), value)
    }
}

/// Complete configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub global: GlobalConfig,
    pub blocks: BlocksConfig,
    pub linter: LinterConfig,
}

impl Config {
    /// Parse configuration from TOML text. `path` is only used in error messages.
    pub fn from_toml_str(content: &str, path: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            source,
            path: path.display().to_string(),
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.blocks.element.trim().is_empty() {
            return Err(ConfigError::InvalidValue("blocks.element must not be empty".to_string()));
        }
        if self.blocks.attribute.trim().is_empty() {
            return Err(ConfigError::InvalidValue("blocks.attribute must not be empty".to_string()));
        }
        if self.global.extensions.is_empty() {
            return Err(ConfigError::InvalidValue("global.extensions must not be empty".to_string()));
        }
        if self.linter.threads == Some(0) {
            return Err(ConfigError::InvalidValue("linter.threads must be at least 1".to_string()));
        }
        for (id, tool) in &self.linter.tools {
            if tool.command.is_empty() {
                return Err(ConfigError::InvalidValue(format!("linter.tools.{id}.command must not be empty")));
            }
        }
        Ok(())
    }
}

/// A loaded configuration together with where it came from.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the configuration was read from, if any
    pub path: Option<PathBuf>,
    /// Directory exclude patterns are matched against
    pub project_root: Option<PathBuf>,
}

/// Load configuration.
///
/// An explicit `config_path` must exist. Without one, discovery walks upward
/// from the working directory unless `no_config` is set. Nothing found means
/// defaults.
pub fn load(config_path: Option<&str>, no_config: bool) -> Result<LoadedConfig, ConfigError> {
    if let Some(path) = config_path {
        let path = PathBuf::from(path);
        let config = Config::from_file(&path)?;
        log::debug!("Loaded config from {}", path.display());
        let project_root = path
            .parent()
            .map(|dir| if dir.as_os_str().is_empty() { Path::new(".") } else { dir })
            .map(find_project_root_from);
        return Ok(LoadedConfig {
            config,
            path: Some(path),
            project_root,
        });
    }

    if no_config {
        log::debug!("Config discovery disabled");
        return Ok(LoadedConfig::default());
    }

    let start_dir = std::env::current_dir().map_err(|source| ConfigError::IoError {
        source,
        path: ".".to_string(),
    })?;

    match discover_config_upward(&start_dir) {
        Some((path, dir)) => {
            let config = Config::from_file(&path)?;
            log::debug!("Loaded config from {}", path.display());
            Ok(LoadedConfig {
                config,
                path: Some(path),
                project_root: Some(find_project_root_from(&dir)),
            })
        }
        None => {
            log::debug!("No config file found, using defaults");
            Ok(LoadedConfig::default())
        }
    }
}

/// Walk up from `start_dir` looking for a config file.
///
/// Returns the config path and the directory it was found in. The search stops
/// after the directory containing `.git`.
pub fn discover_config_upward(start_dir: &Path) -> Option<(PathBuf, PathBuf)> {
    let mut current_dir = start_dir.to_path_buf();

    for _ in 0..MAX_DEPTH {
        log::debug!("Searching for config in: {}", current_dir.display());

        for name in CONFIG_FILES {
            let candidate = current_dir.join(name);
            if candidate.is_file() {
                log::debug!("Found config file: {}", candidate.display());
                return Some((candidate, current_dir));
            }
        }

        if current_dir.join(".git").exists() {
            log::debug!("Stopping at .git directory");
            return None;
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return None,
        }
    }

    None
}

/// The nearest ancestor of `dir` containing `.git`, or `dir` itself.
fn find_project_root_from(dir: &Path) -> PathBuf {
    let mut current = dir.to_path_buf();
    for _ in 0..MAX_DEPTH {
        if current.join(".git").exists() {
            return current;
        }
        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }
    dir.to_path_buf()
}
