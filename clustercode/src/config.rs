//! Worker configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `CC_*` environment variables (a `.env` file is honoured by the binary),
//! and finally command-line flags applied by the caller.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::scan::marker_path;
use crate::utils::filename::extension_lowercase;
use crate::{Error, Result};

pub const ENV_INPUT_DIR: &str = "CC_INPUT_DIR";
pub const ENV_ALLOWED_EXTENSIONS: &str = "CC_ALLOWED_EXTENSIONS";
pub const ENV_SKIP_EXTENSION: &str = "CC_SKIP_EXTENSION";
pub const ENV_OUTPUT_DIR: &str = "CC_OUTPUT_DIR";
pub const ENV_OVERWRITE_FILES: &str = "CC_OVERWRITE_FILES";
pub const ENV_CLEANUP_STRATEGIES: &str = "CC_CLEANUP_STRATEGIES";
pub const ENV_LOG_LEVEL: &str = "CC_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "CC_LOG_FORMAT";
pub const ENV_LOG_DIR: &str = "CC_LOG_DIR";

/// Default completion-marker suffix.
pub const DEFAULT_SKIP_EXTENSION: &str = ".done";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scan: ScanConfig,
    pub cleanup: CleanupConfig,
    pub log: LogConfig,
}

/// Settings consumed by the priority scanner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Root of the priority-partitioned input tree.
    pub base_input_dir: PathBuf,
    /// Extension whitelist, lowercase without the leading dot.
    pub allowed_extensions: Vec<String>,
    /// Suffix appended to a candidate path to mark it as done.
    pub skip_extension: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            base_input_dir: PathBuf::from("input"),
            allowed_extensions: vec!["mkv".to_string(), "mp4".to_string(), "avi".to_string()],
            skip_extension: DEFAULT_SKIP_EXTENSION.to_string(),
        }
    }
}

impl ScanConfig {
    /// Whether a lowercased extension is whitelisted.
    pub fn is_allowed(&self, extension: &str) -> bool {
        self.allowed_extensions.iter().any(|e| e == extension)
    }
}

/// Cleanup stages, run in the configured order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupStrategy {
    /// Mirror the input structure (minus the lane) under the output root.
    StructuredOutput,
    /// Move the output flat into the output root.
    UnifiedOutput,
    /// Write the completion marker next to the source.
    MarkSource,
    /// Delete the source file from the input tree.
    DeleteSource,
}

impl CleanupStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StructuredOutput => "structured_output",
            Self::UnifiedOutput => "unified_output",
            Self::MarkSource => "mark_source",
            Self::DeleteSource => "delete_source",
        }
    }
}

impl FromStr for CleanupStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "structured_output" => Ok(Self::StructuredOutput),
            "unified_output" => Ok(Self::UnifiedOutput),
            "mark_source" => Ok(Self::MarkSource),
            "delete_source" => Ok(Self::DeleteSource),
            other => Err(Error::config(format!("unknown cleanup strategy '{other}'"))),
        }
    }
}

/// Settings for the cleanup pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Root of the output tree.
    pub base_output_dir: PathBuf,
    /// Replace existing files instead of writing a timestamped alternative.
    pub overwrite_files: bool,
    pub strategies: Vec<CleanupStrategy>,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            base_output_dir: PathBuf::from("output"),
            overwrite_files: false,
            strategies: vec![CleanupStrategy::StructuredOutput],
        }
    }
}

/// Console log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "plain" | "text" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            other => Err(Error::config(format!("unknown log format '{other}'"))),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Level directive for this crate's targets (e.g. `info`, `debug`).
    pub level: String,
    pub format: LogFormat,
    /// Directory for daily-rotated log files; console only when unset.
    pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Plain,
            dir: None,
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(Error::config(format!("{key}: '{other}' is not a boolean"))),
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|s| !s.is_empty())
}

impl AppConfig {
    /// Load defaults, the optional TOML file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        config.apply_env(std::env::vars())?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Reading config file");
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("invalid config file: {e}")))
    }

    /// Apply `CC_*` overrides from the given variables. Unknown keys are ignored.
    pub fn apply_env<I, K, V>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                ENV_INPUT_DIR => self.scan.base_input_dir = PathBuf::from(value),
                ENV_ALLOWED_EXTENSIONS => {
                    self.scan.allowed_extensions = split_list(value).map(String::from).collect()
                }
                ENV_SKIP_EXTENSION => self.scan.skip_extension = value.to_string(),
                ENV_OUTPUT_DIR => self.cleanup.base_output_dir = PathBuf::from(value),
                ENV_OVERWRITE_FILES => self.cleanup.overwrite_files = parse_bool(key, value)?,
                ENV_CLEANUP_STRATEGIES => {
                    self.cleanup.strategies = split_list(value)
                        .map(CleanupStrategy::from_str)
                        .collect::<Result<_>>()?
                }
                ENV_LOG_LEVEL => self.log.level = value.to_string(),
                ENV_LOG_FORMAT => self.log.format = value.parse()?,
                ENV_LOG_DIR => self.log.dir = Some(PathBuf::from(value)),
                _ => continue,
            }
            debug!(key, "Applied environment override");
        }
        Ok(())
    }

    /// Lowercase extensions and strip leading dots.
    pub fn normalize(&mut self) {
        self.scan.allowed_extensions = self
            .scan
            .allowed_extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
    }

    pub fn validate(&self) -> Result<()> {
        if self.scan.skip_extension.is_empty() {
            return Err(Error::config("scan.skip_extension must not be empty"));
        }
        // A marker must never look like a candidate itself.
        for ext in &self.scan.allowed_extensions {
            let marker = marker_path(Path::new(&format!("file.{ext}")), &self.scan.skip_extension);
            if extension_lowercase(&marker).is_some_and(|m| self.scan.is_allowed(&m)) {
                return Err(Error::config(format!(
                    "scan.skip_extension '{}' turns '{ext}' files into markers with a whitelisted extension",
                    self.scan.skip_extension
                )));
            }
        }
        if self.cleanup.strategies.is_empty() {
            return Err(Error::config("cleanup.strategies must not be empty"));
        }
        for (i, strategy) in self.cleanup.strategies.iter().enumerate() {
            if self.cleanup.strategies[..i].contains(strategy) {
                return Err(Error::config(format!(
                    "cleanup strategy '{}' is listed twice",
                    strategy.as_str()
                )));
            }
        }
        if self.scan.allowed_extensions.is_empty() {
            tracing::warn!("No allowed extensions configured, scans will find nothing");
        }
        Ok(())
    }
}
