//! Configuration management for the roster checker.
//!
//! Handles:
//! - Command-line argument parsing
//! - Project configuration (`.roster.toml`)
//! - Format directory discovery and format selection

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::format::{DEFAULT_FORMAT, FormatPriority, FormatRegistry};

/// File name of the project configuration
pub const PROJECT_CONFIG_FILE: &str = ".roster.toml";

/// Command-line arguments for the roster checker
#[derive(Debug, Parser)]
#[command(name = "roster-check")]
#[command(about = "Check cricket team selections against squad composition rules")]
#[command(version)]
pub struct Args {
    /// Explicitly specify the squad format to use
    #[arg(long, global = true, help = "Squad format to use (e.g., 't20', 'odi')")]
    pub format: Option<String>,

    /// Custom format directory to search for format files
    #[arg(long, global = true, help = "Directory containing format TOML files")]
    pub format_dir: Option<PathBuf>,

    /// Log level
    #[arg(
        long,
        global = true,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Validate a selection of player ids
    Validate {
        /// Player catalog JSON file
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Comma-separated player ids
        #[arg(long, value_delimiter = ',', required = true)]
        players: Vec<i64>,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },

    /// List players from the catalog
    Players {
        /// Player catalog JSON file
        #[arg(long)]
        catalog: Option<PathBuf>,

        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        role: Option<String>,

        /// Case-insensitive name search
        #[arg(long)]
        search: Option<String>,
    },

    /// List available squad formats
    Formats,
}

/// Contents of `.roster.toml`
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ProjectConfig {
    pub format: Option<String>,
    pub catalog: Option<PathBuf>,
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Format name explicitly set via command line
    pub cli_format: Option<String>,
    /// Format name from the project configuration
    pub project_format: Option<String>,
    /// Catalog path from the project configuration, resolved against its directory
    pub project_catalog: Option<PathBuf>,
    /// Location of the project configuration, when one was found
    pub project_config_path: Option<PathBuf>,
    /// Format directories in loading order
    pub format_dirs: Vec<(PathBuf, FormatPriority)>,
    /// Log level
    pub log_level: String,
}

impl Config {
    /// Create configuration from command-line arguments and the current directory
    pub fn from_args_and_env() -> Result<(Self, Command)> {
        let args = Args::parse();
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        let command = args.command.clone();
        Ok((Self::from_args_in(args, &cwd)?, command))
    }

    /// Create configuration from explicit arguments, searching for the
    /// project configuration from `start_dir` upward
    pub fn from_args_in(args: Args, start_dir: &Path) -> Result<Self> {
        let mut format_dirs = Vec::new();

        if let Some(config_dir) = dirs::config_dir() {
            format_dirs.push((
                config_dir.join("roster-check").join("formats"),
                FormatPriority::UserGlobal,
            ));
        }

        let mut config = Config {
            cli_format: args.format,
            project_format: None,
            project_catalog: None,
            project_config_path: None,
            format_dirs,
            log_level: args.log_level,
        };

        if let Some(path) = find_project_config(start_dir) {
            let project = load_project_config(&path)?;
            let root = path.parent().map(Path::to_path_buf).unwrap_or_default();

            config
                .format_dirs
                .push((root.join(".roster").join("formats"), FormatPriority::Workspace));
            config.project_format = project.format;
            config.project_catalog = project.catalog.map(|c| root.join(c));
            config.project_config_path = Some(path);
        }

        if let Some(custom_dir) = args.format_dir {
            config
                .format_dirs
                .push((custom_dir, FormatPriority::Workspace));
        }

        Ok(config)
    }

    pub fn has_project_config(&self) -> bool {
        self.project_config_path.is_some()
    }

    /// Format name by priority: CLI > project config > built-in default
    pub fn effective_format(&self) -> String {
        self.cli_format
            .clone()
            .or_else(|| self.project_format.clone())
            .unwrap_or_else(|| DEFAULT_FORMAT.to_string())
    }

    /// Catalog path by priority: CLI > project config
    pub fn catalog_path(&self, cli_catalog: Option<PathBuf>) -> Option<PathBuf> {
        cli_catalog.or_else(|| self.project_catalog.clone())
    }

    /// Build the format registry and activate the effective format.
    ///
    /// An unknown format named on the command line is an error; an unknown
    /// project format falls back to the default with a warning.
    pub fn build_registry(&self) -> Result<FormatRegistry> {
        let mut registry = FormatRegistry::with_builtin_formats();
        for (dir, priority) in &self.format_dirs {
            registry.load_from_directory(dir, *priority);
        }

        if let Some(cli_format) = &self.cli_format {
            if !registry.set_active_format(cli_format) {
                bail!(
                    "Unknown format '{}'. Available formats: {}",
                    cli_format,
                    registry.list_formats().join(", ")
                );
            }
            return Ok(registry);
        }

        if let Some(project_format) = &self.project_format {
            if !registry.set_active_format(project_format) {
                let config_path = self
                    .project_config_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| PROJECT_CONFIG_FILE.to_string());
                log::warn!(
                    "Project format '{}' from {} not found, falling back to '{}'",
                    project_format,
                    config_path,
                    DEFAULT_FORMAT
                );
                registry.set_active_format(DEFAULT_FORMAT);
            }
        }

        Ok(registry)
    }
}

/// Walk from `start` up to the filesystem root looking for `.roster.toml`
pub fn find_project_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PROJECT_CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}

pub fn load_project_config(path: &Path) -> Result<ProjectConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ProjectConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}
