//! CLI interface and argument parsing
//!
//! This module provides the command-line interface using clap.

pub mod commands;

use crate::config::{
    default_settings_path, load_settings, AppSettings, ConfiguredPaths, ContainerPaths,
    PathResolver, ResolvedPaths,
};
use crate::domain::{AppError, Result};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// Exit code for a successful run, page failures included
pub const EXIT_OK: i32 = 0;
/// Exit code for configuration and setup errors
pub const EXIT_CONFIG: i32 = 2;
/// Exit code when the reMarkable sync tree cannot be read
pub const EXIT_CATALOG: i32 = 3;
/// Exit code when the Day One database cannot be opened
pub const EXIT_TARGET_DB: i32 = 4;
/// Exit code for every other fatal error
pub const EXIT_FATAL: i32 = 5;
/// Exit code after a shutdown signal stopped the run
pub const EXIT_INTERRUPTED: i32 = 130;

/// Export handwritten reMarkable pages to Day One
#[derive(Parser, Debug)]
#[command(name = "remarkable-dayone")]
#[command(version, about, long_about = None)]
#[command(group(ArgGroup::new("mode").args(["setup", "dry_run", "status"])))]
pub struct Cli {
    /// Pick a reMarkable notebook and Day One journal interactively
    #[arg(long)]
    pub setup: bool,

    /// Show what would be exported without doing it
    #[arg(long)]
    pub dry_run: bool,

    /// Show the current selection and export progress
    #[arg(long)]
    pub status: bool,

    /// reMarkable desktop data directory
    #[arg(long, value_name = "DIR", env = "RMDAYONE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Path to the settings file
    #[arg(short, long, value_name = "FILE", env = "RMDAYONE_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RMDAYONE_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// What the invocation asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Setup,
    DryRun,
    Status,
    Export,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.setup {
            Mode::Setup
        } else if self.dry_run {
            Mode::DryRun
        } else if self.status {
            Mode::Status
        } else {
            Mode::Export
        }
    }

    /// Load settings from `--settings` or the default location
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Configuration`] if the file is invalid, or missing when it
    /// was named explicitly.
    pub fn load_settings(&self) -> Result<AppSettings> {
        match &self.settings {
            Some(path) => load_settings(path, true),
            None => load_settings(default_settings_path()?, false),
        }
    }
}

/// Settings and resolved locations for one invocation
#[derive(Debug, Clone)]
pub struct RunContext {
    pub settings: AppSettings,
    pub paths: ResolvedPaths,
}

impl RunContext {
    /// Resolve paths: `--data-dir` beats the settings file, which beats the defaults
    pub fn new(cli: &Cli, settings: AppSettings) -> Result<Self> {
        let mut overrides = settings.paths.clone();
        if let Some(dir) = &cli.data_dir {
            overrides.remarkable_data_dir = Some(dir.clone());
        }
        let paths = ConfiguredPaths::new(ContainerPaths::from_env()?, overrides).resolve()?;
        tracing::debug!(?paths, "Resolved paths");
        Ok(Self { settings, paths })
    }
}

/// Map a fatal error to the process exit code
pub fn exit_code_for(error: &AppError) -> i32 {
    match error {
        AppError::Configuration(_) | AppError::Setup(_) => EXIT_CONFIG,
        AppError::CatalogUnavailable(_) => EXIT_CATALOG,
        AppError::TargetDatabase(_) => EXIT_TARGET_DB,
        AppError::Tracker(_) | AppError::Serialization(_) | AppError::Io(_) => EXIT_FATAL,
    }
}
