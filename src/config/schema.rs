//! Configuration schema types
//!
//! Application settings read from the optional TOML settings file. Every section and
//! field has a default so an absent file yields a working configuration.

use chrono::format::{Item, StrftimeItems};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root settings structure mapping to the TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppSettings {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Filesystem location overrides
    #[serde(default)]
    pub paths: PathsConfig,

    /// External tool locations
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Export behaviour
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppSettings {
    /// Validates the settings
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.tools.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Optional overrides for the platform path conventions
///
/// Unset fields fall back to the default [`crate::config::PathResolver`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// reMarkable desktop sync directory
    #[serde(default)]
    pub remarkable_data_dir: Option<PathBuf>,

    /// Day One SQLite database
    #[serde(default)]
    pub dayone_database: Option<PathBuf>,

    /// Directory Day One reads photo attachments from
    #[serde(default)]
    pub dayone_attachment_dir: Option<PathBuf>,

    /// Export tracker JSON file
    #[serde(default)]
    pub tracker_file: Option<PathBuf>,
}

/// External tool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// `rmc` binary (`.rm` to SVG); a leading `~/` is expanded
    #[serde(default = "default_rmc_bin")]
    pub rmc_bin: String,

    /// Inkscape binary (SVG to PNG)
    #[serde(default = "default_inkscape_bin")]
    pub inkscape_bin: String,

    /// Day One CLI binary
    #[serde(default = "default_dayone_bin")]
    pub dayone_bin: String,

    /// Regex matched against `rmc` stderr to recognise the highlighter defect
    #[serde(default = "default_unsupported_stroke_pattern")]
    pub unsupported_stroke_pattern: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            rmc_bin: default_rmc_bin(),
            inkscape_bin: default_inkscape_bin(),
            dayone_bin: default_dayone_bin(),
            unsupported_stroke_pattern: default_unsupported_stroke_pattern(),
        }
    }
}

impl ToolsConfig {
    fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("rmc_bin", &self.rmc_bin),
            ("inkscape_bin", &self.inkscape_bin),
            ("dayone_bin", &self.dayone_bin),
        ] {
            if value.trim().is_empty() {
                return Err(format!("tools.{name} cannot be empty"));
            }
        }
        Regex::new(&self.unsupported_stroke_pattern).map_err(|e| {
            format!("Invalid tools.unsupported_stroke_pattern: {e}")
        })?;
        Ok(())
    }
}

/// What to do with a page whose entry was created but whose image could not be placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionFailurePolicy {
    /// Record the page as exported; the entry keeps a broken attachment
    #[default]
    MarkExported,
    /// Leave the page unrecorded; the next run creates another entry for it
    Retry,
}

/// Export behaviour configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Tag naming the source application, added to every entry
    #[serde(default = "default_source_tag")]
    pub source_tag: String,

    /// Policy for pages whose attachment injection failed
    #[serde(default)]
    pub on_injection_failure: InjectionFailurePolicy,

    /// chrono format for the `--date` argument, rendered in local time
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            source_tag: default_source_tag(),
            on_injection_failure: InjectionFailurePolicy::default(),
            date_format: default_date_format(),
        }
    }
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.source_tag.trim().is_empty() {
            return Err("export.source_tag cannot be empty".to_string());
        }
        if self.date_format.trim().is_empty() {
            return Err("export.date_format cannot be empty".to_string());
        }
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(format!(
                "Invalid export.date_format '{}'",
                self.date_format
            ));
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path is required when local_enabled = true".to_string());
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_rmc_bin() -> String {
    "~/.local/bin/rmc".to_string()
}

fn default_inkscape_bin() -> String {
    "/opt/homebrew/bin/inkscape".to_string()
}

fn default_dayone_bin() -> String {
    "/usr/local/bin/dayone".to_string()
}

// rmc has no colour mapping for the highlighter pen (PenColor 9)
fn default_unsupported_stroke_pattern() -> String {
    r"(?i)(PenColor\.HIGHLIGHT|KeyError:\s*<?PenColor|KeyError:\s*9\b|highlighter)".to_string()
}

fn default_source_tag() -> String {
    "reMarkable".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

fn default_local_path() -> String {
    "~/.local/state/remarkable-dayone/logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
