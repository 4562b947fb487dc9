//! Settings loader with TOML parsing and environment variable overrides

use super::schema::{AppSettings, InjectionFailurePolicy};
use crate::domain::errors::AppError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads application settings
///
/// This function:
/// 1. Reads the TOML file (an absent file at the default location yields defaults)
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into AppSettings
/// 4. Applies environment variable overrides (RMDAYONE_* prefix)
/// 5. Validates the settings
///
/// `required` is true when the user named the file explicitly; a missing file is then
/// an error instead of falling back to defaults.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a referenced environment
/// variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use remarkable_dayone::config::loader::load_settings;
///
/// let settings = load_settings("settings.toml", false).expect("Failed to load settings");
/// ```
pub fn load_settings(path: impl AsRef<Path>, required: bool) -> Result<AppSettings> {
    let path = path.as_ref();

    let mut settings = if path.exists() {
        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::Configuration(format!(
                "Failed to read settings file {}: {}",
                path.display(),
                e
            ))
        })?;
        let contents = substitute_env_vars(&contents)?;
        toml::from_str::<AppSettings>(&contents)
            .map_err(|e| AppError::Configuration(format!("Failed to parse TOML: {}", e)))?
    } else if required {
        return Err(AppError::Configuration(format!(
            "Settings file not found: {}",
            path.display()
        )));
    } else {
        tracing::debug!(path = %path.display(), "No settings file, using defaults");
        AppSettings::default()
    };

    apply_env_overrides(&mut settings)?;

    settings
        .validate()
        .map_err(|e| AppError::Configuration(format!("Settings validation failed: {}", e)))?;

    Ok(settings)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| AppError::Configuration(e.to_string()))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(AppError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the RMDAYONE_* prefix
///
/// Variables follow the pattern RMDAYONE_<SECTION>_<KEY>, for example
/// RMDAYONE_TOOLS_RMC_BIN or RMDAYONE_EXPORT_ON_INJECTION_FAILURE.
fn apply_env_overrides(settings: &mut AppSettings) -> Result<()> {
    if let Ok(val) = std::env::var("RMDAYONE_APPLICATION_LOG_LEVEL") {
        settings.application.log_level = val;
    }

    // Paths
    if let Ok(val) = std::env::var("RMDAYONE_PATHS_REMARKABLE_DATA_DIR") {
        settings.paths.remarkable_data_dir = Some(PathBuf::from(val));
    }
    if let Ok(val) = std::env::var("RMDAYONE_PATHS_DAYONE_DATABASE") {
        settings.paths.dayone_database = Some(PathBuf::from(val));
    }
    if let Ok(val) = std::env::var("RMDAYONE_PATHS_DAYONE_ATTACHMENT_DIR") {
        settings.paths.dayone_attachment_dir = Some(PathBuf::from(val));
    }
    if let Ok(val) = std::env::var("RMDAYONE_PATHS_TRACKER_FILE") {
        settings.paths.tracker_file = Some(PathBuf::from(val));
    }

    // Tools
    if let Ok(val) = std::env::var("RMDAYONE_TOOLS_RMC_BIN") {
        settings.tools.rmc_bin = val;
    }
    if let Ok(val) = std::env::var("RMDAYONE_TOOLS_INKSCAPE_BIN") {
        settings.tools.inkscape_bin = val;
    }
    if let Ok(val) = std::env::var("RMDAYONE_TOOLS_DAYONE_BIN") {
        settings.tools.dayone_bin = val;
    }

    // Export
    if let Ok(val) = std::env::var("RMDAYONE_EXPORT_SOURCE_TAG") {
        settings.export.source_tag = val;
    }
    if let Ok(val) = std::env::var("RMDAYONE_EXPORT_DATE_FORMAT") {
        settings.export.date_format = val;
    }
    if let Ok(val) = std::env::var("RMDAYONE_EXPORT_ON_INJECTION_FAILURE") {
        settings.export.on_injection_failure = match val.to_lowercase().as_str() {
            "mark_exported" => InjectionFailurePolicy::MarkExported,
            "retry" => InjectionFailurePolicy::Retry,
            other => {
                return Err(AppError::Configuration(format!(
                    "Invalid RMDAYONE_EXPORT_ON_INJECTION_FAILURE '{other}'. Must be one of: mark_exported, retry"
                )))
            }
        };
    }

    // Logging
    if let Ok(val) = std::env::var("RMDAYONE_LOGGING_LOCAL_ENABLED") {
        settings.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("RMDAYONE_LOGGING_LOCAL_PATH") {
        settings.logging.local_path = val;
    }

    Ok(())
}
