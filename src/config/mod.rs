//! Configuration management.
//!
//! Application settings come from an optional TOML file; every value has a default.
//! The export tracker's own JSON file (notebook/journal selection and exported pages)
//! is not handled here but by [`crate::core::state`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use remarkable_dayone::config::{load_settings, ConfiguredPaths, ContainerPaths, PathResolver};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = load_settings("settings.toml", false)?;
//! let paths = ConfiguredPaths::new(ContainerPaths::from_env()?, settings.paths.clone()).resolve()?;
//!
//! println!("reMarkable data: {}", paths.source_sync_root.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Example Settings
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [paths]
//! remarkable_data_dir = "~/rm-backup/desktop"
//!
//! [tools]
//! rmc_bin = "${HOME}/.local/bin/rmc"
//! inkscape_bin = "/opt/homebrew/bin/inkscape"
//! dayone_bin = "/usr/local/bin/dayone"
//!
//! [export]
//! source_tag = "reMarkable"
//! on_injection_failure = "mark_exported"   # or "retry"
//!
//! [logging]
//! local_enabled = true
//! local_path = "~/.local/state/remarkable-dayone/logs"
//! local_rotation = "daily"
//! ```
//!
//! # Environment Variables
//!
//! `${VAR_NAME}` placeholders are substituted before parsing, and any
//! `RMDAYONE_<SECTION>_<KEY>` variable overrides the parsed value.

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::load_settings;
pub use paths::{
    default_settings_path, expand_home, ConfiguredPaths, ContainerPaths, PathResolver,
    ResolvedPaths,
};
pub use schema::{
    AppSettings, ApplicationConfig, ExportConfig, InjectionFailurePolicy, LoggingConfig,
    PathsConfig, ToolsConfig,
};
