//! Path resolution
//!
//! The reMarkable and Day One locations follow macOS application-container
//! conventions. Core logic only sees [`ResolvedPaths`]; where they come from is the
//! business of a [`PathResolver`].

use super::schema::PathsConfig;
use crate::domain::{AppError, Result};
use std::path::{Path, PathBuf};

const REMARKABLE_DATA_DIR: &str =
    "Library/Containers/com.remarkable.desktop/Data/Library/Application Support/remarkable/desktop";
const DAYONE_DOCUMENTS_DIR: &str = "Library/Group Containers/5U8NS4GX82.dayoneapp2/Data/Documents";
const DAYONE_DATABASE_FILE: &str = "DayOne.sqlite";
const DAYONE_PHOTOS_DIR: &str = "DayOnePhotos";
const APP_CONFIG_DIR: &str = "remarkable-dayone";
const LEGACY_APP_CONFIG_DIR: &str = "deardayone";
const TRACKER_FILE: &str = "config.json";
const SETTINGS_FILE: &str = "settings.toml";

/// Supplies the filesystem locations the exporter works with
pub trait PathResolver {
    /// reMarkable desktop sync tree
    fn source_sync_root(&self) -> Result<PathBuf>;

    /// Day One SQLite database
    fn target_database(&self) -> Result<PathBuf>;

    /// Directory holding Day One photo attachments
    fn target_attachment_dir(&self) -> Result<PathBuf>;

    /// Export tracker JSON file
    fn tracker_path(&self) -> Result<PathBuf>;

    /// Resolve all locations at once
    fn resolve(&self) -> Result<ResolvedPaths> {
        Ok(ResolvedPaths {
            source_sync_root: self.source_sync_root()?,
            target_database: self.target_database()?,
            target_attachment_dir: self.target_attachment_dir()?,
            tracker_path: self.tracker_path()?,
        })
    }
}

/// Concrete locations for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub source_sync_root: PathBuf,
    pub target_database: PathBuf,
    pub target_attachment_dir: PathBuf,
    pub tracker_path: PathBuf,
}

/// Default macOS container layout under the user's home directory
#[derive(Debug, Clone)]
pub struct ContainerPaths {
    home: PathBuf,
    config_dir: PathBuf,
}

impl ContainerPaths {
    /// Layout rooted at the current user's home and config directories
    pub fn from_env() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            AppError::Configuration("Could not determine the home directory".to_string())
        })?;
        let config_dir = home.join(".config");
        Ok(Self { home, config_dir })
    }

    /// Layout rooted at explicit directories
    pub fn with_roots(home: impl Into<PathBuf>, config_dir: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            config_dir: config_dir.into(),
        }
    }
}

impl PathResolver for ContainerPaths {
    fn source_sync_root(&self) -> Result<PathBuf> {
        Ok(self.home.join(REMARKABLE_DATA_DIR))
    }

    fn target_database(&self) -> Result<PathBuf> {
        Ok(self
            .home
            .join(DAYONE_DOCUMENTS_DIR)
            .join(DAYONE_DATABASE_FILE))
    }

    fn target_attachment_dir(&self) -> Result<PathBuf> {
        Ok(self.home.join(DAYONE_DOCUMENTS_DIR).join(DAYONE_PHOTOS_DIR))
    }

    /// Falls back to the `deardayone` tracker while no new one exists
    fn tracker_path(&self) -> Result<PathBuf> {
        let current = self.config_dir.join(APP_CONFIG_DIR).join(TRACKER_FILE);
        let legacy = self.config_dir.join(LEGACY_APP_CONFIG_DIR).join(TRACKER_FILE);
        if !current.exists() && legacy.is_file() {
            tracing::debug!(path = %legacy.display(), "Using legacy tracker file");
            return Ok(legacy);
        }
        Ok(current)
    }
}

/// Settings-file overrides layered on top of another resolver
pub struct ConfiguredPaths<R> {
    base: R,
    overrides: PathsConfig,
}

impl<R: PathResolver> ConfiguredPaths<R> {
    pub fn new(base: R, overrides: PathsConfig) -> Self {
        Self { base, overrides }
    }
}

impl<R: PathResolver> PathResolver for ConfiguredPaths<R> {
    fn source_sync_root(&self) -> Result<PathBuf> {
        match &self.overrides.remarkable_data_dir {
            Some(p) => Ok(expand_home(p)),
            None => self.base.source_sync_root(),
        }
    }

    fn target_database(&self) -> Result<PathBuf> {
        match &self.overrides.dayone_database {
            Some(p) => Ok(expand_home(p)),
            None => self.base.target_database(),
        }
    }

    fn target_attachment_dir(&self) -> Result<PathBuf> {
        match &self.overrides.dayone_attachment_dir {
            Some(p) => Ok(expand_home(p)),
            None => self.base.target_attachment_dir(),
        }
    }

    fn tracker_path(&self) -> Result<PathBuf> {
        match &self.overrides.tracker_file {
            Some(p) => Ok(expand_home(p)),
            None => self.base.tracker_path(),
        }
    }
}

/// Default settings file location
pub fn default_settings_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| {
        AppError::Configuration("Could not determine the home directory".to_string())
    })?;
    Ok(home.join(".config").join(APP_CONFIG_DIR).join(SETTINGS_FILE))
}

/// Expand a leading `~/` to the home directory
pub fn expand_home(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path.to_path_buf()
}
