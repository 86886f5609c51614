//! Path resolution for docsearch configuration files.

use std::path::PathBuf;

const APP_DIR: &str = "docsearch";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// The platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Platform paths for docsearch.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/docsearch/     # Config directory (XDG on Linux, platform default elsewhere)
/// └── config.toml          # Client configuration
/// ```
pub struct DocsearchPaths;

impl DocsearchPaths {
    /// Returns the docsearch configuration directory.
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}
