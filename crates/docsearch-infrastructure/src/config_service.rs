//! Configuration service implementation.
//!
//! Loads the root configuration from `~/.config/docsearch/config.toml`
//! (or an explicit path) and applies environment overrides on top.

use crate::paths::DocsearchPaths;
use docsearch_core::config::RootConfig;
use docsearch_core::{DocsearchError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Overrides `server.base_url`.
pub const ENV_BASE_URL: &str = "DOCSEARCH_BASE_URL";
/// Overrides `server.request_timeout_secs`. `0` disables the timeout.
pub const ENV_TIMEOUT_SECS: &str = "DOCSEARCH_TIMEOUT_SECS";

/// Configuration service that loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    /// Explicit config file; `None` resolves the platform default
    path: Option<PathBuf>,
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the platform default config file.
    pub fn new() -> Self {
        Self {
            path: None,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a service reading `path` instead of the default location.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Path of the config file this service reads.
    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => DocsearchPaths::config_file().map_err(|e| DocsearchError::config(e.to_string())),
        }
    }

    /// Gets the root configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<RootConfig> {
        {
            let cached = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let path = self.config_path()?;
        let mut loaded = load_config(&path)?;
        apply_env_overrides(&mut loaded, |key| std::env::var(key).ok());

        let mut cache = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *cache = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut cache = self.config.write().unwrap_or_else(PoisonError::into_inner);
        *cache = None;
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads `path` as TOML. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<RootConfig> {
    if !path.exists() {
        tracing::debug!(
            "[ConfigService] {} not found, using defaults",
            path.display()
        );
        return Ok(RootConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: RootConfig = toml::from_str(&content)?;
    tracing::debug!("[ConfigService] loaded {}", path.display());
    Ok(config)
}

/// Applies environment overrides read through `lookup`.
pub fn apply_env_overrides<F>(config: &mut RootConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_BASE_URL).filter(|url| !url.trim().is_empty()) {
        config.server.base_url = url.trim().to_string();
    }

    if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
        match raw.trim().parse::<u64>() {
            Ok(0) => config.server.request_timeout_secs = None,
            Ok(secs) => config.server.request_timeout_secs = Some(secs),
            Err(_) => tracing::warn!(
                "[ConfigService] ignoring {}={:?}: not a number of seconds",
                ENV_TIMEOUT_SECS,
                raw
            ),
        }
    }
}
