//! Configuration service implementation.
//!
//! Loads [`DashConfig`] from `config.toml` and caches it. The file location
//! is, in order: an explicit path, the `EDUDASH_CONFIG` environment
//! variable, or the platform config directory. A missing file is created
//! with defaults.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use edudash_core::DashError;
use edudash_core::config::DashConfig;
use edudash_core::error::Result;

use crate::paths::{CONFIG_ENV, DashPaths};
use crate::storage::AtomicTomlFile;

/// Configuration service that loads and caches the dashboard configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    file: AtomicTomlFile<DashConfig>,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<DashConfig>>>,
}

impl ConfigService {
    /// Creates a service for the resolved config location.
    pub fn new(explicit: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_path(explicit, env::var_os(CONFIG_ENV))?;
        Ok(Self::with_path(path))
    }

    /// Creates a service reading a specific file (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Gets the configuration, loading from file if not cached.
    pub fn get_config(&self) -> Result<DashConfig> {
        {
            let read_lock = self.config.read().map_err(poisoned)?;
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load_config()?;

        let mut write_lock = self.config.write().map_err(poisoned)?;
        *write_lock = Some(loaded.clone());
        Ok(loaded)
    }

    /// Writes the configuration and refreshes the cache.
    pub fn save_config(&self, config: &DashConfig) -> Result<()> {
        self.file.save(config)?;
        let mut write_lock = self.config.write().map_err(poisoned)?;
        *write_lock = Some(config.clone());
        tracing::info!("[ConfigService] Saved config to {}", self.path().display());
        Ok(())
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) -> Result<()> {
        let mut write_lock = self.config.write().map_err(poisoned)?;
        *write_lock = None;
        Ok(())
    }

    fn load_config(&self) -> Result<DashConfig> {
        match self.file.load()? {
            Some(config) => {
                tracing::debug!("[ConfigService] Loaded config from {}", self.path().display());
                Ok(config)
            }
            None => {
                let config = DashConfig::default();
                self.file.save(&config)?;
                tracing::info!(
                    "[ConfigService] Created default config at {}",
                    self.path().display()
                );
                Ok(config)
            }
        }
    }

    fn resolve_path(explicit: Option<&Path>, from_env: Option<OsString>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = from_env.filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        DashPaths::new(None)
            .config_file()
            .map_err(|e| DashError::config(e.to_string()))
    }
}

fn poisoned<T>(_: T) -> DashError {
    DashError::internal("config cache lock poisoned")
}
