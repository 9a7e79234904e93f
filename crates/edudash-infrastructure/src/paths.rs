//! Unified path management for edudash files.
//!
//! ```text
//! ~/.config/edudash/           # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/edudash/      # Data directory (file backend)
//! └── collections/
//!     ├── courses.toml
//!     └── faqs.toml
//! ```

use std::path::{Path, PathBuf};

/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV: &str = "EDUDASH_CONFIG";

const APP_DIR: &str = "edudash";

/// Errors that can occur during path resolution.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// Home directory could not be determined.
    #[error("Cannot find home directory")]
    HomeDirNotFound,
}

/// Path resolution rooted either at the platform directories or at an
/// explicit base directory (used by tests and `data_dir` overrides).
#[derive(Debug, Clone, Default)]
pub struct DashPaths {
    base_dir: Option<PathBuf>,
}

impl DashPaths {
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            base_dir: base_dir.map(Path::to_path_buf),
        }
    }

    /// Returns the edudash configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base_dir {
            return Ok(base.clone());
        }
        dirs::config_dir()
            .map(|p| p.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the edudash data directory.
    pub fn data_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base_dir {
            return Ok(base.clone());
        }
        dirs::data_dir()
            .map(|p| p.join(APP_DIR))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Directory holding one TOML file per collection.
    pub fn collections_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.data_dir()?.join("collections"))
    }
}
