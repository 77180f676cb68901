//! Path management for costroll
//!
//! ## Path Resolution Order
//!
//! 1. `COSTROLL_CONFIG_DIR` environment variable (if set)
//! 2. The platform config directory for `costroll`
//!    (`~/.config/costroll` on Linux, `%APPDATA%\costroll\config` on Windows)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::CostrollError;

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "COSTROLL_CONFIG_DIR";

/// Locates the files costroll reads and writes
#[derive(Debug, Clone)]
pub struct CostrollPaths {
    base_dir: PathBuf,
}

impl CostrollPaths {
    /// Resolve the config directory from the environment or the platform
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, CostrollError> {
        let base_dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create CostrollPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure the config directory exists
    pub fn ensure_directories(&self) -> Result<(), CostrollError> {
        std::fs::create_dir_all(&self.base_dir).map_err(|e| {
            CostrollError::Io(format!("Failed to create config directory: {}", e))
        })
    }

    /// Whether a settings file has been written
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, CostrollError> {
    ProjectDirs::from("", "", "costroll")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| CostrollError::Config("Could not determine a config directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CostrollPaths::with_base_dir(temp_dir.path());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();

        env::set_var(CONFIG_DIR_ENV, temp_dir.path());
        let paths = CostrollPaths::new().unwrap();
        env::remove_var(CONFIG_DIR_ENV);

        assert_eq!(paths.base_dir(), temp_dir.path());
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = CostrollPaths::with_base_dir(temp_dir.path().join("nested").join("costroll"));

        paths.ensure_directories().unwrap();
        assert!(paths.base_dir().is_dir());
    }
}
