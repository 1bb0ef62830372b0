//! Filesystem layout for downloads, binaries, logs and the process registry.

use std::path::{Path, PathBuf};

use crate::error::{PrepError, Result};

/// Default working directory, relative to the invocation directory.
pub const DEFAULT_WORK_DIR: &str = "wdctmp";

/// Working-directory configuration, passed explicitly to every component.
#[derive(Debug, Clone)]
pub struct Config {
    work_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from(DEFAULT_WORK_DIR),
        }
    }
}

impl Config {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Creates the working directory if it does not exist yet.
    pub fn ensure_work_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.work_dir).map_err(|e| PrepError::Io {
            path: self.work_dir.clone(),
            source: e,
        })
    }

    /// Where the downloaded archive lands, e.g. `wdctmp/geckodriver.tgz`.
    pub fn archive_path(&self, archive_name: &str) -> PathBuf {
        self.work_dir.join(archive_name)
    }

    /// Where the extracted driver binary lives, e.g. `wdctmp/geckodriver`.
    pub fn binary_path(&self, driver_name: &str) -> PathBuf {
        self.work_dir.join(driver_name)
    }

    /// Per-driver launch log, e.g. `wdctmp/geckodriver.log`.
    pub fn log_path(&self, driver_name: &str) -> PathBuf {
        self.work_dir.join(format!("{driver_name}.log"))
    }

    /// The process registry file.
    pub fn registry_path(&self) -> PathBuf {
        self.work_dir.join("registry.json")
    }
}
