//! Driver process lifecycle: registry-tracked launch and termination.

use std::fs::File;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;
use crate::drivers::DriverPrep;
use crate::error::{PrepError, Result};

/// One launched driver process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub driver: String,
    pub pid: u32,
    pub started_at_secs: u64,
    pub log_path: PathBuf,
}

/// Process registry persisted as JSON inside the working directory.
///
/// Restart and shutdown operate on recorded pids instead of matching process
/// names, so an unrelated process that happens to share a name is never
/// signalled.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    /// Loads the registry, treating a missing file as empty.
    pub fn load(config: &Config) -> Result<Self> {
        let path = config.registry_path();
        match std::fs::read(&path) {
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|e| PrepError::Registry { path, source: e })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(PrepError::Io { path, source: e }),
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        config.ensure_work_dir()?;
        let path = config.registry_path();
        let bytes = serde_json::to_vec_pretty(self).map_err(|e| PrepError::Registry {
            path: path.clone(),
            source: e,
        })?;
        std::fs::write(&path, bytes).map_err(|e| PrepError::Io { path, source: e })
    }

    pub fn get(&self, driver: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.driver == driver)
    }

    pub fn remove(&mut self, driver: &str) -> Option<RegistryEntry> {
        let pos = self.entries.iter().position(|e| e.driver == driver)?;
        Some(self.entries.remove(pos))
    }

    /// Inserts an entry, replacing any previous record for the same driver.
    pub fn insert(&mut self, entry: RegistryEntry) {
        self.remove(&entry.driver);
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }
}

/// Terminates the registered process for `driver_name`, if any.
///
/// Best-effort: a missing entry, a stale pid, or a process that is already
/// gone all count as success.
pub fn terminate(config: &Config, driver_name: &str) -> Result<()> {
    let mut registry = Registry::load(config)?;
    let Some(entry) = registry.remove(driver_name) else {
        debug!(driver = driver_name, "no registered process to terminate");
        return Ok(());
    };

    if is_process_alive(entry.pid) {
        signal_terminate(entry.pid);
        info!(driver = driver_name, pid = entry.pid, "terminated previous driver process");
    } else {
        debug!(driver = driver_name, pid = entry.pid, "registered process already gone");
    }

    registry.save(config)
}

/// Starts the driver binary detached, with combined output redirected to the
/// per-driver log file, and records the new pid in the registry.
///
/// Any previously registered process for the driver is terminated first.
/// Success means the spawn call succeeded; the child is not health-checked,
/// so a driver that exits right after startup goes unnoticed until the test
/// runner connects.
pub fn launch(driver: &dyn DriverPrep, config: &Config) -> Result<RegistryEntry> {
    terminate(config, driver.driver_name())?;
    config.ensure_work_dir()?;

    let binary_path = config.binary_path(driver.driver_name());
    let log_path = config.log_path(driver.driver_name());

    let log_out = File::create(&log_path).map_err(|e| PrepError::Io {
        path: log_path.clone(),
        source: e,
    })?;
    let log_err = log_out.try_clone().map_err(|e| PrepError::Io {
        path: log_path.clone(),
        source: e,
    })?;

    let mut command = Command::new(&binary_path);
    command
        .args(driver.launch_args())
        .stdin(Stdio::null())
        .stdout(Stdio::from(log_out))
        .stderr(Stdio::from(log_err));

    // New process group, so the driver survives the terminal and this
    // process going away.
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    let child = command.spawn().map_err(|e| PrepError::Launch {
        path: binary_path.clone(),
        source: e,
    })?;

    let entry = RegistryEntry {
        driver: driver.driver_name().to_string(),
        pid: child.id(),
        started_at_secs: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0),
        log_path,
    };

    let mut registry = Registry::load(config)?;
    registry.insert(entry.clone());
    registry.save(config)?;

    info!(
        driver = driver.driver_name(),
        pid = entry.pid,
        log = %entry.log_path.display(),
        "driver launched"
    );
    Ok(entry)
}

/// Check if a process with the given PID is alive.
#[cfg(unix)]
fn is_process_alive(pid: u32) -> bool {
    // POSIX: kill(pid, 0) probes for existence without signalling
    unsafe { libc::kill(pid as libc::pid_t, 0) == 0 }
}

#[cfg(not(unix))]
fn is_process_alive(_pid: u32) -> bool {
    false
}

#[cfg(unix)]
fn signal_terminate(pid: u32) {
    unsafe {
        libc::kill(pid as libc::pid_t, libc::SIGTERM);
    }
}

#[cfg(not(unix))]
fn signal_terminate(_pid: u32) {}
