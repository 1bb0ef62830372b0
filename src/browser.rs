//! Local browser inspection.

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::debug;

use crate::error::{PrepError, Result};

/// Fixed install locations probed first, in order.
const CHROME_CANDIDATES: &[&str] = &["/usr/bin/google-chrome", "/usr/bin/chromium"];

/// Names tried on `$PATH` when no fixed location matches.
const CHROME_PATH_NAMES: &[&str] = &["google-chrome", "google-chrome-stable", "chromium"];

/// Detects the installed Chrome/Chromium version string.
///
/// Probes the fixed install locations first, then falls back to a `$PATH`
/// lookup. Returns `None` when no browser is present or the probe fails;
/// version detection degrades silently and the URL resolver deals with the
/// absence.
pub async fn detect_chrome_version() -> Option<String> {
    let path = find_chrome_binary()?;
    match version_output(&path).await {
        Ok(version) => {
            debug!(browser = %path.display(), version = %version, "detected browser version");
            Some(version)
        }
        Err(err) => {
            debug!(browser = %path.display(), error = %err, "browser version probe failed");
            None
        }
    }
}

fn find_chrome_binary() -> Option<PathBuf> {
    CHROME_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|path| is_executable_file(path))
        .or_else(|| {
            CHROME_PATH_NAMES
                .iter()
                .find_map(|name| which::which(name).ok())
        })
}

/// Runs the browser with `--version` and returns the trimmed stdout.
async fn version_output(path: &Path) -> Result<String> {
    let output = Command::new(path)
        .arg("--version")
        .output()
        .await
        .map_err(|e| PrepError::CommandExecution {
            command: format!("{} --version", path.display()),
            source: e,
        })?;

    let stdout = String::from_utf8(output.stdout).map_err(|e| PrepError::OutputParsing {
        command: format!("{} --version", path.display()),
        source: e,
    })?;

    Ok(stdout.trim().to_string())
}

/// True if `path` is a regular file with any executable bit set.
pub(crate) fn is_executable_file(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        path.metadata()
            .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        path.is_file()
    }
}
