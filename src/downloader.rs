//! Archive download and extraction into the working directory.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::browser::is_executable_file;
use crate::config::Config;
use crate::drivers::DriverPrep;
use crate::error::{PrepError, Result};

/// Ensures the driver binary is present in the working directory.
///
/// A binary that already exists and is executable short-circuits the whole
/// routine; nothing touches the network. Otherwise the archive is downloaded
/// next to the binary and extracted in place.
pub async fn install(driver: &dyn DriverPrep, config: &Config) -> Result<PathBuf> {
    let binary_path = config.binary_path(driver.driver_name());
    if is_executable_file(&binary_path) {
        info!(binary = %binary_path.display(), "driver already installed, skipping download");
        return Ok(binary_path);
    }

    config.ensure_work_dir()?;

    // --- 1. Resolve the download URL (may need the local browser version).
    let browser_version = driver.browser_version().await;
    let url = driver.download_url(browser_version.as_deref());

    // --- 2. Download the archive into the working directory.
    let archive_path = config.archive_path(driver.archive_name());
    info!(url = %url, archive = %archive_path.display(), "downloading driver archive");
    download_file(&url, &archive_path).await?;

    // --- 3. Extract next to the archive, codec chosen by suffix.
    info!(archive = %archive_path.display(), "extracting driver archive");
    extract_archive(&archive_path, config.work_dir()).await?;

    // --- 4. Settle the extracted executable at the expected path.
    finish_install(config.work_dir(), driver.driver_name(), &binary_path)
}

/// Downloads a file from a given URL and saves it to a destination path.
pub async fn download_file(url: &str, dest_path: &Path) -> Result<()> {
    let response = reqwest::get(url).await?.error_for_status()?;

    let mut dest_file = File::create(dest_path).await.map_err(|e| PrepError::Io {
        path: dest_path.to_path_buf(),
        source: e,
    })?;

    let content = response.bytes().await?;
    dest_file.write_all(&content).await.map_err(|e| PrepError::Io {
        path: dest_path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Extracts an archive into `dest`, picking the codec by filename suffix:
/// `.tgz` (or `.tar.gz`) goes through gzip+tar, `.zip` through the zip reader.
pub async fn extract_archive(archive_path: &Path, dest: &Path) -> Result<()> {
    let name = archive_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    if name.ends_with(".tgz") || name.ends_with(".tar.gz") {
        extract_tgz(archive_path, dest).await
    } else if name.ends_with(".zip") {
        extract_zip(archive_path, dest).await
    } else {
        Err(PrepError::UnsupportedArchive {
            path: archive_path.to_path_buf(),
        })
    }
}

/// Unpacks a gzipped tarball, overwriting existing entries.
///
/// The tar logic is synchronous, so it runs under `spawn_blocking`.
async fn extract_tgz(archive_path: &Path, dest: &Path) -> Result<()> {
    let archive_path = archive_path.to_path_buf();
    let dest = dest.to_path_buf();

    tokio::task::spawn_blocking(move || {
        let file = std::fs::File::open(&archive_path).map_err(|e| PrepError::Io {
            path: archive_path.clone(),
            source: e,
        })?;

        let decoder = flate2::read::GzDecoder::new(file);
        let mut archive = tar::Archive::new(decoder);
        archive.set_overwrite(true);
        archive.unpack(&dest).map_err(|e| PrepError::Io {
            path: archive_path.clone(),
            source: e,
        })
    })
    .await
    .unwrap() // Propagate panics from the blocking task.
}

/// Decompresses a `.zip` archive, overwriting existing entries.
///
/// The core zip logic is synchronous, so it runs under `spawn_blocking`.
async fn extract_zip(archive_path: &Path, dest: &Path) -> Result<()> {
    let archive_path = archive_path.to_path_buf();
    let dest = dest.to_path_buf();

    tokio::task::spawn_blocking(move || {
        let file = std::fs::File::open(&archive_path).map_err(|e| PrepError::Io {
            path: archive_path.clone(),
            source: e,
        })?;

        let mut archive = zip::ZipArchive::new(file).map_err(|e| PrepError::Archive {
            path: archive_path.clone(),
            source: e,
        })?;

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(|e| PrepError::Archive {
                path: archive_path.clone(),
                source: e,
            })?;

            // Entries with unsafe names are skipped rather than trusted.
            let Some(rel) = entry.enclosed_name() else {
                continue;
            };
            let outpath = dest.join(rel);

            if entry.name().ends_with('/') {
                std::fs::create_dir_all(&outpath).map_err(|e| PrepError::Io {
                    path: outpath.clone(),
                    source: e,
                })?;
                continue;
            }

            if let Some(parent) = outpath.parent() {
                std::fs::create_dir_all(parent).map_err(|e| PrepError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }

            let mut outfile = std::fs::File::create(&outpath).map_err(|e| PrepError::Io {
                path: outpath.clone(),
                source: e,
            })?;
            std::io::copy(&mut entry, &mut outfile).map_err(|e| PrepError::Io {
                path: outpath.clone(),
                source: e,
            })?;

            // Preserve executable bits recorded in the archive.
            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))
                    .map_err(|e| PrepError::Io {
                        path: outpath.clone(),
                        source: e,
                    })?;
            }
        }
        Ok(())
    })
    .await
    .unwrap() // Propagate panics from the blocking task.
}

/// Locates the extracted driver executable and settles it at `binary_path`.
///
/// Upstream archives differ: some carry the binary at the archive root, some
/// under a versioned directory. Walk the working directory and move the first
/// match into place, then make sure it is executable.
fn finish_install(work_dir: &Path, driver_name: &str, binary_path: &Path) -> Result<PathBuf> {
    let found = WalkDir::new(work_dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| {
            entry.file_type().is_file()
                && entry.path().file_name().and_then(|n| n.to_str()) == Some(driver_name)
        })
        .map(|entry| entry.into_path())
        .ok_or_else(|| PrepError::BinaryNotFound {
            name: driver_name.to_string(),
            path: work_dir.to_path_buf(),
        })?;

    if found != binary_path {
        std::fs::rename(&found, binary_path).map_err(|e| PrepError::Io {
            path: binary_path.to_path_buf(),
            source: e,
        })?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let metadata = binary_path.metadata().map_err(|e| PrepError::Io {
            path: binary_path.to_path_buf(),
            source: e,
        })?;
        let mut perms = metadata.permissions();
        perms.set_mode(perms.mode() | 0o755);
        std::fs::set_permissions(binary_path, perms).map_err(|e| PrepError::Io {
            path: binary_path.to_path_buf(),
            source: e,
        })?;
    }

    debug!(binary = %binary_path.display(), "driver binary installed");
    Ok(binary_path.to_path_buf())
}
