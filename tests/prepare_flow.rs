use std::path::PathBuf;

use async_trait::async_trait;
use wdprep::drivers::UNRESOLVED_URL;
use wdprep::{Config, DriverPrep, PrepError, commands, downloader, launcher};

/// Test driver whose URL never resolves; any download attempt fails fast.
struct StubDriver;

#[async_trait]
impl DriverPrep for StubDriver {
    fn driver_name(&self) -> &str {
        "stubdriver"
    }

    fn archive_name(&self) -> &str {
        "stubdriver.tgz"
    }

    fn launch_args(&self) -> &[&str] {
        &[]
    }

    async fn browser_version(&self) -> Option<String> {
        None
    }

    fn download_url(&self, _browser_version: Option<&str>) -> String {
        UNRESOLVED_URL.to_string()
    }
}

#[cfg(unix)]
fn write_executable(path: &PathBuf, content: &[u8]) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::write(path, content).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

/// An already-installed binary short-circuits install. The stub's URL is the
/// unresolvable sentinel, so reaching the network would fail the test.
#[cfg(unix)]
#[tokio::test]
async fn install_skips_download_when_binary_is_present() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::new(dir.path());
    config.ensure_work_dir().unwrap();

    let binary = config.binary_path(StubDriver.driver_name());
    write_executable(&binary, b"#!/bin/sh\nexit 0\n");

    let installed = downloader::install(&StubDriver, &config).await.unwrap();
    assert_eq!(installed, binary);
}

#[tokio::test]
async fn install_fails_fast_when_no_url_resolves() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::new(dir.path());

    let err = downloader::install(&StubDriver, &config).await.unwrap_err();
    assert!(matches!(err, PrepError::Download(_)));
}

#[cfg(unix)]
#[tokio::test]
async fn tgz_archive_extracts_by_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let archive_path = dir.path().join("geckodriver.tgz");

    // Build a minimal gzipped tarball holding the driver "binary".
    let file = std::fs::File::create(&archive_path).unwrap();
    let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    let payload = b"#!/bin/sh\nexit 0\n";
    let mut header = tar::Header::new_gnu();
    header.set_size(payload.len() as u64);
    header.set_mode(0o755);
    header.set_cksum();
    builder
        .append_data(&mut header, "geckodriver", payload.as_slice())
        .unwrap();
    builder.into_inner().unwrap().finish().unwrap();

    downloader::extract_archive(&archive_path, dir.path())
        .await
        .unwrap();

    let extracted = dir.path().join("geckodriver");
    assert!(extracted.is_file());
}

#[cfg(unix)]
#[tokio::test]
async fn zip_archive_extracts_by_suffix() {
    use std::io::Write;

    let dir = tempfile::tempdir().unwrap();
    let archive_path = dir.path().join("chromedriver.zip");

    // Chromedriver archives carry the binary at the root with exec bits set.
    let file = std::fs::File::create(&archive_path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default().unix_permissions(0o755);
    writer.start_file("chromedriver", options).unwrap();
    writer.write_all(b"#!/bin/sh\nexit 0\n").unwrap();
    writer.finish().unwrap();

    downloader::extract_archive(&archive_path, dir.path())
        .await
        .unwrap();

    let extracted = dir.path().join("chromedriver");
    assert!(extracted.is_file());
    use std::os::unix::fs::PermissionsExt;
    assert!(extracted.metadata().unwrap().permissions().mode() & 0o111 != 0);
}

#[test]
fn reset_removes_the_working_directory() {
    let parent = tempfile::tempdir().unwrap();
    let work_dir = parent.path().join("wdctmp");
    let config = Config::new(&work_dir);
    config.ensure_work_dir().unwrap();
    std::fs::write(work_dir.join("geckodriver.log"), b"stale").unwrap();

    commands::reset(&config).unwrap();
    assert!(!work_dir.exists());

    // resetting again with nothing left is still fine
    commands::reset(&config).unwrap();
}

/// Launch terminates the previously registered process before starting a new
/// one, and terminate clears the registry record.
#[cfg(unix)]
#[test]
fn launch_restarts_the_registered_process() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::new(dir.path());
    config.ensure_work_dir().unwrap();

    let binary = config.binary_path(StubDriver.driver_name());
    write_executable(&binary, b"#!/bin/sh\nsleep 30\n");

    let first = launcher::launch(&StubDriver, &config).unwrap();
    let second = launcher::launch(&StubDriver, &config).unwrap();
    assert_ne!(first.pid, second.pid);

    // only the newest launch is registered
    let registry = launcher::Registry::load(&config).unwrap();
    assert_eq!(registry.entries().len(), 1);
    assert_eq!(
        registry.get(StubDriver.driver_name()).unwrap().pid,
        second.pid
    );
    assert!(config.log_path(StubDriver.driver_name()).is_file());

    launcher::terminate(&config, StubDriver.driver_name()).unwrap();
    let registry = launcher::Registry::load(&config).unwrap();
    assert!(registry.get(StubDriver.driver_name()).is_none());
}
