use async_trait::async_trait;

use super::{DriverPrep, UNRESOLVED_URL};

// GeckoDriver is pinned to the 0.30.0 linux64 release; no Firefox version
// probe is needed for this range.
const GECKODRIVER_URL: &str =
    "https://github.com/mozilla/geckodriver/releases/download/v0.30.0/geckodriver-v0.30.0-linux64.tar.gz";

/// Pinned GeckoDriver release for Firefox.
pub struct GeckoDriver;

#[async_trait]
impl DriverPrep for GeckoDriver {
    fn driver_name(&self) -> &str {
        "geckodriver"
    }

    fn archive_name(&self) -> &str {
        "geckodriver.tgz"
    }

    fn launch_args(&self) -> &[&str] {
        &["--log", "fatal"]
    }

    async fn browser_version(&self) -> Option<String> {
        None
    }

    fn download_url(&self, _browser_version: Option<&str>) -> String {
        // Only a Linux x86-64 build is defined.
        if cfg!(target_os = "linux") {
            GECKODRIVER_URL.to_string()
        } else {
            UNRESOLVED_URL.to_string()
        }
    }
}
