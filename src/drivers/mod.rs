//! Driver descriptions and download URL resolution.

mod chromedriver;
mod geckodriver;

pub use chromedriver::ChromeDriver;
pub use geckodriver::GeckoDriver;

use async_trait::async_trait;

/// Sentinel returned when no download URL can be resolved.
///
/// Deliberately not a valid URL: the later download attempt fails visibly
/// instead of the resolver guessing at an archive.
pub const UNRESOLVED_URL: &str = "xxx";

/// Everything the prepare pipeline needs to know about one driver.
#[async_trait]
pub trait DriverPrep: Send + Sync {
    /// Driver name, e.g. `"geckodriver"`. Doubles as the binary file name
    /// inside the working directory.
    fn driver_name(&self) -> &str;

    /// Archive file name inside the working directory, e.g. `"geckodriver.tgz"`.
    /// The suffix selects the extraction codec.
    fn archive_name(&self) -> &str;

    /// Fixed logging arguments passed to the driver at launch.
    fn launch_args(&self) -> &[&str];

    /// Detected browser version, for drivers that need one to resolve a
    /// download. Drivers with pinned URLs return `None`.
    async fn browser_version(&self) -> Option<String>;

    /// Download URL for the driver archive. Unresolvable inputs yield
    /// [`UNRESOLVED_URL`].
    fn download_url(&self, browser_version: Option<&str>) -> String;
}

/// Resolves a download URL for an arbitrary driver name.
///
/// Names that match neither driver family resolve to [`UNRESOLVED_URL`].
pub fn resolve_download_url(driver_name: &str, browser_version: Option<&str>) -> String {
    if driver_name.contains("gecko") {
        GeckoDriver.download_url(browser_version)
    } else if driver_name.contains("chrome") {
        ChromeDriver.download_url(browser_version)
    } else {
        UNRESOLVED_URL.to_string()
    }
}
