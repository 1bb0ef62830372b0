//! Local WebDriver server provisioning.
//!
//! Detects the installed browser, resolves a pinned driver download, installs
//! the driver binary into a working directory, and launches it detached with
//! output captured to a log file. Built for a test runner that expects
//! geckodriver and chromedriver listening on their default ports (4444 and
//! 9515) after `wdprep all`; `wdprep reset` tears the whole working directory
//! down again.

// Top-level public modules
pub mod browser;
pub mod cli;
pub mod commands;
pub mod config;
pub mod downloader;
pub mod drivers;
pub mod error;
pub mod launcher;
pub mod logging;

pub use config::Config;
pub use drivers::{ChromeDriver, DriverPrep, GeckoDriver};
pub use error::{PrepError, Result};
