//! Subcommand dispatch and the per-driver prepare pipeline.

use tracing::info;

use crate::cli::Commands;
use crate::config::Config;
use crate::drivers::{ChromeDriver, DriverPrep, GeckoDriver};
use crate::error::{PrepError, Result};
use crate::{downloader, launcher};

pub async fn dispatch(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::All => {
            prepare(&GeckoDriver, config).await?;
            prepare(&ChromeDriver, config).await?;
            info!("all drivers prepared");
            Ok(())
        }
        Commands::Gecko => prepare(&GeckoDriver, config).await,
        Commands::Chrome => prepare(&ChromeDriver, config).await,
        Commands::Reset => reset(config),
    }
}

/// Install-then-launch for one driver.
pub async fn prepare(driver: &dyn DriverPrep, config: &Config) -> Result<()> {
    info!(driver = driver.driver_name(), "preparing driver");
    downloader::install(driver, config).await?;
    launcher::launch(driver, config)?;
    Ok(())
}

/// Stops registered drivers and removes the working directory wholesale.
pub fn reset(config: &Config) -> Result<()> {
    launcher::terminate(config, GeckoDriver.driver_name())?;
    launcher::terminate(config, ChromeDriver.driver_name())?;

    match std::fs::remove_dir_all(config.work_dir()) {
        Ok(()) => {
            info!(dir = %config.work_dir().display(), "working directory removed");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(dir = %config.work_dir().display(), "working directory already absent");
            Ok(())
        }
        Err(e) => Err(PrepError::Io {
            path: config.work_dir().to_path_buf(),
            source: e,
        }),
    }
}
