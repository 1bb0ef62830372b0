use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wdprep")]
#[command(about = "Prepare local WebDriver servers for a test runner")]
#[command(version)]
pub struct Cli {
    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Working directory for downloads, binaries and logs
    #[arg(long, global = true, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prepare and launch geckodriver, then chromedriver
    All,

    /// Prepare and launch geckodriver only
    Gecko,

    /// Prepare and launch chromedriver only
    Chrome,

    /// Stop launched drivers and delete the working directory
    Reset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_all_command() {
        let cli = Cli::try_parse_from(["wdprep", "all"]).unwrap();
        assert!(matches!(cli.command, Commands::All));
        assert_eq!(cli.verbose, 0);
        assert!(cli.dir.is_none());
    }

    #[test]
    fn parse_single_driver_commands() {
        let gecko = Cli::try_parse_from(["wdprep", "gecko"]).unwrap();
        assert!(matches!(gecko.command, Commands::Gecko));

        let chrome = Cli::try_parse_from(["wdprep", "chrome"]).unwrap();
        assert!(matches!(chrome.command, Commands::Chrome));
    }

    #[test]
    fn parse_reset_with_dir_override() {
        let cli = Cli::try_parse_from(["wdprep", "reset", "--dir", "/tmp/wd"]).unwrap();
        assert!(matches!(cli.command, Commands::Reset));
        assert_eq!(cli.dir, Some(PathBuf::from("/tmp/wd")));
    }

    #[test]
    fn verbose_flag_counts() {
        let cli = Cli::try_parse_from(["wdprep", "-vv", "all"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn unknown_subcommand_fails_to_parse() {
        assert!(Cli::try_parse_from(["wdprep", "firefox"]).is_err());
        assert!(Cli::try_parse_from(["wdprep"]).is_err());
    }
}
