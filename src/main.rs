use clap::Parser;
use tracing::error;
use wdprep::cli::Cli;
use wdprep::{Config, commands, logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config = match cli.dir {
        Some(dir) => Config::new(dir),
        None => Config::default(),
    };

    if let Err(err) = commands::dispatch(cli.command, &config).await {
        error!(error = %err, "command failed");
        std::process::exit(1);
    }
}
