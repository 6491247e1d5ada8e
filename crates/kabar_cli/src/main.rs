use std::io;
use std::process::ExitCode;

use clap::Parser;
use kabar_scrapers::cli::exit_code;
use kabar_scrapers::logging::init_logging;
use kabar_scrapers::{handle_command, FetchArgs, Fetcher, Outcome, ScraperCommands, ScraperManager};
use kabar_core::ErrorClass;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "kabar", author, version, about = "Latest Indonesian news from Kompas, Detik and Tribun", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    fetch: FetchArgs,
    /// Log filter, e.g. info or kabar_scrapers=debug. RUST_LOG takes precedence.
    #[arg(long, env = "KABAR_LOG", default_value = "info")]
    log: String,
    #[command(subcommand)]
    command: ScraperCommands,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log);

    let fetcher = match Fetcher::new(cli.fetch.into_config()) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            eprintln!("{}", e);
            return ExitCode::from(exit_code(e.class()));
        }
    };

    let manager = ScraperManager::with_default_scrapers(fetcher);
    let sources: Vec<String> = manager.sources().iter().map(ToString::to_string).collect();
    info!("🦗 Scrapers initialized: {}", sources.join(", "));

    let mut stdout = io::stdout();
    match handle_command(cli.command, &manager, &mut stdout).await {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::AllSourcesFailed) => {
            eprintln!("No source could be reached");
            ExitCode::from(exit_code(ErrorClass::Upstream))
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(exit_code(e.class()))
        }
    }
}
