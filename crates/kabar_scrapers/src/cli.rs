use std::io::Write;
use std::str::FromStr;
use std::time::Duration;

use clap::{Args, Subcommand};
use kabar_core::{ErrorClass, Result};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::fetch::{FetchConfig, DEFAULT_USER_AGENT};
use crate::manager::ScraperManager;

/// Fetch layer overrides; each flag falls back to its environment variable.
#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Per-request timeout in seconds
    #[arg(long, env = "KABAR_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,
    /// Attempts per request, the first one included
    #[arg(long, env = "KABAR_MAX_ATTEMPTS", default_value_t = 3)]
    pub max_attempts: u32,
    /// Delay between attempts in milliseconds
    #[arg(long, env = "KABAR_RETRY_DELAY_MS", default_value_t = 1000)]
    pub retry_delay_ms: u64,
    #[arg(long, env = "KABAR_USER_AGENT")]
    pub user_agent: Option<String>,
}

impl FetchArgs {
    pub fn into_config(self) -> FetchConfig {
        FetchConfig {
            user_agent: self.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            timeout: Duration::from_secs(self.timeout_secs),
            max_attempts: self.max_attempts,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            ..FetchConfig::default()
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum ScraperCommands {
    /// Print the latest articles as JSON, newest first
    Latest {
        /// Only this source (e.g. detik or indonesia/detik). All sources if omitted.
        #[arg(long)]
        source: Option<String>,
        /// Repeat forever with this interval (e.g. 30m, 1h15m, 90)
        #[arg(long)]
        interval: Option<HumanDuration>,
    },
    /// Print one article's full detail as JSON
    Detail {
        /// Source identifier or alias
        source: String,
        /// Article URL or site-relative path
        url: String,
    },
    /// Print an article's detail, picking the source from the URL
    Url { url: String },
    /// List available sources
    List,
}

/// How a command ended when it did not raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The listing was printed empty because no source answered.
    AllSourcesFailed,
}

/// A duration written as `1h30m`, `45s`, `2d` or bare seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanDuration(pub Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();

        for c in s.trim().chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
                continue;
            }
            if c.is_whitespace() {
                continue;
            }
            let multiplier = match c {
                's' => 1,
                'm' => 60,
                'h' => 3600,
                'd' => 86400,
                _ => return Err(format!("Invalid duration unit: {}", c)),
            };
            let num: u64 = current_number
                .parse()
                .map_err(|_| format!("Missing number before unit: {}", c))?;
            total_seconds = num
                .checked_mul(multiplier)
                .and_then(|secs| total_seconds.checked_add(secs))
                .ok_or_else(|| "Duration too large".to_string())?;
            current_number.clear();
        }

        // A trailing number without a unit counts as seconds
        if !current_number.is_empty() {
            let num = current_number
                .parse::<u64>()
                .map_err(|_| "Invalid number in duration".to_string())?;
            total_seconds = total_seconds
                .checked_add(num)
                .ok_or_else(|| "Duration too large".to_string())?;
        }

        if total_seconds == 0 {
            return Err("Duration must be greater than zero".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

/// Process exit code for a failed command.
pub fn exit_code(class: ErrorClass) -> u8 {
    match class {
        ErrorClass::Internal => 1,
        ErrorClass::Client => 2,
        ErrorClass::NotFound => 3,
        ErrorClass::Upstream => 4,
    }
}

pub async fn handle_command<W: Write>(
    command: ScraperCommands,
    manager: &ScraperManager,
    out: &mut W,
) -> Result<Outcome> {
    match command {
        ScraperCommands::Latest { source, interval } => {
            let Some(HumanDuration(interval)) = interval else {
                return latest_round(manager, source.as_deref(), out).await;
            };

            info!(interval_secs = interval.as_secs(), "Running in periodic mode");
            loop {
                match latest_round(manager, source.as_deref(), out).await {
                    Ok(Outcome::AllSourcesFailed) => warn!("No source answered this round"),
                    Ok(Outcome::Success) => {}
                    Err(e) => error!(error = %e, "Listing round failed"),
                }
                info!(interval_secs = interval.as_secs(), "Waiting for next round");
                tokio::time::sleep(interval).await;
            }
        }
        ScraperCommands::Detail { source, url } => {
            let detail = manager.get_detail(&source, &url).await?;
            print_json(out, &detail)?;
            Ok(Outcome::Success)
        }
        ScraperCommands::Url { url } => {
            let detail = manager.get_detail_by_url(&url).await?;
            print_json(out, &detail)?;
            Ok(Outcome::Success)
        }
        ScraperCommands::List => {
            for scraper in manager.scrapers() {
                let meta = scraper.source_metadata();
                writeln!(
                    out,
                    "{} {}/{}\t{}\t[{}]",
                    meta.emoji,
                    meta.region.name,
                    meta.source,
                    meta.name,
                    scraper.cli_names().join(", ")
                )
                .map_err(serde_json::Error::io)?;
            }
            Ok(Outcome::Success)
        }
    }
}

async fn latest_round<W: Write>(manager: &ScraperManager, source: Option<&str>, out: &mut W) -> Result<Outcome> {
    if let Some(source) = source {
        let articles = manager.list_latest(source).await?;
        print_json(out, &articles)?;
        return Ok(Outcome::Success);
    }

    let report = manager.collect_latest().await;
    info!(
        count = report.articles.len(),
        failed = report.failed_sources.len(),
        "Aggregated latest articles"
    );
    print_json(out, &report.articles)?;

    if report.all_failed() {
        Ok(Outcome::AllSourcesFailed)
    } else {
        Ok(Outcome::Success)
    }
}

fn print_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out).map_err(serde_json::Error::io)?;
    Ok(())
}
