pub mod cli;
pub mod dates;
pub mod document;
pub mod fetch;
pub mod logging;
pub mod manager;
pub mod scrapers;

pub use cli::{handle_command, FetchArgs, HumanDuration, Outcome, ScraperCommands};
pub use fetch::{FetchConfig, Fetcher};
pub use manager::{LatestNews, ScraperManager};
pub use scrapers::Scraper;

pub mod prelude {
    pub use super::scrapers::Scraper;
    pub use kabar_core::{Article, ArticleDetail, Error, NewsSource, Result};
}
