use kabar_core::{now_wib, Article, ArticleDetail, Result};

use crate::fetch::Fetcher;
use crate::logging::Logger;
use crate::scrapers::extract;
use crate::scrapers::site::Site;
use crate::scrapers::utils::{normalize_url, repair_scheme};
use crate::scrapers::{Region, SourceMetadata};

pub mod detik;
pub mod kompas;
pub mod tribun;

pub use detik::DetikScraper;
pub use kompas::KompasScraper;
pub use tribun::TribunScraper;

pub const REGION: Region = Region {
    name: "indonesia",
    emoji: "🇮🇩",
};

fn logger(meta: &SourceMetadata) -> Logger {
    Logger::new().with_new_prefixes(format!("{} [{}]", meta.emoji, meta.source))
}

/// Fetches the site's listing page and extracts its article summaries.
pub(crate) async fn fetch_listing(fetcher: &Fetcher, site: Site<'_>, meta: &SourceMetadata) -> Result<Vec<Article>> {
    let log = logger(meta);
    log.debug(&format!("Fetching listing from {}", site.base_url));

    let document = fetcher.fetch(site.base_url).await?;
    let articles = extract::listing(&site, &document, now_wib());

    if articles.is_empty() {
        log.warn("Listing page yielded no articles, markup may have changed");
    } else {
        log.info(&format!("Found {} articles", articles.len()));
    }
    Ok(articles)
}

/// Fetches one article page and extracts its detail.
pub(crate) async fn fetch_detail(fetcher: &Fetcher, site: Site<'_>, meta: &SourceMetadata, url: &str) -> Result<ArticleDetail> {
    let url = normalize_url(&repair_scheme(url), site.base_url);
    let document = fetcher.fetch(&url).await?;

    let detail = extract::detail(&site, document, &url, now_wib());
    match &detail {
        Ok(detail) => logger(meta).info(&format!("Extracted article: {}", detail.article.title)),
        Err(e) => logger(meta).error(&format!("Rejected {}: {}", url, e)),
    }
    detail
}
