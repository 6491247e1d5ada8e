use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use kabar_core::{Article, ArticleDetail, Error, NewsSource, Result};
use tracing::{info, warn};

use crate::fetch::Fetcher;
use crate::scrapers::utils::repair_scheme;
use crate::scrapers::{get_scraper_factories, Scraper};

/// Outcome of one aggregation round.
#[derive(Debug, Default)]
pub struct LatestNews {
    /// Merged listing, newest first.
    pub articles: Vec<Article>,
    pub succeeded_sources: Vec<NewsSource>,
    /// Sources whose listing call failed this round.
    pub failed_sources: Vec<NewsSource>,
}

impl LatestNews {
    /// True when at least one source was asked and none answered.
    pub fn all_failed(&self) -> bool {
        self.succeeded_sources.is_empty() && !self.failed_sources.is_empty()
    }
}

/// Registry of adapters and the aggregation over them.
pub struct ScraperManager {
    scrapers: Vec<Arc<dyn Scraper>>,
}

impl ScraperManager {
    pub fn new() -> Self {
        Self { scrapers: Vec::new() }
    }

    /// Registers every built-in adapter, all sharing `fetcher`.
    pub fn with_default_scrapers(fetcher: Fetcher) -> Self {
        let mut manager = Self::new();
        for factory in get_scraper_factories() {
            manager.add_scraper(Arc::from(factory(fetcher.clone())));
        }
        manager
    }

    pub fn add_scraper(&mut self, scraper: Arc<dyn Scraper>) {
        self.scrapers.push(scraper);
    }

    pub fn scrapers(&self) -> &[Arc<dyn Scraper>] {
        &self.scrapers
    }

    pub fn sources(&self) -> Vec<NewsSource> {
        self.scrapers.iter().map(|s| s.source()).collect()
    }

    /// Resolves `source` given as identifier (`detik`), CLI alias
    /// (`detikcom`) or region path (`indonesia/detik`), in any case.
    pub fn get_scraper(&self, source: &str) -> Result<Arc<dyn Scraper>> {
        let wanted = source.trim().to_lowercase();
        self.scrapers
            .iter()
            .find(|scraper| {
                let meta = scraper.source_metadata();
                let name = match wanted.split_once('/') {
                    Some((region, name)) if region == meta.region.name => name,
                    Some(_) => return false,
                    None => wanted.as_str(),
                };
                meta.source.as_str() == name || scraper.cli_names().iter().any(|alias| *alias == name)
            })
            .cloned()
            .ok_or_else(|| Error::UnsupportedSource(source.to_string()))
    }

    pub fn get_scraper_for_url(&self, url: &str) -> Result<Arc<dyn Scraper>> {
        let url = repair_scheme(url);
        self.scrapers
            .iter()
            .find(|scraper| scraper.can_handle(&url))
            .cloned()
            .ok_or_else(|| Error::UnsupportedSource(format!("no scraper handles {}", url)))
    }

    /// Lists every adapter concurrently. A failing adapter contributes
    /// nothing and is reported in `failed_sources`; the round itself never
    /// fails.
    pub async fn collect_latest(&self) -> LatestNews {
        let results = join_all(self.scrapers.iter().map(|scraper| async move {
            (scraper.source(), scraper.list_latest().await)
        }))
        .await;

        let mut report = LatestNews::default();
        let mut seen = HashSet::new();
        for (source, result) in results {
            match result {
                Ok(articles) => {
                    info!(%source, count = articles.len(), "Listing collected");
                    report.succeeded_sources.push(source);
                    report
                        .articles
                        .extend(articles.into_iter().filter(|a| seen.insert(a.fingerprint())));
                }
                Err(e) => {
                    warn!(%source, error = %e, "Listing failed, skipping source");
                    report.failed_sources.push(source);
                }
            }
        }

        // Stable, so equal timestamps keep registration order.
        report
            .articles
            .sort_by(|a, b| b.published_at.cmp(&a.published_at));
        report
    }

    pub async fn list_all_latest(&self) -> Vec<Article> {
        self.collect_latest().await.articles
    }

    /// Listing of a single source; unlike aggregation, failures propagate.
    pub async fn list_latest(&self, source: &str) -> Result<Vec<Article>> {
        self.get_scraper(source)?.list_latest().await
    }

    pub async fn get_detail(&self, source: &str, url: &str) -> Result<ArticleDetail> {
        let scraper = self.get_scraper(source)?;
        scraper.get_detail(url).await
    }

    pub async fn get_detail_by_url(&self, url: &str) -> Result<ArticleDetail> {
        let scraper = self.get_scraper_for_url(url)?;
        scraper.get_detail(&repair_scheme(url)).await
    }
}

impl Default for ScraperManager {
    fn default() -> Self {
        Self::new()
    }
}
