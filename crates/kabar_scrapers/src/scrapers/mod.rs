use async_trait::async_trait;
use kabar_core::{Article, ArticleDetail, NewsSource, Result};

pub mod extract;
pub mod indonesia;
pub mod jsonld;
pub mod site;

use crate::fetch::Fetcher;
use indonesia::{DetikScraper, KompasScraper, TribunScraper};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub name: &'static str,
    pub emoji: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceMetadata {
    pub source: NewsSource,
    pub name: &'static str,
    pub emoji: &'static str,
    pub region: Region,
}

/// A news source adapter.
#[async_trait]
pub trait Scraper: Send + Sync {
    fn source_metadata(&self) -> SourceMetadata;

    fn source(&self) -> NewsSource {
        self.source_metadata().source
    }

    /// Returns true if this scraper can handle the given URL
    fn can_handle(&self, url: &str) -> bool;

    /// Summaries of the articles currently on the source's listing page
    async fn list_latest(&self) -> Result<Vec<Article>>;

    /// Full detail of one article
    async fn get_detail(&self, url: &str) -> Result<ArticleDetail>;

    /// Returns a list of CLI shorthand names for this scraper
    fn cli_names(&self) -> Vec<&str> {
        vec![]
    }
}

pub type ScraperFactory = Box<dyn Fn(Fetcher) -> Box<dyn Scraper> + Send + Sync>;

/// Factories for every built-in adapter, in registration order.
pub fn get_scraper_factories() -> Vec<ScraperFactory> {
    vec![
        Box::new(|fetcher: Fetcher| Box::new(DetikScraper::new(fetcher)) as Box<dyn Scraper>),
        Box::new(|fetcher: Fetcher| Box::new(KompasScraper::new(fetcher)) as Box<dyn Scraper>),
        Box::new(|fetcher: Fetcher| Box::new(TribunScraper::new(fetcher)) as Box<dyn Scraper>),
    ]
}

/// Common utilities for scrapers
pub mod utils {
    use url::Url;

    /// Resolves a URL found in markup against the source's base URL.
    pub fn normalize_url(url: &str, base_url: &str) -> String {
        let url = url.trim();
        if url.is_empty() {
            return String::new();
        }
        if url.starts_with("//") {
            return format!("https:{}", url);
        }
        if url.starts_with("http") {
            return url.to_string();
        }
        let base = base_url.trim_end_matches('/');
        if url.starts_with('/') {
            format!("{}{}", base, url)
        } else {
            format!("{}/{}", base, url)
        }
    }

    /// Rebuilds an article URL that lost a slash after its scheme, as happens
    /// when a URL is carried in path segments (`https:/host/...`).
    pub fn repair_scheme(url: &str) -> String {
        for scheme in ["https:", "http:"] {
            if let Some(rest) = url.strip_prefix(scheme) {
                if !rest.starts_with("//") {
                    return format!("{}//{}", scheme, rest.trim_start_matches('/'));
                }
            }
        }
        url.to_string()
    }

    /// True when `url` is on `domain` or one of its subdomains.
    pub fn host_matches(url: &str, domain: &str) -> bool {
        Url::parse(url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(str::to_string))
            .map_or(false, |host| host == domain || host.ends_with(&format!(".{}", domain)))
    }
}

#[cfg(test)]
mod tests {
    use super::utils::*;
    use super::*;

    #[test]
    fn test_normalize_protocol_relative() {
        assert_eq!(
            normalize_url("//img.example.com/a.jpg", "https://site.com"),
            "https://img.example.com/a.jpg"
        );
    }

    #[test]
    fn test_normalize_relative() {
        assert_eq!(normalize_url("/a/b", "https://site.com"), "https://site.com/a/b");
        assert_eq!(normalize_url("a/b", "https://site.com"), "https://site.com/a/b");
        assert_eq!(normalize_url("/a/b", "https://site.com/"), "https://site.com/a/b");
    }

    #[test]
    fn test_normalize_absolute_and_empty() {
        assert_eq!(normalize_url("https://x.com/y", "https://site.com"), "https://x.com/y");
        assert_eq!(normalize_url("http://x.com/y", "https://site.com"), "http://x.com/y");
        assert_eq!(normalize_url("", "https://site.com"), "");
        assert_eq!(normalize_url("   ", "https://site.com"), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize_url("/read/2025/05/17/berita", "https://www.kompas.com");
        assert_eq!(normalize_url(&once, "https://www.kompas.com"), once);
    }

    #[test]
    fn test_repair_scheme() {
        assert_eq!(
            repair_scheme("https:/www.kompas.com/read/1"),
            "https://www.kompas.com/read/1"
        );
        assert_eq!(repair_scheme("https://www.kompas.com/read/1"), "https://www.kompas.com/read/1");
        assert_eq!(repair_scheme("/read/1"), "/read/1");
    }

    #[test]
    fn test_host_matches() {
        assert!(host_matches("https://news.detik.com/berita/d-1/x", "detik.com"));
        assert!(host_matches("https://www.detik.com/", "detik.com"));
        assert!(!host_matches("https://notdetik.com/", "detik.com"));
        assert!(!host_matches("not a url", "detik.com"));
    }

    #[test]
    fn test_factories_cover_every_source() {
        let fetcher = Fetcher::new(Default::default()).unwrap();
        let sources: Vec<NewsSource> = get_scraper_factories()
            .iter()
            .map(|factory| factory(fetcher.clone()).source())
            .collect();
        assert_eq!(sources, vec![NewsSource::Detik, NewsSource::Kompas, NewsSource::Tribun]);
    }
}
