use async_trait::async_trait;
use kabar_core::{Article, ArticleDetail, NewsSource, Result};

use super::{fetch_detail, fetch_listing, REGION};
use crate::dates::{DateGrammar, RelativeUnit, SHORT_MONTHS};
use crate::fetch::Fetcher;
use crate::scrapers::site::{Boilerplate, DetailRules, Field, ListingRules, Site, BLOCKED_PATHS};
use crate::scrapers::utils::host_matches;
use crate::scrapers::{Scraper, SourceMetadata};

static LISTING: ListingRules = ListingRules {
    items: &[".grid-row article, .list-content__item, .media-news", "article"],
    title: Field::Text(&[".media__title", ".title", "h2", "h3"]),
    link: Field::Attr {
        selectors: &[".media__title a", "a"],
        attrs: &["href"],
    },
    image: Field::Attr {
        selectors: &["img"],
        attrs: &["src", "data-src"],
    },
    excerpt: Field::Text(&[".media__desc", ".excerpt", ".media__subtitle"]),
    date: Some(Field::Text(&[".media__date", ".date", "time"])),
    require_image: true,
};

static DETAIL: DetailRules = DetailRules {
    strip: &[
        ".advertisement",
        ".scrollpage",
        "[id^=div-gpt-ad]",
        ".detail__body-tag",
        ".detail__footer",
        ".parallaxindetail",
    ],
    title: Field::Text(&["h1.detail__title", ".detail__header h1"]),
    image: Field::Attr {
        selectors: &[".detail__media-image img", ".detail__media img"],
        attrs: &["src", "data-src"],
    },
    paragraphs: &[".detail__body-text p", ".itp_bodycontent p"],
    author: Field::Text(&[".detail__author", ".detail__byline"]),
    category: Field::Text(&[".detail__category", ".detail__label", ".page__breadcrumb a"]),
    date: Field::Text(&[".detail__date", ".detail__time"]),
    default_author: "detikcom",
    default_category: "Berita",
};

const BOILERPLATE: Boilerplate = Boilerplate {
    exact: &["ADVERTISEMENT", "SCROLL TO CONTINUE"],
    any_case: &["Baca juga:"],
};

const DATES: DateGrammar = DateGrammar::new(SHORT_MONTHS, &[RelativeUnit::Minutes, RelativeUnit::Hours]);

#[derive(Debug, Clone)]
pub struct DetikScraper {
    fetcher: Fetcher,
    base_url: String,
}

impl DetikScraper {
    const BASE_URL: &'static str = "https://www.detik.com";
    const DOMAIN: &'static str = "detik.com";

    pub fn new(fetcher: Fetcher) -> Self {
        Self::with_base_url(fetcher, Self::BASE_URL)
    }

    pub fn with_base_url(fetcher: Fetcher, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    fn site(&self) -> Site<'_> {
        Site {
            source: NewsSource::Detik,
            base_url: &self.base_url,
            blocked_paths: BLOCKED_PATHS,
            boilerplate: BOILERPLATE,
            dates: DATES,
            listing: &LISTING,
            detail: &DETAIL,
        }
    }
}

#[async_trait]
impl Scraper for DetikScraper {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            source: NewsSource::Detik,
            name: "detikcom",
            emoji: "🗞️",
            region: REGION,
        }
    }

    fn can_handle(&self, url: &str) -> bool {
        host_matches(url, Self::DOMAIN) || url.starts_with(&self.base_url)
    }

    async fn list_latest(&self) -> Result<Vec<Article>> {
        fetch_listing(&self.fetcher, self.site(), &self.source_metadata()).await
    }

    async fn get_detail(&self, url: &str) -> Result<ArticleDetail> {
        fetch_detail(&self.fetcher, self.site(), &self.source_metadata(), url).await
    }

    fn cli_names(&self) -> Vec<&str> {
        vec!["detik", "detikcom"]
    }
}
