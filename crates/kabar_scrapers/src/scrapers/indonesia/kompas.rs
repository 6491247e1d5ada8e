use async_trait::async_trait;
use kabar_core::{Article, ArticleDetail, NewsSource, Result};

use super::{fetch_detail, fetch_listing, REGION};
use crate::dates::{DateGrammar, RelativeUnit, FULL_MONTHS};
use crate::fetch::Fetcher;
use crate::scrapers::site::{Boilerplate, DetailRules, Field, ListingRules, Site, BLOCKED_PATHS};
use crate::scrapers::utils::host_matches;
use crate::scrapers::{Scraper, SourceMetadata};

static LISTING: ListingRules = ListingRules {
    items: &[".latest__item, .most__item, .article__list", "article"],
    title: Field::Text(&["h3.article__title a", ".article__link", ".latest__title", ".most__title"]),
    link: Field::Attr {
        selectors: &["h3.article__title a", ".article__link", "a"],
        attrs: &["href"],
    },
    image: Field::Attr {
        selectors: &[".article__asset img", ".article__image img", ".latest__img img", ".most__img img"],
        attrs: &["src", "data-src"],
    },
    excerpt: Field::Text(&[".article__lead", ".article__subtitle", ".latest__excerpt", ".most__excerpt"]),
    date: None,
    require_image: false,
};

static DETAIL: DetailRules = DetailRules {
    strip: &[
        ".ads",
        ".read__advertisement",
        ".article__list--recommendation",
        ".read__related",
        ".read__tagging",
        ".article__tag",
    ],
    title: Field::Text(&[".read__title", "h1.article__title", ".article__title"]),
    image: Field::Attr {
        selectors: &[".read__photo img", ".photo__wrap img", ".article__image img"],
        attrs: &["src", "data-src"],
    },
    paragraphs: &[".read__content p", ".article__content p", ".article__body p"],
    author: Field::Text(&[".read__author__name", ".article__author", ".credit"]),
    category: Field::Text(&[".read__breadcrumb a", ".article__subtitle", ".article__channel"]),
    date: Field::Text(&[".read__time", ".article__date", ".article__date--publish"]),
    default_author: "Kompas.com",
    default_category: "Berita",
};

const BOILERPLATE: Boilerplate = Boilerplate {
    exact: &["ADVERTISEMENT"],
    any_case: &["Baca juga:"],
};

const DATES: DateGrammar = DateGrammar::new(FULL_MONTHS, &[RelativeUnit::Minutes, RelativeUnit::Hours]);

#[derive(Debug, Clone)]
pub struct KompasScraper {
    fetcher: Fetcher,
    base_url: String,
}

impl KompasScraper {
    const BASE_URL: &'static str = "https://www.kompas.com";
    const DOMAIN: &'static str = "kompas.com";

    pub fn new(fetcher: Fetcher) -> Self {
        Self::with_base_url(fetcher, Self::BASE_URL)
    }

    /// Points the scraper at another origin, e.g. a local mirror.
    pub fn with_base_url(fetcher: Fetcher, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    fn site(&self) -> Site<'_> {
        Site {
            source: NewsSource::Kompas,
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
impl Scraper for KompasScraper {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            source: NewsSource::Kompas,
            name: "Kompas",
            emoji: "📰",
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
        vec!["kompas"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchConfig;
    use kabar_core::Error;
    use std::time::Duration;

    const LISTING_HTML: &str = r#"
        <html><body>
          <div class="latest__item">
            <h3 class="latest__title"><a href="/read/2025/05/17/21460001/harga-beras-turun">Harga Beras Turun</a></h3>
            <div class="latest__img"><img src="https://asset.kompas.com/beras.jpg"></div>
            <div class="latest__excerpt">Harga beras di pasar induk turun.</div>
          </div>
          <div class="latest__item">
            <h3 class="latest__title"><a href="/tag/beras">Tag Beras</a></h3>
          </div>
          <div class="most__item">
            <h3 class="most__title"><a href="/read/2025/05/17/22000002/banjir-jakarta">Banjir Jakarta</a></h3>
          </div>
        </body></html>"#;

    const DETAIL_HTML: &str = r#"
        <html><body>
          <h1 class="read__title">Harga Beras Turun</h1>
          <div class="read__time">Kompas.com - 17 Mei 2025, 21:46 WIB</div>
          <div class="read__author__name">Rina Ayu</div>
          <div class="read__breadcrumb"><a>Ekonomi</a></div>
          <div class="read__photo"><img src="https://asset.kompas.com/beras.jpg"></div>
          <div class="read__content">
            <p>Harga beras di pasar induk turun pekan ini.</p>
            <p>Baca juga: Harga cabai naik</p>
            <div class="ads"><p>Iklan</p></div>
            <p>Pedagang menyambut baik penurunan harga.</p>
          </div>
        </body></html>"#;

    fn scraper_for(server: &mockito::Server) -> KompasScraper {
        let fetcher = Fetcher::new(FetchConfig {
            retry_delay: Duration::from_millis(10),
            ..FetchConfig::default()
        })
        .unwrap();
        KompasScraper::with_base_url(fetcher, server.url())
    }

    #[test]
    fn test_can_handle() {
        let scraper = KompasScraper::new(Fetcher::new(FetchConfig::default()).unwrap());
        assert!(scraper.can_handle("https://www.kompas.com/read/2025/05/17/1/x"));
        assert!(scraper.can_handle("https://money.kompas.com/read/2025/05/17/1/x"));
        assert!(!scraper.can_handle("https://www.detik.com/"));
        assert_eq!(scraper.cli_names(), vec!["kompas"]);
    }

    #[tokio::test]
    async fn test_list_latest() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body(LISTING_HTML)
            .create_async()
            .await;

        let scraper = scraper_for(&server);
        let articles = scraper.list_latest().await.unwrap();
        mock.assert_async().await;

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Harga Beras Turun");
        assert_eq!(
            articles[0].url,
            format!("{}/read/2025/05/17/21460001/harga-beras-turun", server.url())
        );
        assert_eq!(articles[0].image_url.as_deref(), Some("https://asset.kompas.com/beras.jpg"));
        assert_eq!(articles[0].description.as_deref(), Some("Harga beras di pasar induk turun."));
        assert_eq!(articles[1].title, "Banjir Jakarta");
        assert!(articles[1].image_url.is_none());
        assert!(articles.iter().all(|a| a.source == NewsSource::Kompas));
    }

    #[tokio::test]
    async fn test_get_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/read/2025/05/17/21460001/harga-beras-turun")
            .with_status(200)
            .with_body(DETAIL_HTML)
            .create_async()
            .await;

        let scraper = scraper_for(&server);
        let detail = scraper
            .get_detail("/read/2025/05/17/21460001/harga-beras-turun")
            .await
            .unwrap();

        assert_eq!(detail.article.title, "Harga Beras Turun");
        assert_eq!(detail.author.as_deref(), Some("Rina Ayu"));
        assert_eq!(detail.category.as_deref(), Some("Ekonomi"));
        assert_eq!(
            detail.content,
            "Harga beras di pasar induk turun pekan ini.\n\nPedagang menyambut baik penurunan harga."
        );
        assert_eq!(detail.article.published_at.to_rfc3339(), "2025-05-17T21:46:00+07:00");
    }

    #[tokio::test]
    async fn test_get_detail_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/read/hilang")
            .with_status(404)
            .create_async()
            .await;

        let scraper = scraper_for(&server);
        let err = scraper.get_detail("/read/hilang").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
