use async_trait::async_trait;
use kabar_core::{Article, ArticleDetail, NewsSource, Result};

use super::{fetch_detail, fetch_listing, REGION};
use crate::dates::{DateGrammar, RelativeUnit, FULL_MONTHS};
use crate::fetch::Fetcher;
use crate::scrapers::site::{Boilerplate, DetailRules, Field, ListingRules, Site, BLOCKED_PATHS};
use crate::scrapers::utils::host_matches;
use crate::scrapers::{Scraper, SourceMetadata};

// Tribun repeats the headline in the anchor's title attribute; listing items
// carry no separate lead.
static LISTING: ListingRules = ListingRules {
    items: &[".txt-oev-2, .art-list", "li.ptb15"],
    title: Field::Text(&["h3 a", "h4 a"]),
    link: Field::Attr {
        selectors: &["h3 a", "h4 a"],
        attrs: &["href"],
    },
    image: Field::Attr {
        selectors: &["img"],
        attrs: &["src", "data-src"],
    },
    excerpt: Field::Attr {
        selectors: &["h3 a", "h4 a"],
        attrs: &["title"],
    },
    date: None,
    require_image: true,
};

static DETAIL: DetailRules = DetailRules {
    strip: &[
        ".ads",
        ".artikel--iframefixed",
        ".artikel--newsletter",
        ".baca-juga",
        ".related-box",
        ".box-outlink",
    ],
    title: Field::Text(&["h1#arttitle", ".detail-title", ".read__title"]),
    image: Field::Attr {
        selectors: &[".imgfull_div img", ".detail-img img", ".read__photo img"],
        attrs: &["src", "data-src"],
    },
    paragraphs: &[".side-article.txt-article p", ".detail-text p", ".read__content p"],
    author: Field::Text(&["#penulis a", ".reporter__name", ".read__reporter"]),
    category: Field::Text(&[".breadcrumb__link", "#breadcrumbs li:nth-child(2) a"]),
    date: Field::Text(&["time", ".detail__date-created", ".read__time"]),
    default_author: "Tribun News",
    default_category: "Berita",
};

const BOILERPLATE: Boilerplate = Boilerplate {
    exact: &["ADVERTISEMENT", "Baca:"],
    any_case: &["Baca juga:"],
};

const DATES: DateGrammar = DateGrammar::new(
    FULL_MONTHS,
    &[RelativeUnit::Minutes, RelativeUnit::Hours, RelativeUnit::Days],
);

#[derive(Debug, Clone)]
pub struct TribunScraper {
    fetcher: Fetcher,
    base_url: String,
}

impl TribunScraper {
    const BASE_URL: &'static str = "https://www.tribunnews.com";
    const DOMAIN: &'static str = "tribunnews.com";

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
            source: NewsSource::Tribun,
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
impl Scraper for TribunScraper {
    fn source_metadata(&self) -> SourceMetadata {
        SourceMetadata {
            source: NewsSource::Tribun,
            name: "Tribunnews",
            emoji: "📡",
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
        vec!["tribun", "tribunnews"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchConfig;
    use chrono::Duration as ChronoDuration;
    use kabar_core::now_wib;
    use std::time::Duration;

    const LISTING_HTML: &str = r#"
        <html><body>
          <ul>
            <li class="art-list">
              <h3><a href="https://www.tribunnews.com/nasional/2025/05/17/sidang-kabinet" title="Sidang Kabinet Digelar">Sidang Kabinet Digelar</a></h3>
              <img data-src="https://asset-2.tstatic.net/sidang.jpg">
            </li>
            <li class="art-list">
              <h3><a href="https://www.tribunnews.com/nasional/2025/05/17/sidang-kabinet" title="Sidang Kabinet Digelar">Sidang Kabinet Digelar</a></h3>
              <img src="https://asset-2.tstatic.net/sidang.jpg">
            </li>
            <li class="art-list">
              <h3><a href="https://www.tribunnews.com/tag/kabinet" title="Kabinet">Kabinet</a></h3>
              <img src="https://asset-2.tstatic.net/tag.jpg">
            </li>
          </ul>
        </body></html>"#;

    const DETAIL_HTML: &str = r#"
        <html><body>
          <h1 id="arttitle">Sidang Kabinet Digelar</h1>
          <div id="penulis"><a>Reza Pratama</a></div>
          <time>2 hari yang lalu</time>
          <div class="imgfull_div"><img src="//asset-2.tstatic.net/sidang.jpg"></div>
          <div class="side-article txt-article">
            <p>Presiden memimpin sidang kabinet paripurna.</p>
            <p>Baca: Menteri baru dilantik</p>
            <div class="baca-juga"><p>Berita terkait</p></div>
            <p>Sidang membahas anggaran tahun depan.</p>
            <p>Pidato yang dibaca: pokok-pokok kebijakan fiskal.</p>
          </div>
        </body></html>"#;

    fn scraper_for(server: &mockito::Server) -> TribunScraper {
        let fetcher = Fetcher::new(FetchConfig {
            retry_delay: Duration::from_millis(10),
            ..FetchConfig::default()
        })
        .unwrap();
        TribunScraper::with_base_url(fetcher, server.url())
    }

    #[test]
    fn test_can_handle() {
        let scraper = TribunScraper::new(Fetcher::new(FetchConfig::default()).unwrap());
        assert!(scraper.can_handle("https://www.tribunnews.com/nasional/2025/05/17/x"));
        assert!(scraper.can_handle("https://jateng.tribunnews.com/2025/05/17/x"));
        assert!(!scraper.can_handle("https://news.detik.com/"));
    }

    #[tokio::test]
    async fn test_list_latest_dedups_and_uses_title_attribute() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .with_status(200)
            .with_body(LISTING_HTML)
            .create_async()
            .await;

        let before = now_wib();
        let articles = scraper_for(&server).list_latest().await.unwrap();

        assert_eq!(articles.len(), 1);
        let article = &articles[0];
        assert_eq!(article.description.as_deref(), Some("Sidang Kabinet Digelar"));
        assert_eq!(article.image_url.as_deref(), Some("https://asset-2.tstatic.net/sidang.jpg"));
        assert!(article.published_at >= before);
    }

    #[tokio::test]
    async fn test_get_detail_relative_days() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/nasional/2025/05/17/sidang-kabinet")
            .with_status(200)
            .with_body(DETAIL_HTML)
            .create_async()
            .await;

        let before = now_wib();
        let detail = scraper_for(&server)
            .get_detail("/nasional/2025/05/17/sidang-kabinet")
            .await
            .unwrap();
        let after = now_wib();

        assert_eq!(detail.author.as_deref(), Some("Reza Pratama"));
        assert_eq!(detail.category.as_deref(), Some("Berita"));
        assert_eq!(detail.article.image_url.as_deref(), Some("https://asset-2.tstatic.net/sidang.jpg"));
        assert_eq!(
            detail.content,
            "Presiden memimpin sidang kabinet paripurna.\n\nSidang membahas anggaran tahun depan.\n\n\
             Pidato yang dibaca: pokok-pokok kebijakan fiskal."
        );

        let two_days = ChronoDuration::try_days(2).unwrap();
        assert!(detail.article.published_at >= before - two_days);
        assert!(detail.article.published_at <= after - two_days);
    }
}
