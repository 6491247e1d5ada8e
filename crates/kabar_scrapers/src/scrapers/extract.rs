//! The selector-driven extraction engine shared by every adapter.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};
use kabar_core::{Article, ArticleDetail, Error, Result};
use scraper::ElementRef;
use tracing::debug;

use super::jsonld;
use super::site::Site;
use super::utils::normalize_url;
use crate::document::{select_in, Document};

const PARAGRAPH_BREAK: &str = "\n\n";

/// Turns a listing page into article summaries. Malformed items are skipped;
/// an empty result is not an error.
pub fn listing(site: &Site<'_>, document: &Document, fetched_at: DateTime<FixedOffset>) -> Vec<Article> {
    let rules = site.listing;
    let items = rules
        .items
        .iter()
        .map(|css| document.select(css))
        .find(|found| !found.is_empty())
        .unwrap_or_default();

    let mut seen = HashSet::new();
    let mut articles = Vec::new();
    for item in items {
        let Some(article) = listing_item(site, item, fetched_at) else {
            continue;
        };
        if seen.insert(article.url.clone()) {
            articles.push(article);
        }
    }

    debug!(source = %site.source, count = articles.len(), "Extracted listing items");
    articles
}

fn listing_item(site: &Site<'_>, item: ElementRef<'_>, fetched_at: DateTime<FixedOffset>) -> Option<Article> {
    let rules = site.listing;
    let title = rules.title.extract(item);
    let href = rules.link.extract(item);
    let image = rules.image.extract(item);

    if title.is_empty() || href.is_empty() || site.is_blocked(&href) {
        return None;
    }
    if rules.require_image && image.is_empty() {
        return None;
    }

    let url = normalize_url(&href, site.base_url);
    if site.is_blocked(&url) {
        return None;
    }

    let published_at = match rules.date {
        Some(field) => site.dates.parse_at(&field.extract(item), fetched_at),
        None => fetched_at,
    };

    Some(Article {
        title,
        url,
        image_url: non_empty(normalize_url(&image, site.base_url)),
        description: non_empty(rules.excerpt.extract(item)),
        published_at,
        source: site.source,
    })
}

/// Turns a detail page into a full article, failing with `InvalidContent`
/// when title, image or content is missing.
pub fn detail(
    site: &Site<'_>,
    mut document: Document,
    url: &str,
    now: DateTime<FixedOffset>,
) -> Result<ArticleDetail> {
    let rules = site.detail;
    let meta = jsonld::extract(&document);

    document.remove("script");
    for css in rules.strip {
        document.remove(css);
    }

    let root = document.root();
    let title = rules.title.extract(root);
    let image = normalize_url(&rules.image.extract(root), site.base_url);
    let content = paragraphs(site, root).join(PARAGRAPH_BREAK);

    let missing: Vec<&str> = [("title", &title), ("image", &image), ("content", &content)]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();
    if !missing.is_empty() {
        return Err(Error::InvalidContent(format!(
            "{} is missing {}",
            url,
            missing.join(", ")
        )));
    }

    let author = non_empty(rules.author.extract(root))
        .or_else(|| non_empty(meta.authors.join(", ")))
        .unwrap_or_else(|| rules.default_author.to_string());
    let category = non_empty(rules.category.extract(root))
        .unwrap_or_else(|| rules.default_category.to_string());

    let raw_date = rules.date.extract(root);
    let published_at = match meta.date_published {
        Some(date) if raw_date.is_empty() => date,
        _ => site.dates.parse_at(&raw_date, now),
    };

    Ok(ArticleDetail {
        article: Article {
            title,
            url: url.to_string(),
            image_url: Some(image),
            description: None,
            published_at,
            source: site.source,
        },
        content,
        author: Some(author),
        category: Some(category),
    })
}

fn paragraphs(site: &Site<'_>, root: ElementRef<'_>) -> Vec<String> {
    site.detail
        .paragraphs
        .iter()
        .map(|css| {
            select_in(root, css)
                .into_iter()
                .map(crate::document::text_of)
                .filter(|text| !text.is_empty() && !site.boilerplate.matches(text))
                .collect::<Vec<_>>()
        })
        .find(|found| !found.is_empty())
        .unwrap_or_default()
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
