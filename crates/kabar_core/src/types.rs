use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::NewsSource;

/// Listing-level summary of an article.
///
/// For sources that do not expose a publish time on their listing page,
/// `published_at` holds the fetch time and only becomes authoritative once the
/// detail page has been fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub published_at: DateTime<FixedOffset>,
    pub source: NewsSource,
}

impl Article {
    /// Stable identity of the article: `source` and `url` together.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.source.as_str().as_bytes());
        hasher.update(b"\n");
        hasher.update(self.url.as_bytes());
        hasher
            .finalize()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }
}

/// A fully extracted article. `content` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub article: Article,
    /// Paragraphs joined by a blank line.
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ArticleDetail {
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.content.split("\n\n")
    }
}
