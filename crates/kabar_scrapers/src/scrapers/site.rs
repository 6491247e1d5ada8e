//! Declarative description of a news site's markup.
//!
//! Every field is an ordered list of candidate selectors tried until one
//! yields a non-empty value, so a single renamed class does not blank a field.

use kabar_core::NewsSource;
use scraper::ElementRef;

use crate::dates::DateGrammar;
use crate::document::{attr_of, select_in, text_of};

#[derive(Debug, Clone, Copy)]
pub enum Field {
    /// Text of the first element matched by a candidate.
    Text(&'static [&'static str]),
    /// First non-blank attribute, in `attrs` order, of the first element
    /// matched by a candidate.
    Attr {
        selectors: &'static [&'static str],
        attrs: &'static [&'static str],
    },
}

impl Field {
    pub fn extract(&self, scope: ElementRef<'_>) -> String {
        match self {
            Field::Text(selectors) => selectors
                .iter()
                .filter_map(|css| select_in(scope, css).into_iter().next())
                .map(text_of)
                .find(|text| !text.is_empty())
                .unwrap_or_default(),
            Field::Attr { selectors, attrs } => selectors
                .iter()
                .filter_map(|css| select_in(scope, css).into_iter().next())
                .find_map(|element| attrs.iter().find_map(|attr| attr_of(element, attr)))
                .unwrap_or_default(),
        }
    }
}

/// Paragraph filter for non-editorial text.
#[derive(Debug, Clone, Copy)]
pub struct Boilerplate {
    /// Markers matched as written, e.g. `ADVERTISEMENT`.
    pub exact: &'static [&'static str],
    /// Markers matched in any letter case, e.g. `Baca juga:`.
    pub any_case: &'static [&'static str],
}

impl Boilerplate {
    pub fn matches(&self, text: &str) -> bool {
        if self.exact.iter().any(|marker| text.contains(marker)) {
            return true;
        }
        let lowered = text.to_lowercase();
        self.any_case
            .iter()
            .any(|marker| lowered.contains(&marker.to_lowercase()))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListingRules {
    /// Alternative item selectors; the first with any match is used.
    pub items: &'static [&'static str],
    pub title: Field,
    pub link: Field,
    pub image: Field,
    pub excerpt: Field,
    /// Set for sources that print a date on listing items.
    pub date: Option<Field>,
    pub require_image: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct DetailRules {
    /// Subtrees removed before extraction, besides `script`.
    pub strip: &'static [&'static str],
    pub title: Field,
    pub image: Field,
    /// Alternative paragraph selectors; the first yielding text is used.
    pub paragraphs: &'static [&'static str],
    pub author: Field,
    pub category: Field,
    pub date: Field,
    pub default_author: &'static str,
    pub default_category: &'static str,
}

/// Everything the extraction engine needs to know about one source.
#[derive(Debug, Clone, Copy)]
pub struct Site<'a> {
    pub source: NewsSource,
    pub base_url: &'a str,
    /// Path markers of tag, video and photo index pages.
    pub blocked_paths: &'static [&'static str],
    pub boilerplate: Boilerplate,
    pub dates: DateGrammar,
    pub listing: &'static ListingRules,
    pub detail: &'static DetailRules,
}

impl Site<'_> {
    pub fn is_blocked(&self, url: &str) -> bool {
        self.blocked_paths.iter().any(|marker| url.contains(marker))
    }
}

pub const BLOCKED_PATHS: &[&str] = &["/tag/", "/video/", "/foto/"];
