//! Queryable HTML document handed out by the fetch layer.
//!
//! This is the only HTML capability adapters use: select one or many nodes by
//! CSS selector, read attributes and text, and remove whole subtrees.

use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// Parses a CSS selector, logging and returning `None` when it is invalid.
pub fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!(css, error = %e, "Invalid CSS selector, skipping");
            None
        }
    }
}

/// Text content of an element with runs of whitespace collapsed.
pub fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trimmed attribute value, `None` when missing or blank.
pub fn attr_of(element: ElementRef<'_>, name: &str) -> Option<String> {
    element
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Descendants of `scope` matching `css`, in document order.
pub fn select_in<'a>(scope: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match selector(css) {
        Some(selector) => scope.select(&selector).collect(),
        None => Vec::new(),
    }
}

pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    pub fn select(&self, css: &str) -> Vec<ElementRef<'_>> {
        match selector(css) {
            Some(selector) => self.html.select(&selector).collect(),
            None => Vec::new(),
        }
    }

    pub fn select_first(&self, css: &str) -> Option<ElementRef<'_>> {
        let selector = selector(css)?;
        self.html.select(&selector).next()
    }

    /// Detaches every subtree matching `css`. Returns how many were removed.
    pub fn remove(&mut self, css: &str) -> usize {
        let Some(selector) = selector(css) else {
            return 0;
        };
        let ids: Vec<_> = self.html.select(&selector).map(|el| el.id()).collect();
        for id in &ids {
            if let Some(mut node) = self.html.tree.get_mut(*id) {
                node.detach();
            }
        }
        ids.len()
    }
}
