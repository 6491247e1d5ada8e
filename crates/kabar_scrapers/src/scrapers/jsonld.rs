use chrono::{DateTime, FixedOffset};
use serde_json::Value;

use crate::document::Document;

/// Article metadata published as JSON-LD.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct JsonLdMeta {
    pub authors: Vec<String>,
    pub date_published: Option<DateTime<FixedOffset>>,
}

/// Reads every `application/ld+json` block of the document. Must run before
/// script tags are stripped.
pub fn extract(document: &Document) -> JsonLdMeta {
    let mut meta = JsonLdMeta::default();

    for script in document.select("script[type='application/ld+json']") {
        let raw = script.text().collect::<String>();
        let Ok(json) = serde_json::from_str::<Value>(raw.trim()) else {
            continue;
        };
        for node in nodes(&json) {
            collect(node, &mut meta);
        }
    }

    meta
}

// Blocks are either a single object, an array of objects, or an `@graph`.
fn nodes(json: &Value) -> Vec<&Value> {
    match json {
        Value::Array(items) => items.iter().flat_map(nodes).collect(),
        Value::Object(obj) => match obj.get("@graph") {
            Some(graph) => nodes(graph),
            None => vec![json],
        },
        _ => Vec::new(),
    }
}

fn collect(node: &Value, meta: &mut JsonLdMeta) {
    if let Some(author) = node.get("author") {
        match author {
            Value::Array(arr) => {
                for author_obj in arr {
                    push_author(author_obj, &mut meta.authors);
                }
            }
            other => push_author(other, &mut meta.authors),
        }
    }

    if meta.date_published.is_none() {
        meta.date_published = node
            .get("datePublished")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok());
    }
}

fn push_author(author: &Value, authors: &mut Vec<String>) {
    let name = match author {
        Value::Object(obj) => obj.get("name").and_then(Value::as_str),
        Value::String(s) => Some(s.as_str()),
        _ => None,
    };
    if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
        if !authors.iter().any(|a| a == name) {
            authors.push(name.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_object_authors_and_date() {
        let document = Document::parse(
            r#"<html><head>
            <script type="application/ld+json">
                {"@type": "NewsArticle",
                 "author": [{"name": "Rina Ayu"}, {"name": " Budi "}],
                 "datePublished": "2025-05-17T21:46:00+07:00"}
            </script>
            </head><body></body></html>"#,
        );

        let meta = extract(&document);
        assert_eq!(meta.authors, vec!["Rina Ayu", "Budi"]);
        assert_eq!(
            meta.date_published.map(|d| d.to_rfc3339()).as_deref(),
            Some("2025-05-17T21:46:00+07:00")
        );
    }

    #[test]
    fn test_extract_graph_and_string_author() {
        let document = Document::parse(
            r#"<html><head>
            <script type="application/ld+json">
                {"@graph": [{"@type": "WebPage"}, {"@type": "NewsArticle", "author": "Tim Redaksi"}]}
            </script>
            <script type="application/ld+json">{ not json</script>
            </head></html>"#,
        );

        let meta = extract(&document);
        assert_eq!(meta.authors, vec!["Tim Redaksi"]);
        assert!(meta.date_published.is_none());
    }

    #[test]
    fn test_no_json_ld() {
        let document = Document::parse("<html><body><p>Halo</p></body></html>");
        assert_eq!(extract(&document), JsonLdMeta::default());
    }
}
