//! Link relation extraction
//!
//! Collects `<head>` link elements keyed by each of their (lowercased) rel
//! tokens, with hrefs resolved against the document base URL.

use indexmap::IndexMap;
use scraper::{Html, Selector};
use serde::Serialize;

use crate::coerce::resolve_url;

use super::{ExtractionContext, ExtractionResult};

/// Attributes carried along with each link besides the href
const LINK_ATTRIBUTES: [&str; 3] = ["hreflang", "title", "type"];

/// One link element under one of its rel tokens
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkEntry {
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hreflang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

/// Extract link relations into `links`
pub fn extract_links(
    document: &Html,
    result: &mut ExtractionResult,
    _context: &ExtractionContext<'_>,
) {
    let mut links: IndexMap<String, Vec<LinkEntry>> = IndexMap::new();

    let selector = match Selector::parse("head > link[rel]") {
        Ok(s) => s,
        Err(_) => return,
    };

    for element in document.select(&selector) {
        let Some(rel) = element.value().attr("rel") else {
            continue;
        };
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let [hreflang, title, media_type] =
            LINK_ATTRIBUTES.map(|name| element.value().attr(name).map(String::from));
        let entry = LinkEntry {
            href: resolve_url(&result.base_url, href),
            hreflang,
            title,
            media_type,
        };

        for relation in rel.split_whitespace() {
            let relation = relation.to_lowercase();
            if relation.is_empty() {
                continue;
            }
            links.entry(relation).or_default().push(entry.clone());
        }
    }

    result.links = Some(links);
}
