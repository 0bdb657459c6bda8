//! Vendor meta properties extraction
//!
//! Collects two independent meta-tag families into one flat mapping:
//! `fb:` properties keyed by the full property name, and `twitter:` /
//! `generator` names keyed by the name attribute.

use indexmap::IndexMap;
use scraper::{Html, Selector};

use super::{ExtractionContext, ExtractionResult};

/// Extract vendor meta properties into `metaProperties`
pub fn extract_meta_properties(
    document: &Html,
    result: &mut ExtractionResult,
    _context: &ExtractionContext<'_>,
) {
    let mut properties: IndexMap<String, Vec<String>> = IndexMap::new();

    if let Ok(selector) = Selector::parse(r#"meta[property^="fb:"]"#) {
        for element in document.select(&selector) {
            if let Some(property) = element.value().attr("property") {
                let content = element.value().attr("content").unwrap_or("");
                properties
                    .entry(property.to_string())
                    .or_default()
                    .push(content.to_string());
            }
        }
    }

    if let Ok(selector) = Selector::parse(r#"meta[name^="twitter:"], meta[name="generator"]"#) {
        for element in document.select(&selector) {
            if let Some(name) = element.value().attr("name") {
                let content = element.value().attr("content").unwrap_or("");
                properties
                    .entry(name.to_string())
                    .or_default()
                    .push(content.to_string());
            }
        }
    }

    result.meta_properties = Some(properties);
}
