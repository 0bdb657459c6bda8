//! Extraction steps and their registry
//!
//! Each extractor is a named step `(document, result, context)` that writes
//! its contribution into the shared [`ExtractionResult`]. The registry runs
//! steps strictly in registration order.

mod headers_extractor;
mod links_extractor;
mod meta_properties_extractor;
mod og_extractor;

pub use headers_extractor::extract_headers;
pub use links_extractor::{extract_links, LinkEntry};
pub use meta_properties_extractor::extract_meta_properties;
pub use og_extractor::{extract_og, OG_TYPES};

use indexmap::IndexMap;
use scraper::Html;
use serde::Serialize;
use serde_json::Value;

use crate::grouping::GroupedResult;
use crate::transport::Response;

/// Shared context handed to every extraction step
pub struct ExtractionContext<'a> {
    /// The reference URL the document was fetched from
    pub url: &'a str,
    /// The transport response, when extraction runs after a fetch
    pub response: Option<&'a Response>,
}

/// The accumulating per-document result
///
/// Serializes with the wire field names; `extra` is flattened so custom
/// extractors can contribute keys of their own.
#[derive(Debug, Default, Serialize)]
pub struct ExtractionResult {
    #[serde(rename = "baseUrl")]
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og: Option<GroupedResult>,
    /// Full `og:type` value when it names a recognized content type
    #[serde(rename = "ogType", skip_serializing_if = "Option::is_none")]
    pub og_type: Option<String>,
    /// Secondary grouped result scoped to the recognized type's namespace
    #[serde(rename = "ogTypeData", skip_serializing_if = "Option::is_none")]
    pub og_type_data: Option<GroupedResult>,
    #[serde(rename = "metaProperties", skip_serializing_if = "Option::is_none")]
    pub meta_properties: Option<IndexMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<IndexMap<String, Vec<LinkEntry>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<IndexMap<String, String>>,
    #[serde(flatten, skip_serializing_if = "IndexMap::is_empty")]
    pub extra: IndexMap<String, Value>,
}

/// One extraction step
pub type ExtractorFn =
    Box<dyn Fn(&Html, &mut ExtractionResult, &ExtractionContext<'_>) + Send + Sync>;

/// Ordered, named, mutable list of extraction steps.
///
/// Re-registering an existing name swaps the step in place: the name keeps
/// its original execution slot, only the function changes.
pub struct ExtractorRegistry {
    extractors: IndexMap<String, ExtractorFn>,
    order: Vec<String>,
}

impl ExtractorRegistry {
    /// Registry with the default steps: og, metaProperties, links, headers
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.add_extractor("og", Box::new(extract_og));
        registry.add_extractor("metaProperties", Box::new(extract_meta_properties));
        registry.add_extractor("links", Box::new(extract_links));
        registry.add_extractor("headers", Box::new(extract_headers));
        registry
    }

    pub fn empty() -> Self {
        Self {
            extractors: IndexMap::new(),
            order: Vec::new(),
        }
    }

    pub fn add_extractor(&mut self, name: &str, extractor: ExtractorFn) {
        if !self.extractors.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.extractors.insert(name.to_string(), extractor);
    }

    /// Remove a step; unknown names are a no-op
    pub fn remove_extractor(&mut self, name: &str) {
        if self.extractors.shift_remove(name).is_some() {
            self.order.retain(|n| n != name);
        }
    }

    pub fn names(&self) -> &[String] {
        &self.order
    }

    /// Run every step in order against one parsed document
    pub fn run(
        &self,
        document: &Html,
        result: &mut ExtractionResult,
        context: &ExtractionContext<'_>,
    ) {
        for name in &self.order {
            if let Some(extractor) = self.extractors.get(name) {
                extractor(document, result, context);
            }
        }
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> ExtractorFn {
        Box::new(|_, _, _| {})
    }

    fn marker(key: &'static str) -> ExtractorFn {
        Box::new(move |_, result, _| {
            result
                .extra
                .insert("ran".to_string(), Value::String(key.to_string()));
        })
    }

    #[test]
    fn test_default_order() {
        let registry = ExtractorRegistry::with_defaults();
        assert_eq!(
            registry.names(),
            ["og", "metaProperties", "links", "headers"]
        );
    }

    #[test]
    fn test_re_registration_keeps_slot() {
        let mut registry = ExtractorRegistry::with_defaults();
        registry.add_extractor("metaProperties", noop());
        assert_eq!(
            registry.names(),
            ["og", "metaProperties", "links", "headers"]
        );
    }

    #[test]
    fn test_re_registration_swaps_function() {
        let mut registry = ExtractorRegistry::empty();
        registry.add_extractor("step", marker("first"));
        registry.add_extractor("step", marker("second"));

        let document = Html::parse_document("<html></html>");
        let mut result = ExtractionResult::default();
        let context = ExtractionContext {
            url: "http://example.com/",
            response: None,
        };
        registry.run(&document, &mut result, &context);

        assert_eq!(result.extra["ran"], Value::String("second".to_string()));
    }

    #[test]
    fn test_remove_extractor() {
        let mut registry = ExtractorRegistry::with_defaults();
        registry.remove_extractor("links");
        assert_eq!(registry.names(), ["og", "metaProperties", "headers"]);

        // unknown name is a no-op
        registry.remove_extractor("nope");
        assert_eq!(registry.names(), ["og", "metaProperties", "headers"]);
    }
}
