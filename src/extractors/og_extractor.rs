//! OpenGraph meta tags extraction
//!
//! Extracts `og:` prefixed meta tags into a grouped, normalized result, and
//! runs a secondary grouping pass over the namespace named by a recognized
//! `og:type` value.

use scraper::{Html, Selector};

use crate::grouping::{group_tagged_properties, normalize_groups, GroupedResult, TaggedProperty};

use super::{ExtractionContext, ExtractionResult};

/// Content types that trigger the secondary, type-scoped extraction pass
pub const OG_TYPES: [&str; 5] = ["video", "music", "article", "book", "profile"];

/// Extract grouped OpenGraph data plus the optional type-scoped pass
pub fn extract_og(
    document: &Html,
    result: &mut ExtractionResult,
    _context: &ExtractionContext<'_>,
) {
    let properties = collect_tagged_properties(document, "og");
    let mut og = group_tagged_properties(&properties, &result.base_url);
    normalize_groups(&mut og);

    if let Some(og_type) = recognized_type(&og) {
        let prefix = og_type.split('.').next().unwrap_or_default().to_string();
        let properties = collect_tagged_properties(document, &prefix);
        // the secondary pass groups with fresh state and stays un-normalized
        result.og_type_data = Some(group_tagged_properties(&properties, &result.base_url));
        result.og_type = Some(og_type);
    }

    result.og = Some(og);
}

/// Full `type` value when its leading segment is a recognized content type
fn recognized_type(og: &GroupedResult) -> Option<String> {
    let value = og
        .get("type")?
        .first()?
        .value
        .as_ref()?
        .as_text()?;

    let leading = value.split('.').next().unwrap_or_default();
    OG_TYPES.contains(&leading).then(|| value.to_string())
}

/// Collect `property`/`content` pairs for one namespace, in document order
fn collect_tagged_properties(document: &Html, namespace: &str) -> Vec<TaggedProperty> {
    let selector = match Selector::parse(&format!(r#"meta[property^="{namespace}:"]"#)) {
        Ok(s) => s,
        Err(_) => return vec![],
    };

    document
        .select(&selector)
        .filter_map(|element| {
            element.value().attr("property").map(|property| {
                TaggedProperty::new(property, element.value().attr("content").unwrap_or(""))
            })
        })
        .collect()
}
