//! Value coercion for tagged properties
//!
//! Converts raw attribute strings into typed values based on the semantic
//! role of the property name: URL resolution for URL-bearing names, integer
//! parsing for dimensions, passthrough for everything else.

use serde::Serialize;
use url::Url;

/// Property names whose values are resolved as URLs against the base URL
const URL_PROPERTIES: [&str; 5] = ["url", "secure_url", "image", "video", "audio"];

/// A coerced property value
///
/// Serializes untagged, so `Text` becomes a JSON string and `Number` a JSON
/// integer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    Number(i64),
}

impl PropertyValue {
    /// Whether the value counts as present for filtering purposes
    pub fn is_meaningful(&self) -> bool {
        match self {
            PropertyValue::Text(s) => !s.is_empty(),
            PropertyValue::Number(_) => true,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            PropertyValue::Number(_) => None,
        }
    }
}

/// Coerce a raw attribute value for the property named by `meta_tag` if
/// present, else `root_tag`.
///
/// Returns `None` when the value is empty after trimming, or when a
/// `width`/`height` sub-tag carries no parseable number. Malformed input
/// never errors, it degrades to `None`.
pub fn coerce(
    root_tag: &str,
    meta_tag: Option<&str>,
    raw: &str,
    base_url: &str,
) -> Option<PropertyValue> {
    let value = raw.trim();

    if value.is_empty() {
        return None;
    }

    let effective = meta_tag.unwrap_or(root_tag);

    if URL_PROPERTIES.contains(&effective) {
        return Some(PropertyValue::Text(resolve_url(base_url, value)));
    }

    if matches!(meta_tag, Some("width") | Some("height")) {
        return parse_leading_int(value).map(PropertyValue::Number);
    }

    Some(PropertyValue::Text(value.to_string()))
}

/// Resolve `value` relative to `base_url`, falling back to `value` unchanged
/// when either side does not parse
pub fn resolve_url(base_url: &str, value: &str) -> String {
    match Url::parse(base_url).and_then(|base| base.join(value)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => value.to_string(),
    }
}

/// Base-10 integer parse that accepts trailing garbage, like `parseInt`:
/// an optional sign followed by leading digits ("100px" parses to 100)
fn parse_leading_int(value: &str) -> Option<i64> {
    let (sign, rest) = match value.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, value.strip_prefix('+').unwrap_or(value)),
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<i64>().ok().map(|n| sign * n)
}
