//! Tag grouping and normalization
//!
//! Folds a flat, document-ordered list of colon-delimited properties
//! (`og:image:width` style) into named groups of entries, then canonicalizes
//! the "value vs. properties" ambiguity and prunes empty containers.

use indexmap::IndexMap;
use serde::Serialize;

use crate::coerce::{coerce, PropertyValue};

/// Groups whose entries get `url`/`secure_url` promoted into `value`
const URL_VALUED_GROUPS: [&str; 3] = ["image", "video", "audio"];

/// One `property`/`content` attribute pair, in document order
#[derive(Debug, Clone)]
pub struct TaggedProperty {
    /// The namespaced key, e.g. `og:image:width`
    pub key: String,
    /// The raw attribute value
    pub value: String,
}

impl TaggedProperty {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One member of a named group, e.g. one `image` among several `og:image`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RootEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<PropertyValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, PropertyValue>>,
}

impl RootEntry {
    fn insert_property(&mut self, name: &str, value: PropertyValue) {
        self.properties
            .get_or_insert_with(IndexMap::new)
            .insert(name.to_string(), value);
    }

    fn has_properties(&self) -> bool {
        self.properties.as_ref().is_some_and(|p| !p.is_empty())
    }
}

/// Mapping from root-tag name to its document-ordered entries
pub type GroupedResult = IndexMap<String, Vec<RootEntry>>;

/// Fold tagged properties into a grouped result.
///
/// A new entry starts whenever a bare (sub-tag-less) key is seen or the root
/// tag changes from the immediately preceding property. A bare key whose value
/// coerces to empty retracts the entry it just started; sub-tags of the same
/// root seen after a retraction are dropped until a new entry starts.
///
/// Keys with no root tag, or with an empty sub-tag segment (`og:image:`),
/// are skipped as malformed. Groups left with zero entries stay in the map;
/// [`normalize_groups`] prunes them.
pub fn group_tagged_properties(properties: &[TaggedProperty], base_url: &str) -> GroupedResult {
    let mut groups = GroupedResult::new();
    let mut current_root: Option<String> = None;
    let mut has_current = false;

    for property in properties {
        let mut segments = property.key.splitn(3, ':');
        let _type_tag = segments.next();
        let root_tag = match segments.next() {
            Some(root) if !root.is_empty() => root,
            _ => continue,
        };
        let meta_tag = segments.next();
        if meta_tag == Some("") {
            continue;
        }

        let value = coerce(root_tag, meta_tag, &property.value, base_url);

        let starts_new = meta_tag.is_none() || current_root.as_deref() != Some(root_tag);
        if starts_new {
            current_root = Some(root_tag.to_string());
            has_current = true;
        }

        let entries = groups.entry(root_tag.to_string()).or_default();
        if starts_new {
            entries.push(RootEntry::default());
        }

        match meta_tag {
            Some(name) => {
                if has_current {
                    if let (Some(value), Some(entry)) = (value, entries.last_mut()) {
                        entry.insert_property(name, value);
                    }
                }
            }
            None => match value {
                Some(value) => {
                    if let Some(entry) = entries.last_mut() {
                        entry.value = Some(value);
                    }
                }
                None => {
                    // the optimistically appended entry turned out empty
                    entries.pop();
                    has_current = false;
                }
            },
        }
    }

    groups
}

/// Canonicalize a grouped result in place.
///
/// For the `image`/`video`/`audio` groups a `properties.url` is always
/// promoted to the entry `value`; `properties.secure_url` is promoted only
/// when no value exists. Entries in those groups must end up with a non-empty
/// value to survive. Finally every group drops entries that carry neither a
/// value nor properties, and groups left empty are removed.
pub fn normalize_groups(groups: &mut GroupedResult) {
    for key in URL_VALUED_GROUPS {
        if let Some(entries) = groups.get_mut(key) {
            for entry in entries.iter_mut() {
                promote_url_value(entry);
            }
            entries.retain(|entry| entry.value.as_ref().is_some_and(|v| v.is_meaningful()));
        }
    }

    groups.retain(|_, entries| {
        entries.retain(|entry| entry.value.is_some() || entry.has_properties());
        !entries.is_empty()
    });
}

fn promote_url_value(entry: &mut RootEntry) {
    let Some(properties) = entry.properties.as_mut() else {
        return;
    };

    if let Some(url) = properties.shift_remove("url") {
        entry.value = Some(url);
    } else if entry.value.is_none() {
        if let Some(secure) = properties.shift_remove("secure_url") {
            entry.value = Some(secure);
        }
    }

    if properties.is_empty() {
        entry.properties = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://example.com/page";

    fn props(pairs: &[(&str, &str)]) -> Vec<TaggedProperty> {
        pairs
            .iter()
            .map(|(k, v)| TaggedProperty::new(*k, *v))
            .collect()
    }

    fn text(s: &str) -> PropertyValue {
        PropertyValue::Text(s.to_string())
    }

    #[test]
    fn test_entry_with_sub_tag_properties() {
        let grouped = group_tagged_properties(
            &props(&[
                ("og:image", "http://a/1.png"),
                ("og:image:width", "100"),
            ]),
            BASE,
        );

        let images = &grouped["image"];
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].value, Some(text("http://a/1.png")));
        assert_eq!(
            images[0].properties.as_ref().unwrap()["width"],
            PropertyValue::Number(100)
        );
    }

    #[test]
    fn test_empty_root_value_retracts_entry() {
        let grouped = group_tagged_properties(&props(&[("og:title", "  ")]), BASE);
        assert_eq!(grouped["title"], vec![]);

        let mut grouped = grouped;
        normalize_groups(&mut grouped);
        assert!(!grouped.contains_key("title"));
    }

    #[test]
    fn test_sub_tags_after_retraction_are_dropped() {
        let grouped = group_tagged_properties(
            &props(&[("og:image", ""), ("og:image:width", "100")]),
            BASE,
        );
        // the retracted entry must not resurrect through its sub-tags
        assert_eq!(grouped["image"], vec![]);
    }

    #[test]
    fn test_root_switch_starts_new_entry() {
        let grouped = group_tagged_properties(
            &props(&[("og:image:width", "1"), ("og:video:width", "2")]),
            BASE,
        );

        assert_eq!(grouped["image"].len(), 1);
        assert_eq!(grouped["video"].len(), 1);
        assert_eq!(
            grouped["image"][0].properties.as_ref().unwrap()["width"],
            PropertyValue::Number(1)
        );
        assert_eq!(
            grouped["video"][0].properties.as_ref().unwrap()["width"],
            PropertyValue::Number(2)
        );
    }

    #[test]
    fn test_bare_tag_always_starts_new_entry() {
        let grouped = group_tagged_properties(
            &props(&[
                ("og:image", "http://a/1.png"),
                ("og:image", "http://a/2.png"),
            ]),
            BASE,
        );

        let images = &grouped["image"];
        assert_eq!(images.len(), 2);
        assert_eq!(images[0].value, Some(text("http://a/1.png")));
        assert_eq!(images[1].value, Some(text("http://a/2.png")));
    }

    #[test]
    fn test_malformed_keys_are_skipped() {
        let grouped = group_tagged_properties(
            &props(&[("og", "x"), ("og:", "y"), ("og:image:", "z")]),
            BASE,
        );
        assert!(grouped.is_empty());
    }

    #[test]
    fn test_empty_sub_tag_value_attaches_nothing() {
        let grouped = group_tagged_properties(
            &props(&[("og:image", "http://a/1.png"), ("og:image:alt", "  ")]),
            BASE,
        );
        assert_eq!(grouped["image"][0].properties, None);
    }

    #[test]
    fn test_url_promotion_overrides_value() {
        let mut grouped = group_tagged_properties(
            &props(&[
                ("og:image", "http://a/plain.png"),
                ("og:image:url", "http://a/canonical.png"),
                ("og:image:width", "10"),
            ]),
            BASE,
        );
        normalize_groups(&mut grouped);

        let entry = &grouped["image"][0];
        assert_eq!(entry.value, Some(text("http://a/canonical.png")));
        let properties = entry.properties.as_ref().unwrap();
        assert!(!properties.contains_key("url"));
        assert_eq!(properties["width"], PropertyValue::Number(10));
    }

    #[test]
    fn test_secure_url_promoted_only_without_value() {
        let mut grouped = group_tagged_properties(
            &props(&[("og:video:secure_url", "https://a/v.mp4")]),
            BASE,
        );
        normalize_groups(&mut grouped);

        let entry = &grouped["video"][0];
        assert_eq!(entry.value, Some(text("https://a/v.mp4")));
        assert_eq!(entry.properties, None);

        let mut grouped = group_tagged_properties(
            &props(&[
                ("og:video", "http://a/v.mp4"),
                ("og:video:secure_url", "https://a/v.mp4"),
            ]),
            BASE,
        );
        normalize_groups(&mut grouped);

        // value already present, secure_url stays a property
        let entry = &grouped["video"][0];
        assert_eq!(entry.value, Some(text("http://a/v.mp4")));
        assert_eq!(
            entry.properties.as_ref().unwrap()["secure_url"],
            text("https://a/v.mp4")
        );
    }

    #[test]
    fn test_valueless_image_entries_are_filtered() {
        let mut grouped = group_tagged_properties(&props(&[("og:image:width", "10")]), BASE);
        normalize_groups(&mut grouped);
        assert!(!grouped.contains_key("image"));
    }

    #[test]
    fn test_entries_without_value_or_properties_are_pruned() {
        let mut grouped = group_tagged_properties(&props(&[("og:title:foo", "")]), BASE);
        normalize_groups(&mut grouped);
        assert!(grouped.is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let mut grouped = group_tagged_properties(
            &props(&[
                ("og:image", "http://a/1.png"),
                ("og:image:width", "100"),
            ]),
            BASE,
        );
        normalize_groups(&mut grouped);

        let json = serde_json::to_value(&grouped).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "image": [{"value": "http://a/1.png", "properties": {"width": 100}}]
            })
        );
    }
}
