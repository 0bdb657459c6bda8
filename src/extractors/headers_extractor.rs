//! Response header extraction
//!
//! Copies the selected headers from the transport response into the result.
//! Only runs usefully when extraction follows a fetch; a direct extract call
//! has no response and yields an empty header map.

use indexmap::IndexMap;
use scraper::Html;

use super::{ExtractionContext, ExtractionResult};

/// Response headers worth surfacing alongside document metadata
const EXTRACTED_HEADERS: [&str; 1] = ["x-frame-options"];

/// Extract the header subset into `headers`
pub fn extract_headers(
    _document: &Html,
    result: &mut ExtractionResult,
    context: &ExtractionContext<'_>,
) {
    let mut headers = IndexMap::new();

    if let Some(response) = context.response {
        for name in EXTRACTED_HEADERS {
            if let Some(value) = response.header(name) {
                headers.insert(name.to_string(), value.to_string());
            }
        }
    }

    result.headers = Some(headers);
}
