//! Metadata parser: document extraction entry point and single-item fetch
//!
//! [`MetadataParser`] owns the extractor registry and the transport. The
//! registry is process-lifetime mutable state; registration goes through
//! `&mut self`, so concurrent extraction and registration is ruled out at
//! the type level.

use std::sync::Arc;

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::coerce::resolve_url;
use crate::error::{ExtractError, FetchError};
use crate::extractors::{ExtractionContext, ExtractionResult, ExtractorFn, ExtractorRegistry};
use crate::transport::{HttpTransport, Response, Transport};

/// User agent appended to any caller-supplied fragment
pub const DEFAULT_USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Per-fetch options
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FetchOptions {
    /// Prefixed onto the default user agent when set
    pub user_agent: Option<String>,
}

/// The per-item fetch outcome; exactly one of `data` and `redirect` is set
/// on success paths
#[derive(Debug, Serialize)]
pub struct FetchResult {
    pub url: String,
    /// Opaque caller metadata, passed through unchanged
    pub meta: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ExtractionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

/// Success/error/redirect wrapper returned for every fetch
#[derive(Debug, Serialize)]
pub struct ResultEnvelope {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub result: FetchResult,
}

/// Fetches documents and runs the extractor registry over them
pub struct MetadataParser {
    registry: ExtractorRegistry,
    transport: Arc<dyn Transport>,
}

impl MetadataParser {
    pub fn new() -> Self {
        Self::with_transport(Arc::new(HttpTransport::new()))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            registry: ExtractorRegistry::with_defaults(),
            transport,
        }
    }

    /// Register a step; an existing name keeps its execution slot
    pub fn add_extractor(&mut self, name: &str, extractor: ExtractorFn) {
        self.registry.add_extractor(name, extractor);
    }

    pub fn remove_extractor(&mut self, name: &str) {
        self.registry.remove_extractor(name);
    }

    pub fn registry(&self) -> &ExtractorRegistry {
        &self.registry
    }

    /// Extract metadata from one document.
    ///
    /// The base URL comes from an in-document `<base href>` resolved against
    /// the reference URL, falling back to the reference URL itself. An
    /// unparseable reference URL is returned as an error value.
    pub fn extract(
        &self,
        url: &str,
        html: &str,
        response: Option<&Response>,
    ) -> Result<ExtractionResult, ExtractError> {
        let reference = Url::parse(url)?;
        let document = Html::parse_document(html);

        let base_url = base_href(&document)
            .and_then(|href| reference.join(&href).ok())
            .map_or_else(|| url.to_string(), |resolved| resolved.to_string());

        let mut result = ExtractionResult {
            base_url,
            ..Default::default()
        };
        let context = ExtractionContext { url, response };
        self.registry.run(&document, &mut result, &context);

        Ok(result)
    }

    /// Fetch one document and extract it, mapping the transport outcome into
    /// a single [`ResultEnvelope`]
    pub async fn fetch(&self, url: &str, meta: Value, options: &FetchOptions) -> ResultEnvelope {
        tracing::debug!(url, "fetching");

        let mut envelope = ResultEnvelope {
            error: None,
            result: FetchResult {
                url: url.to_string(),
                meta,
                data: None,
                redirect: None,
            },
        };

        let response = match self.transport.get(url, &request_headers(options)).await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(url, error = %e, "transport error");
                envelope.error = Some(FetchError::from(e).to_string());
                return envelope;
            }
        };

        if response.status >= 300 {
            match response.header("location") {
                Some(location) if response.status < 400 => {
                    envelope.result.redirect = Some(resolve_url(url, location));
                }
                _ => {
                    envelope.error =
                        Some(FetchError::InvalidStatus(response.status).to_string());
                }
            }
            return envelope;
        }

        match self.extract(url, &response.body, Some(&response)) {
            Ok(data) => envelope.result.data = Some(data),
            Err(e) => envelope.error = Some(FetchError::from(e).to_string()),
        }

        envelope
    }
}

impl Default for MetadataParser {
    fn default() -> Self {
        Self::new()
    }
}

fn base_href(document: &Html) -> Option<String> {
    let selector = Selector::parse("base").ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .map(String::from)
}

fn request_headers(options: &FetchOptions) -> Vec<(String, String)> {
    let user_agent = match &options.user_agent {
        Some(fragment) => format!("{fragment} {DEFAULT_USER_AGENT}").trim().to_string(),
        None => DEFAULT_USER_AGENT.to_string(),
    };

    vec![
        ("user-agent".to_string(), user_agent),
        ("accept".to_string(), ACCEPT.to_string()),
    ]
}
