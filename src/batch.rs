//! Batch orchestration
//!
//! Fans out single-item fetches over a collection of references. All fetches
//! are issued up front and observed in completion order; items without a URL
//! are skipped and never counted. Results go either into an in-process list
//! or, item by item, to a [`ResultSink`].

use futures::stream::{FuturesUnordered, StreamExt};
use serde::Deserialize;
use serde_json::Value;

use crate::parser::{FetchOptions, MetadataParser, ResultEnvelope};
use crate::sink::{BatchSummary, ResultSink};

/// One reference to fetch plus opaque caller metadata
#[derive(Debug, Clone, Deserialize)]
pub struct BatchItem {
    /// Items without a URL are skipped silently
    pub url: Option<String>,
    #[serde(default = "empty_meta")]
    pub meta: Value,
}

impl BatchItem {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            meta: empty_meta(),
        }
    }
}

/// A batch of references with shared fetch options.
///
/// The typed `batch` field makes a descriptor without a proper collection
/// unrepresentable; a malformed JSON descriptor fails deserialization before
/// any fetch is issued.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchRequest {
    pub batch: Vec<BatchItem>,
    #[serde(default)]
    pub options: FetchOptions,
}

fn empty_meta() -> Value {
    Value::Object(serde_json::Map::new())
}

impl MetadataParser {
    /// Fetch every batch item and return the envelopes in completion order.
    ///
    /// Input order determines issuance order only; whichever response lands
    /// first appears first.
    pub async fn fetch_batch(&self, request: &BatchRequest) -> Vec<ResultEnvelope> {
        let mut in_flight: FuturesUnordered<_> = request
            .batch
            .iter()
            .filter_map(|item| item.url.as_deref().map(|url| (url, item.meta.clone())))
            .map(|(url, meta)| self.fetch(url, meta, &request.options))
            .collect();

        let mut results = Vec::with_capacity(in_flight.len());
        while let Some(envelope) = in_flight.next().await {
            results.push(envelope);
        }

        results
    }

    /// Fetch every batch item, delivering each envelope to `sink` as it
    /// completes. An item counts as complete only once its delivery is
    /// confirmed; delivery failures are logged and do not abort siblings.
    /// After the last confirmation, `sink.done` is called exactly once.
    pub async fn fetch_batch_to_sink(
        &self,
        request: &BatchRequest,
        sink: &dyn ResultSink,
    ) -> BatchSummary {
        let mut in_flight: FuturesUnordered<_> = request
            .batch
            .iter()
            .filter_map(|item| item.url.as_deref().map(|url| (url, item.meta.clone())))
            .map(|(url, meta)| async move {
                tracing::info!(url, "fetching");
                let envelope = self.fetch(url, meta, &request.options).await;
                match sink.deliver(&envelope).await {
                    Ok(()) => tracing::info!(url = %envelope.result.url, "sent result"),
                    Err(e) => {
                        tracing::error!(url = %envelope.result.url, error = %e, "error sending result");
                    }
                }
            })
            .collect();

        let fetched = in_flight.len();
        while in_flight.next().await.is_some() {}

        let summary = BatchSummary::new(request.batch.len(), fetched);
        sink.done(&summary).await;
        summary
    }
}
