//! Result delivery strategies for batch fetching
//!
//! A batch either accumulates envelopes in-process or hands each one to a
//! [`ResultSink`], the seam for external delivery targets such as a message
//! queue. The sink confirms each delivery and receives one final completion
//! notification.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::SinkError;
use crate::parser::ResultEnvelope;

/// Completion summary for a sink-delivered batch.
///
/// `requested` counts every batch item including URL-less skipped ones,
/// `fetched` counts the fetches actually issued; both are kept because the
/// completion message historically reports the former.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub requested: usize,
    pub fetched: usize,
    pub message: String,
}

impl BatchSummary {
    pub fn new(requested: usize, fetched: usize) -> Self {
        Self {
            requested,
            fetched,
            message: format!("Fetched {requested} items"),
        }
    }
}

/// Asynchronous per-item result delivery with a final completion signal
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Deliver one envelope; an item only counts as complete once this
    /// confirms
    async fn deliver(&self, envelope: &ResultEnvelope) -> Result<(), SinkError>;

    /// Called exactly once, after every attempted item has been delivered
    async fn done(&self, summary: &BatchSummary);
}
