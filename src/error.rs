//! Error taxonomy
//!
//! Extraction errors are returned as values and folded into the per-item
//! result envelope; nothing in the pipeline panics on bad remote content.

use thiserror::Error;

/// Transport failure: no usable HTTP response
#[derive(Debug, Clone, Error)]
#[error("request failed: {0}")]
pub struct TransportError(pub String);

/// Document-level extraction failure, returned as a value rather than raised
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    /// The reference URL itself does not parse, so no base URL can exist
    #[error("invalid document url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Everything a single fetch can fail with
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Status >= 300 without a usable redirect target
    #[error("Invalid response. Code {0}")]
    InvalidStatus(u16),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Remote sink delivery failure; logged by the orchestrator, never raised
#[derive(Debug, Clone, Error)]
#[error("result delivery failed: {0}")]
pub struct SinkError(pub String);
