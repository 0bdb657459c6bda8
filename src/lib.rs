//! Web page metadata fetcher and extractor
//!
//! Fetches documents and extracts structured metadata from their markup:
//! - OpenGraph-style tagged properties, grouped and normalized
//! - Type-scoped secondary namespaces (video:, music:, article:, ...)
//! - Vendor meta properties (fb:, twitter:, generator)
//! - Link relations
//! - Selected response headers
//!
//! Batches fan out over many URLs, with results accumulated in-process or
//! delivered item by item to an external sink.

pub mod batch;
pub mod coerce;
pub mod error;
pub mod extractors;
pub mod grouping;
pub mod parser;
pub mod sink;
pub mod transport;

pub use batch::{BatchItem, BatchRequest};
pub use coerce::PropertyValue;
pub use error::{ExtractError, FetchError, SinkError, TransportError};
pub use extractors::{
    ExtractionContext, ExtractionResult, ExtractorFn, ExtractorRegistry, LinkEntry,
};
pub use grouping::{GroupedResult, RootEntry, TaggedProperty};
pub use parser::{FetchOptions, FetchResult, MetadataParser, ResultEnvelope};
pub use sink::{BatchSummary, ResultSink};
pub use transport::{HttpTransport, Response, Transport};
