//! Source fetcher port
//!
//! Defines how a witness node retrieves one source. Adapters (randomness,
//! HTTP, simulated witnesses) live in the infrastructure layer.

use async_trait::async_trait;
use witness_domain::{FetchError, SourceDescriptor, Value};

/// Retrieval adapter for source descriptors.
///
/// A fetch must be free of side effects as far as the engine is concerned:
/// the engine may abandon it at any time (timeout or cancellation) by
/// dropping the future.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Retrieve the source and interpret its raw output.
    async fn fetch(&self, source: &SourceDescriptor) -> Result<Value, FetchError>;
}
