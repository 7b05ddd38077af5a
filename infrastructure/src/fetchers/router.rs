//! Source routing
//!
//! Routes each source to the fetcher registered for its kind, the way a
//! witness node owns one adapter per kind of external provider.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use witness_application::SourceFetcher;
use witness_domain::{FetchError, SourceDescriptor, Value};

use super::RandomFetcher;

/// Dispatches fetches by [`SourceDescriptor::kind_name`].
#[derive(Clone, Default)]
pub struct SourceRouter {
    routes: HashMap<&'static str, Arc<dyn SourceFetcher>>,
}

impl SourceRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Router for every kind this build supports.
    ///
    /// `http_get` is only routed when the `http-source` feature is enabled;
    /// otherwise such sources fail as unsupported.
    pub fn standard(http_timeout: Duration) -> Self {
        let router = Self::new().route("random", Arc::new(RandomFetcher));

        #[cfg(feature = "http-source")]
        let router = match super::HttpFetcher::new(http_timeout) {
            Ok(http) => router.route("http_get", Arc::new(http)),
            Err(e) => {
                tracing::warn!("HTTP sources disabled: {}", e);
                router
            }
        };
        #[cfg(not(feature = "http-source"))]
        let _ = http_timeout;

        router
    }

    /// Register `fetcher` for sources of `kind`, replacing any previous one.
    pub fn route(mut self, kind: &'static str, fetcher: Arc<dyn SourceFetcher>) -> Self {
        self.routes.insert(kind, fetcher);
        self
    }

    pub fn supports(&self, kind: &str) -> bool {
        self.routes.contains_key(kind)
    }
}

#[async_trait]
impl SourceFetcher for SourceRouter {
    async fn fetch(&self, source: &SourceDescriptor) -> Result<Value, FetchError> {
        match self.routes.get(source.kind_name()) {
            Some(fetcher) => fetcher.fetch(source).await,
            None => Err(FetchError::Unsupported(format!(
                "no fetcher for {} sources",
                source.kind_name()
            ))),
        }
    }
}

impl std::fmt::Debug for SourceRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.routes.keys().collect();
        kinds.sort();
        f.debug_struct("SourceRouter").field("kinds", &kinds).finish()
    }
}
