//! Simulated witness behaviour
//!
//! Local runs have every witness on the same machine. A [`SimulatedFetcher`]
//! gives one of them a personality: a fixed latency, fetches that always
//! fail, or fetches that never return.

use crate::config::WitnessBehaviour;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use witness_application::SourceFetcher;
use witness_domain::{FetchError, SourceDescriptor, Value};

pub struct SimulatedFetcher {
    inner: Arc<dyn SourceFetcher>,
    behaviour: WitnessBehaviour,
    latency: Duration,
}

impl SimulatedFetcher {
    pub fn new(inner: Arc<dyn SourceFetcher>, behaviour: WitnessBehaviour) -> Self {
        Self {
            inner,
            behaviour,
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn behaviour(&self) -> WitnessBehaviour {
        self.behaviour
    }
}

#[async_trait]
impl SourceFetcher for SimulatedFetcher {
    async fn fetch(&self, source: &SourceDescriptor) -> Result<Value, FetchError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        match self.behaviour {
            WitnessBehaviour::Honest => self.inner.fetch(source).await,
            WitnessBehaviour::Failing => Err(FetchError::Unavailable(
                "simulated witness failure".to_string(),
            )),
            WitnessBehaviour::Silent => std::future::pending().await,
        }
    }
}

impl std::fmt::Debug for SimulatedFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedFetcher")
            .field("behaviour", &self.behaviour)
            .field("latency", &self.latency)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetchers::RandomFetcher;
    use tokio::time::Instant;

    fn simulated(behaviour: WitnessBehaviour) -> SimulatedFetcher {
        SimulatedFetcher::new(Arc::new(RandomFetcher), behaviour)
    }

    #[tokio::test(start_paused = true)]
    async fn test_honest_adds_latency() {
        let fetcher = simulated(WitnessBehaviour::Honest).with_latency(Duration::from_millis(250));
        let start = Instant::now();
        let value = fetcher.fetch(&SourceDescriptor::random()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(250));
        assert!(matches!(value, Value::Bytes(b) if b.len() == 32));
    }

    #[tokio::test]
    async fn test_failing_is_unavailable() {
        let result = simulated(WitnessBehaviour::Failing)
            .fetch(&SourceDescriptor::random())
            .await;
        assert!(matches!(result, Err(FetchError::Unavailable(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_never_answers() {
        let fetcher = simulated(WitnessBehaviour::Silent);
        let result = tokio::time::timeout(
            Duration::from_secs(60),
            fetcher.fetch(&SourceDescriptor::random()),
        )
        .await;
        assert!(result.is_err());
    }
}
