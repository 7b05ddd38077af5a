//! Retrieve and aggregate use case
//!
//! One witness node's part of a round: fetch every source concurrently, put
//! the results back into declaration order, and reduce them with the
//! request's aggregation stage.

use crate::ports::source_fetcher::SourceFetcher;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use witness_domain::{FetchError, NodeId, Report, Request, SourceDescriptor, Value};

/// A witness taking part in rounds.
///
/// Nodes share nothing mutable with each other; each one only needs its own
/// fetcher.
#[derive(Clone)]
pub struct WitnessNode {
    pub id: NodeId,
    pub fetcher: Arc<dyn SourceFetcher>,
}

impl WitnessNode {
    pub fn new(id: impl Into<NodeId>, fetcher: Arc<dyn SourceFetcher>) -> Self {
        Self {
            id: id.into(),
            fetcher,
        }
    }

    /// Fetch every source, each bounded by `fetch_timeout`.
    ///
    /// Fetches run concurrently but results come back in declaration order,
    /// never completion order.
    pub async fn retrieve(
        &self,
        sources: &[SourceDescriptor],
        fetch_timeout: Duration,
    ) -> Vec<Result<Value, FetchError>> {
        let mut pending: FuturesUnordered<_> = sources
            .iter()
            .enumerate()
            .map(|(index, source)| async move {
                let result = match tokio::time::timeout(fetch_timeout, self.fetcher.fetch(source)).await {
                    Ok(result) => result,
                    Err(_) => Err(FetchError::Timeout),
                };
                (index, result)
            })
            .collect();

        let mut results = Vec::with_capacity(sources.len());
        while let Some(item) = pending.next().await {
            results.push(item);
        }

        results.sort_by_key(|(index, _)| *index);
        results.into_iter().map(|(_, result)| result).collect()
    }

    /// Retrieve and aggregate, producing this node's report.
    pub async fn report(&self, request: &Request, fetch_timeout: Duration) -> Report {
        let retrievals = self.retrieve(request.sources(), fetch_timeout).await;
        self.aggregate(request, retrievals)
    }

    fn aggregate(&self, request: &Request, retrievals: Vec<Result<Value, FetchError>>) -> Report {
        let result = request.aggregation().run(retrievals);
        if let Err(e) = &result {
            warn!("Witness {} failed to aggregate: {}", self.id, e);
        }
        Report::from_result(self.id.clone(), result)
    }

    /// Run this node's part of a round, announcing progress on `events`.
    ///
    /// Send failures mean the barrier already closed; the node just stops.
    pub async fn run(
        &self,
        request: &Request,
        fetch_timeout: Duration,
        events: mpsc::Sender<NodeEvent>,
    ) {
        let retrievals = self.retrieve(request.sources(), fetch_timeout).await;
        let failed = retrievals.iter().filter(|r| r.is_err()).count();
        debug!(
            "Witness {} retrieved {} sources ({} failed)",
            self.id,
            retrievals.len(),
            failed
        );

        let retrieved = NodeEvent::Retrieved {
            node: self.id.clone(),
            failed_sources: failed,
        };
        if events.send(retrieved).await.is_err() {
            return;
        }

        let report = self.aggregate(request, retrievals);
        let _ = events.send(NodeEvent::Reported(report)).await;
    }
}

impl std::fmt::Debug for WitnessNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WitnessNode").field("id", &self.id).finish()
    }
}

/// Message from a witness task to the collection barrier.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeEvent {
    /// All sources were fetched (some possibly failed).
    Retrieved { node: NodeId, failed_sources: usize },
    /// The node's final report for the round.
    Reported(Report),
}
