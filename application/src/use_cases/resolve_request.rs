//! Resolve request use case
//!
//! [`ResolutionEngine`] owns the configured witness nodes and every submitted
//! round. A round runs when it is resolved:
//!
//! 1. one task per witness retrieves and aggregates (no shared state)
//! 2. the collection barrier gathers their reports
//! 3. the tally stage and the quorum gate settle the result
//!
//! Rounds are independent: each one has its own channel, its own tasks and
//! its own cancellation token, and nothing outlives it except the archived
//! [`ResolutionResult`].

use super::collect_reports::{CollectionPolicy, collect_reports};
use super::retrieve_and_aggregate::{NodeEvent, WitnessNode};
use crate::config::EngineParams;
use crate::ports::audit_log::{AuditEvent, NoAuditLog, ResolutionAuditLog};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use witness_domain::{Request, RequestId, ResolutionResult, RoundState};

/// Errors that can occur while resolving a round
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Unknown request: {0}")]
    UnknownRequest(RequestId),

    #[error("Request {0} is already being resolved")]
    AlreadyResolving(RequestId),

    #[error("Request {0} was cancelled")]
    Cancelled(RequestId),

    #[error("No witness nodes configured")]
    NoNodes,
}

enum RoundStart {
    Run(Arc<Request>, CancellationToken),
    Archived(ResolutionResult),
}

struct RoundEntry {
    request: Arc<Request>,
    state: RoundState,
    cancel: CancellationToken,
    result: Option<ResolutionResult>,
}

/// Cancels its round when dropped before the round settled.
struct RoundGuard<'a> {
    engine: &'a ResolutionEngine,
    id: RequestId,
    settled: bool,
}

impl Drop for RoundGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.engine.abandon(self.id);
        }
    }
}

/// Orchestrates resolution rounds over a fixed set of witnesses.
pub struct ResolutionEngine {
    nodes: Vec<WitnessNode>,
    params: EngineParams,
    audit: Arc<dyn ResolutionAuditLog>,
    rounds: Mutex<HashMap<RequestId, RoundEntry>>,
    next_id: AtomicU64,
}

impl ResolutionEngine {
    pub fn new(nodes: Vec<WitnessNode>, params: EngineParams) -> Self {
        Self {
            nodes,
            params,
            audit: Arc::new(NoAuditLog),
            rounds: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn with_audit_log(mut self, audit: Arc<dyn ResolutionAuditLog>) -> Self {
        self.audit = audit;
        self
    }

    pub fn nodes(&self) -> &[WitnessNode] {
        &self.nodes
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    fn rounds(&self) -> MutexGuard<'_, HashMap<RequestId, RoundEntry>> {
        self.rounds.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a request for resolution.
    ///
    /// Every submission gets a fresh id, so the same request submitted twice
    /// yields two independent rounds.
    pub fn submit(&self, request: Request) -> RequestId {
        let id = RequestId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        info!("Submitted {} ({} sources)", id, request.sources().len());
        self.audit
            .record(AuditEvent::request_submitted(id, &request));

        self.rounds().insert(
            id,
            RoundEntry {
                request: Arc::new(request),
                state: RoundState::Pending,
                cancel: CancellationToken::new(),
                result: None,
            },
        );
        id
    }

    /// Current state of a round, if it is known.
    pub fn state(&self, id: RequestId) -> Option<RoundState> {
        self.rounds().get(&id).map(|entry| entry.state)
    }

    /// Archived result of a resolved round.
    pub fn result(&self, id: RequestId) -> Option<ResolutionResult> {
        self.rounds().get(&id).and_then(|entry| entry.result.clone())
    }

    /// Withdraw a round.
    ///
    /// The round is marked cancelled on the spot. A running one is also
    /// interrupted: its witness tasks are abandoned and it never archives a
    /// result. Returns `false` when the round had already ended.
    pub fn cancel(&self, id: RequestId) -> Result<bool, ResolveError> {
        let mut rounds = self.rounds();
        let entry = rounds.get_mut(&id).ok_or(ResolveError::UnknownRequest(id))?;

        if entry.state.is_terminal() {
            return Ok(false);
        }

        let previous = entry.state;
        entry.state = RoundState::Cancelled;
        entry.cancel.cancel();
        drop(rounds);

        info!("Cancelled {} while {}", id, previous);
        self.audit.record(AuditEvent::round_cancelled(id));
        Ok(true)
    }

    /// Mark a round that stopped without settling as cancelled.
    ///
    /// No-op when the round already ended, so a round is audited as
    /// cancelled at most once.
    fn abandon(&self, id: RequestId) {
        let mut rounds = self.rounds();
        let Some(entry) = rounds.get_mut(&id) else {
            return;
        };
        if entry.state.is_terminal() {
            return;
        }
        entry.state = RoundState::Cancelled;
        entry.cancel.cancel();
        drop(rounds);

        info!("{} abandoned before settling", id);
        self.audit.record(AuditEvent::round_cancelled(id));
    }

    /// Forget a round, returning its result if it had one.
    ///
    /// A round still running is cancelled first.
    pub fn discard(&self, id: RequestId) -> Option<ResolutionResult> {
        let entry = self.rounds().remove(&id)?;
        if !entry.state.is_terminal() {
            entry.cancel.cancel();
        }
        entry.result
    }

    /// Resolve a round with default (no-op) progress
    pub async fn resolve(&self, id: RequestId) -> Result<ResolutionResult, ResolveError> {
        self.resolve_with_progress(id, &NoProgress).await
    }

    /// Resolve a round with progress callbacks
    ///
    /// Blocks until the round ends. Later calls return the archived result.
    pub async fn resolve_with_progress(
        &self,
        id: RequestId,
        progress: &dyn ProgressNotifier,
    ) -> Result<ResolutionResult, ResolveError> {
        let (request, cancel) = match self.start_round(id)? {
            RoundStart::Run(request, cancel) => (request, cancel),
            RoundStart::Archived(result) => return Ok(result),
        };

        info!(
            "Resolving {} with {} witnesses ({})",
            id,
            self.nodes.len(),
            request.quorum()
        );
        progress.on_round_start(id, self.nodes.len());

        // Marks the round cancelled if this future is dropped before it settles
        let mut guard = RoundGuard {
            engine: self,
            id,
            settled: false,
        };

        let Some(result) = self.run_round(id, &request, &cancel, progress).await else {
            return Err(ResolveError::Cancelled(id));
        };

        if !self.archive(id, &result) {
            return Err(ResolveError::Cancelled(id));
        }
        guard.settled = true;

        if result.is_accepted() {
            info!("{} accepted", id);
        } else if let Some(reason) = result.rejection() {
            info!("{} rejected: {}", id, reason);
        }
        self.audit.record(AuditEvent::round_resolved(id, &result));
        progress.on_round_complete(&result);
        Ok(result)
    }

    /// Store the result and mark the round resolved, unless it was
    /// cancelled (or discarded) in the meantime.
    fn archive(&self, id: RequestId, result: &ResolutionResult) -> bool {
        let mut rounds = self.rounds();
        match rounds.get_mut(&id) {
            Some(entry) if !entry.state.is_terminal() && !entry.cancel.is_cancelled() => {
                entry.result = Some(result.clone());
                entry.state = RoundState::Resolved;
                true
            }
            _ => false,
        }
    }

    /// Claim a round for resolution, or explain why it cannot run.
    fn start_round(&self, id: RequestId) -> Result<RoundStart, ResolveError> {
        let mut rounds = self.rounds();
        let entry = rounds.get_mut(&id).ok_or(ResolveError::UnknownRequest(id))?;

        match (entry.state, &entry.result) {
            (RoundState::Pending, _) => {}
            (RoundState::Resolved, Some(result)) => return Ok(RoundStart::Archived(result.clone())),
            (RoundState::Cancelled, _) => return Err(ResolveError::Cancelled(id)),
            _ => return Err(ResolveError::AlreadyResolving(id)),
        }

        if self.nodes.is_empty() {
            return Err(ResolveError::NoNodes);
        }

        entry.state = RoundState::Retrieving;
        Ok(RoundStart::Run(Arc::clone(&entry.request), entry.cancel.clone()))
    }

    /// Move a round forward, ignoring transitions that would go backwards.
    fn advance(&self, id: RequestId, next: RoundState) {
        if let Some(entry) = self.rounds().get_mut(&id)
            && entry.state.can_advance_to(next)
        {
            debug!("{}: {} -> {}", id, entry.state, next);
            entry.state = next;
        }
    }

    /// Run one round to completion; `None` if it was cancelled.
    async fn run_round(
        &self,
        id: RequestId,
        request: &Arc<Request>,
        cancel: &CancellationToken,
        progress: &dyn ProgressNotifier,
    ) -> Option<ResolutionResult> {
        let (tx, mut rx) = mpsc::channel(self.params.report_channel_capacity.max(1));
        let mut join_set = JoinSet::new();

        for node in &self.nodes {
            let node = node.clone();
            let request = Arc::clone(request);
            let tx = tx.clone();
            let fetch_timeout = self.params.fetch_timeout;
            join_set.spawn(async move { node.run(&request, fetch_timeout, tx).await });
        }
        // Only witness tasks hold senders now, so the channel closes when they all end
        drop(tx);

        let policy = CollectionPolicy {
            window: self.params.collection_window,
            grace: self.params.grace_period,
            min_reports: request.quorum().min_reports() as usize,
            expected: self.nodes.len(),
        };

        let collection = collect_reports(&mut rx, policy, cancel, |event| match event {
            NodeEvent::Retrieved {
                node,
                failed_sources,
            } => {
                self.advance(id, RoundState::Aggregating);
                self.audit
                    .record(AuditEvent::node_retrieved(id, node, *failed_sources));
                progress.on_node_retrieved(node, *failed_sources);
            }
            NodeEvent::Reported(report) => {
                self.advance(id, RoundState::Collecting);
                debug!("{}: report from {}", id, report.node_id);
                self.audit
                    .record(AuditEvent::report_received(id, report, false));
                progress.on_report(report);
            }
        })
        .await;

        join_set.abort_all();

        let collection = collection.ok()?;

        for report in &collection.late {
            warn!("{}: discarding late report from {}", id, report.node_id);
            self.audit
                .record(AuditEvent::report_received(id, report, true));
        }
        info!(
            "{}: barrier closed ({}) with {} reports",
            id,
            collection.closed_by,
            collection.reports.len()
        );
        self.audit.record(AuditEvent::barrier_closed(
            id,
            collection.closed_by,
            collection.reports.len(),
            collection.late.len(),
        ));
        progress.on_barrier_closed(collection.closed_by, collection.reports.len());

        if cancel.is_cancelled() {
            return None;
        }

        self.advance(id, RoundState::Tallying);
        let tally = request.tally().run(&collection.reports);
        if let Err(e) = &tally {
            warn!("{}: tally failed: {}", id, e);
        }

        self.advance(id, RoundState::Gating);
        Some(ResolutionResult::from_tally(
            request,
            &collection.reports,
            tally,
            collection.closed_by,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::source_fetcher::SourceFetcher;
    use async_trait::async_trait;
    use std::time::Duration;
    use witness_domain::{
        BarrierClose, FetchError, NodeId, RejectionReason, Report, SourceDescriptor, Value,
    };

    // ==================== Test Mocks ====================

    struct FixedFetcher(Value);

    #[async_trait]
    impl SourceFetcher for FixedFetcher {
        async fn fetch(&self, _source: &SourceDescriptor) -> Result<Value, FetchError> {
            Ok(self.0.clone())
        }
    }

    struct SilentFetcher;

    #[async_trait]
    impl SourceFetcher for SilentFetcher {
        async fn fetch(&self, _source: &SourceDescriptor) -> Result<Value, FetchError> {
            std::future::pending().await
        }
    }

    #[derive(Default)]
    struct RecordingAudit {
        events: Mutex<Vec<AuditEvent>>,
    }

    impl RecordingAudit {
        fn types(&self) -> Vec<&'static str> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .map(|e| e.event_type)
                .collect()
        }
    }

    impl ResolutionAuditLog for RecordingAudit {
        fn record(&self, event: AuditEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[derive(Default)]
    struct CountingProgress {
        reports: Mutex<usize>,
        closed: Mutex<Option<BarrierClose>>,
    }

    impl ProgressNotifier for CountingProgress {
        fn on_round_start(&self, _request: RequestId, _witnesses: usize) {}

        fn on_report(&self, _report: &Report) {
            *self.reports.lock().unwrap() += 1;
        }

        fn on_barrier_closed(&self, closed_by: BarrierClose, _reports: usize) {
            *self.closed.lock().unwrap() = Some(closed_by);
        }
    }

    fn honest(n: usize) -> Vec<WitnessNode> {
        (0..n)
            .map(|i| {
                WitnessNode::new(
                    format!("node-{}", i),
                    Arc::new(FixedFetcher(Value::Bytes(vec![i as u8; 32]))),
                )
            })
            .collect()
    }

    fn silent(n: usize) -> Vec<WitnessNode> {
        (0..n)
            .map(|i| WitnessNode::new(format!("silent-{}", i), Arc::new(SilentFetcher)))
            .collect()
    }

    fn params() -> EngineParams {
        EngineParams::default().with_fetch_timeout(Duration::from_secs(60))
    }

    // ==================== Scenarios ====================

    #[tokio::test(start_paused = true)]
    async fn test_eight_honest_witnesses_accept() {
        let engine = ResolutionEngine::new(honest(8), params());
        let id = engine.submit(Request::randomness());
        assert_eq!(engine.state(id), Some(RoundState::Pending));

        let result = engine.resolve(id).await.unwrap();

        assert!(result.is_accepted());
        assert_eq!(result.agreement_fraction, 1.0);
        assert_eq!(result.participating_report_count, 8);
        assert_eq!(result.closed_by, BarrierClose::AllReported);
        assert_eq!(
            result.tallied_nodes,
            (0..8)
                .map(|i| NodeId::new(format!("node-{}", i)))
                .collect::<Vec<_>>()
        );
        assert_eq!(engine.state(id), Some(RoundState::Resolved));

        let expected = Request::randomness().tally().run(
            &(0..8)
                .map(|i| Report::aggregated(format!("node-{}", i), Value::Bytes(vec![i as u8; 32])))
                .collect::<Vec<_>>(),
        );
        assert_eq!(result.final_value(), Some(&expected.unwrap().value));
    }

    #[tokio::test(start_paused = true)]
    async fn test_five_reports_before_window_rejects() {
        let mut nodes = honest(5);
        nodes.extend(silent(3));
        let engine = ResolutionEngine::new(nodes, params());
        let id = engine.submit(Request::randomness());

        let progress = CountingProgress::default();
        let result = engine.resolve_with_progress(id, &progress).await.unwrap();

        assert_eq!(
            result.rejection(),
            Some(&RejectionReason::InsufficientReports {
                received: 5,
                required: 8
            })
        );
        assert_eq!(result.closed_by, BarrierClose::WindowElapsed);
        assert_eq!(*progress.reports.lock().unwrap(), 5);
        assert_eq!(
            *progress.closed.lock().unwrap(),
            Some(BarrierClose::WindowElapsed)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_grace_period_closes_partial_collection() {
        let mut nodes = honest(8);
        nodes.extend(silent(2));
        let engine = ResolutionEngine::new(nodes, params());
        let id = engine.submit(Request::randomness());

        let start = tokio::time::Instant::now();
        let result = engine.resolve(id).await.unwrap();

        assert!(result.is_accepted());
        assert_eq!(result.closed_by, BarrierClose::GraceElapsed);
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_timeout_turns_silence_into_failed_reports() {
        let mut nodes = honest(6);
        nodes.extend(silent(2));
        let engine = ResolutionEngine::new(
            nodes,
            EngineParams::default().with_fetch_timeout(Duration::from_secs(1)),
        );
        let id = engine.submit(Request::randomness());

        let result = engine.resolve(id).await.unwrap();

        assert!(result.is_accepted());
        assert_eq!(result.participating_report_count, 8);
        assert_eq!(result.tallied_nodes.len(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_resolve_returns_archived_result() {
        let engine = ResolutionEngine::new(honest(8), params());
        let id = engine.submit(Request::randomness());
        let first = engine.resolve(id).await.unwrap();
        let second = engine.resolve(id).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(engine.result(id), Some(first));
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmission_is_an_independent_round() {
        let engine = ResolutionEngine::new(honest(8), params());
        let a = engine.submit(Request::randomness());
        let b = engine.submit(Request::randomness());
        assert_ne!(a, b);
        engine.resolve(a).await.unwrap();
        assert_eq!(engine.state(b), Some(RoundState::Pending));
    }

    // ==================== Errors and cancellation ====================

    #[tokio::test]
    async fn test_unknown_request() {
        let engine = ResolutionEngine::new(honest(1), params());
        let id = RequestId::new(99);
        assert_eq!(engine.resolve(id).await, Err(ResolveError::UnknownRequest(id)));
        assert_eq!(engine.cancel(id), Err(ResolveError::UnknownRequest(id)));
    }

    #[tokio::test]
    async fn test_no_nodes() {
        let engine = ResolutionEngine::new(Vec::new(), params());
        let id = engine.submit(Request::randomness());
        assert_eq!(engine.resolve(id).await, Err(ResolveError::NoNodes));
        assert_eq!(engine.state(id), Some(RoundState::Pending));
    }

    #[tokio::test]
    async fn test_cancel_pending_round() {
        let audit = Arc::new(RecordingAudit::default());
        let engine = ResolutionEngine::new(honest(8), params()).with_audit_log(audit.clone());
        let id = engine.submit(Request::randomness());

        assert_eq!(engine.cancel(id), Ok(true));
        assert_eq!(engine.state(id), Some(RoundState::Cancelled));
        assert_eq!(engine.resolve(id).await, Err(ResolveError::Cancelled(id)));
        assert_eq!(engine.cancel(id), Ok(false));
        assert_eq!(audit.types(), vec!["request_submitted", "round_cancelled"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_running_round() {
        let engine = Arc::new(ResolutionEngine::new(silent(8), params()));
        let id = engine.submit(Request::randomness());

        let running = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.resolve(id).await })
        };
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(engine.state(id), Some(RoundState::Retrieving));

        assert_eq!(engine.cancel(id), Ok(true));
        let outcome = running.await.unwrap();
        assert_eq!(outcome, Err(ResolveError::Cancelled(id)));
        assert_eq!(engine.state(id), Some(RoundState::Cancelled));
        assert!(engine.result(id).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_running_round_is_audited_once() {
        let audit = Arc::new(RecordingAudit::default());
        let engine = Arc::new(
            ResolutionEngine::new(silent(8), params()).with_audit_log(audit.clone()),
        );
        let id = engine.submit(Request::randomness());

        let running = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.resolve(id).await })
        };
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(engine.cancel(id), Ok(true));
        assert_eq!(engine.state(id), Some(RoundState::Cancelled));
        assert_eq!(running.await.unwrap(), Err(ResolveError::Cancelled(id)));
        assert_eq!(audit.types(), vec!["request_submitted", "round_cancelled"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_resolve_leaves_round_cancelled() {
        let audit = Arc::new(RecordingAudit::default());
        let engine = ResolutionEngine::new(silent(8), params()).with_audit_log(audit.clone());
        let id = engine.submit(Request::randomness());

        let outcome = tokio::time::timeout(Duration::from_secs(1), engine.resolve(id)).await;
        assert!(outcome.is_err());

        assert_eq!(engine.state(id), Some(RoundState::Cancelled));
        assert_eq!(engine.cancel(id), Ok(false));
        assert_eq!(engine.resolve(id).await, Err(ResolveError::Cancelled(id)));
        assert!(engine.result(id).is_none());
        assert_eq!(audit.types(), vec!["request_submitted", "round_cancelled"]);
    }

    #[tokio::test]
    async fn test_cancel_during_gating_wins_over_result() {
        let engine = ResolutionEngine::new(honest(8), params());
        let request = Request::randomness();
        let id = engine.submit(request.clone());

        assert!(matches!(engine.start_round(id), Ok(RoundStart::Run(..))));
        engine.advance(id, RoundState::Tallying);
        engine.advance(id, RoundState::Gating);
        assert_eq!(engine.cancel(id), Ok(true));

        let result = ResolutionResult::settle(&request, &[], BarrierClose::WindowElapsed);
        assert!(!engine.archive(id, &result));
        assert_eq!(engine.state(id), Some(RoundState::Cancelled));
        assert!(engine.result(id).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_discard_forgets_round() {
        let engine = ResolutionEngine::new(honest(8), params());
        let id = engine.submit(Request::randomness());
        let result = engine.resolve(id).await.unwrap();

        assert_eq!(engine.discard(id), Some(result));
        assert_eq!(engine.state(id), None);
        assert_eq!(engine.discard(id), None);
    }

    // ==================== Audit ====================

    #[tokio::test(start_paused = true)]
    async fn test_audit_trail_of_a_round() {
        let audit = Arc::new(RecordingAudit::default());
        let engine = ResolutionEngine::new(honest(2), params()).with_audit_log(audit.clone());
        let request = Request::builder()
            .add_source(SourceDescriptor::random())
            .aggregation(witness_domain::Stage::new(witness_domain::Reducer::Mode))
            .tally(witness_domain::Stage::new(
                witness_domain::Reducer::ConcatenateAndHash,
            ))
            .quorum(2, 51)
            .build()
            .unwrap();
        let id = engine.submit(request);
        engine.resolve(id).await.unwrap();

        let types = audit.types();
        assert_eq!(types.first(), Some(&"request_submitted"));
        assert_eq!(types.iter().filter(|t| **t == "node_retrieved").count(), 2);
        assert_eq!(types.iter().filter(|t| **t == "report_received").count(), 2);
        assert_eq!(&types[types.len() - 2..], &["barrier_closed", "round_resolved"]);
    }
}
