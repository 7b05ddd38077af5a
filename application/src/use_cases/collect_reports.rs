//! Collect reports use case
//!
//! The collection barrier: the only point where a round's witnesses meet.
//! Witness tasks push [`NodeEvent`]s into a bounded channel; the barrier
//! drains it until one of these closes it:
//!
//! ```text
//! every expected witness reported ............ AllReported
//! min_reports reached, then grace elapsed .... GraceElapsed
//! collection window elapsed .................. WindowElapsed
//! every sender dropped ....................... WitnessesExhausted
//! ```
//!
//! The grace period never extends the window. Reports still buffered when
//! the barrier closes are returned separately as late and never tallied.

use super::retrieve_and_aggregate::NodeEvent;
use std::collections::HashSet;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use witness_domain::{BarrierClose, NodeId, Report};

/// When the barrier closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionPolicy {
    pub window: Duration,
    pub grace: Duration,
    pub min_reports: usize,
    pub expected: usize,
}

/// What the barrier gathered.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    /// Accepted reports in arrival order.
    pub reports: Vec<Report>,
    pub closed_by: BarrierClose,
    /// Reports that were buffered but arrived after the close.
    pub late: Vec<Report>,
}

/// The round was cancelled while collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionCancelled;

/// Collect reports from `events` under `policy`.
///
/// `observe` sees every event the barrier accepts, in order: progress
/// announcements and first reports. Duplicate reports from the same node are
/// dropped without being observed.
pub async fn collect_reports(
    events: &mut mpsc::Receiver<NodeEvent>,
    policy: CollectionPolicy,
    cancel: &CancellationToken,
    mut observe: impl FnMut(&NodeEvent),
) -> Result<Collection, CollectionCancelled> {
    let window_end = Instant::now() + policy.window;
    let mut deadline = window_end;
    let mut quorum_reached = false;
    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut reports = Vec::new();

    let closed_by = loop {
        if reports.len() >= policy.expected {
            break BarrierClose::AllReported;
        }

        tokio::select! {
            biased;

            _ = cancel.cancelled() => return Err(CollectionCancelled),

            _ = tokio::time::sleep_until(deadline) => {
                break if deadline < window_end {
                    BarrierClose::GraceElapsed
                } else {
                    BarrierClose::WindowElapsed
                };
            }

            event = events.recv() => {
                let Some(event) = event else {
                    break BarrierClose::WitnessesExhausted;
                };
                if let NodeEvent::Reported(report) = &event
                    && !seen.insert(report.node_id.clone())
                {
                    debug!("Ignoring duplicate report from {}", report.node_id);
                    continue;
                }

                observe(&event);

                if let NodeEvent::Reported(report) = event {
                    reports.push(report);
                    if !quorum_reached && reports.len() >= policy.min_reports {
                        quorum_reached = true;
                        deadline = deadline.min(Instant::now() + policy.grace);
                        debug!("Minimum reports reached, closing within {:?}", policy.grace);
                    }
                }
            }
        }
    };

    let mut late = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let NodeEvent::Reported(report) = event
            && !seen.contains(&report.node_id)
        {
            late.push(report);
        }
    }

    Ok(Collection {
        reports,
        closed_by,
        late,
    })
}
