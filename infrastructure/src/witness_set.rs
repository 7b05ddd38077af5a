//! Witness set assembly
//!
//! Turns the `[witnesses]` section into the nodes an engine runs. Every
//! node shares one [`SourceRouter`] behind its own simulated behaviour.

use crate::config::{FileWitnessesConfig, WitnessBehaviour};
use crate::fetchers::{SimulatedFetcher, SourceRouter};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use witness_application::{SourceFetcher, WitnessNode};

/// Build the configured witness nodes on top of `router`.
pub fn build_witnesses(config: &FileWitnessesConfig, router: SourceRouter) -> Vec<WitnessNode> {
    let shared: Arc<dyn SourceFetcher> = Arc::new(router);
    let latency = Duration::from_millis(config.latency_ms);

    config
        .ids()
        .into_iter()
        .map(|id| {
            let behaviour = config.behaviour_of(&id);
            if behaviour != WitnessBehaviour::Honest {
                debug!("Witness {} simulated as {:?}", id, behaviour);
            }
            let fetcher = SimulatedFetcher::new(Arc::clone(&shared), behaviour).with_latency(latency);
            WitnessNode::new(id, Arc::new(fetcher))
        })
        .collect()
}
