//! Randomness source

use async_trait::async_trait;
use rand::RngCore;
use witness_application::SourceFetcher;
use witness_domain::{FetchError, SourceDescriptor, Value};

/// Answers `random` sources with fresh bytes from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomFetcher;

impl RandomFetcher {
    pub fn generate(size: u16) -> Value {
        let mut bytes = vec![0u8; usize::from(size)];
        rand::thread_rng().fill_bytes(&mut bytes);
        Value::Bytes(bytes)
    }
}

#[async_trait]
impl SourceFetcher for RandomFetcher {
    async fn fetch(&self, source: &SourceDescriptor) -> Result<Value, FetchError> {
        match source {
            SourceDescriptor::Random { size } => Ok(Self::generate(*size)),
            other => Err(FetchError::Unsupported(other.kind_name().to_string())),
        }
    }
}
