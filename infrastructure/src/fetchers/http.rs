//! HTTP GET source
//!
//! The response body is read in full and handed to the source's
//! [`ValueKind`](witness_domain::ValueKind) for interpretation. Non-success
//! statuses and transport errors are reported as unavailable; request
//! timeouts as [`FetchError::Timeout`].

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use witness_application::SourceFetcher;
use witness_domain::{FetchError, SourceDescriptor, Value};

/// Upper bound on a response body.
const MAX_BODY_SIZE: usize = 1024 * 1024;

const USER_AGENT: &str = concat!("WitnessQuorum/", env!("CARGO_PKG_VERSION"));

/// Answers `http_get` sources with a shared [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn transport_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Unavailable(e.to_string())
    }
}

#[async_trait]
impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, source: &SourceDescriptor) -> Result<Value, FetchError> {
        let SourceDescriptor::HttpGet { url, interpret } = source else {
            return Err(FetchError::Unsupported(source.kind_name().to_string()));
        };

        let response = self.client.get(url).send().await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Unavailable(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        if response.content_length().unwrap_or(0) > MAX_BODY_SIZE as u64 {
            return Err(FetchError::Malformed(format!(
                "response larger than {} bytes",
                MAX_BODY_SIZE
            )));
        }

        let body = response.bytes().await.map_err(transport_error)?;
        if body.len() > MAX_BODY_SIZE {
            return Err(FetchError::Malformed(format!(
                "response larger than {} bytes",
                MAX_BODY_SIZE
            )));
        }
        debug!("Fetched {} bytes from {}", body.len(), url);

        interpret.interpret(&body)
    }
}
