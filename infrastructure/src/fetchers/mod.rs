//! Source fetchers: adapters implementing the
//! [`SourceFetcher`](witness_application::SourceFetcher) port.
//!
//! | Fetcher | Sources | Notes |
//! |---------|---------|-------|
//! | [`RandomFetcher`] | `random` | thread-local RNG |
//! | [`HttpFetcher`] | `http_get` | needs the `http-source` feature |
//! | [`SourceRouter`] | any | dispatches by source kind |
//! | [`SimulatedFetcher`] | any | wraps another fetcher with witness behaviour |

mod random;
mod router;
mod simulated;

#[cfg(feature = "http-source")]
mod http;

#[cfg(feature = "http-source")]
pub use http::HttpFetcher;
pub use random::RandomFetcher;
pub use router::SourceRouter;
pub use simulated::SimulatedFetcher;
