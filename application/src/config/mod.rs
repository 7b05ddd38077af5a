//! Application-level configuration.
//!
//! - [`EngineParams`]: collection window, grace period, fetch timeout and
//!   channel capacity for resolution rounds

pub mod engine_params;

pub use engine_params::EngineParams;
