//! Core domain concepts shared across all subdomains.
//!
//! - [`value::Value`]: a retrieved or reduced data value
//! - [`node::NodeId`]: identity of a witnessing node
//! - [`error`]: the error taxonomy from construction to tally

pub mod error;
pub mod node;
pub mod value;
