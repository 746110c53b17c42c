//! Sponsored user-operation pipeline: build, sponsor, sign and submit
//! operations against a community bundler node, then wait for confirmation.

mod error;
mod service;

pub use error::BundlerError;
pub use service::{BundlerService, TransferEventData};
