//! artifactory-exporter crate
//!
//! This crate is an implementation detail of the `artifactory-exporter` tool. This crate's API is fluid and may change
//! without warning and in a semver-incompatible way.

/// Result type alias using [`error::Error`] as the default error type.
pub type Result<T, E = error::Error> = core::result::Result<T, E>;

pub mod client;

pub mod collector;

pub mod error;

pub mod metrics;

pub mod server;
