//! Service plumbing shared by Foodgram binaries: configuration, tracing,
//! health probes, request ids and serialization helpers.

pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
