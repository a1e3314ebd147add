//! Test utilities for Foodgram services.
//!
//! Import from `[dev-dependencies]` only.

pub mod auth;
