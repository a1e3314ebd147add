//! Domain types shared across Foodgram crates.
//!
//! Pure types only: no framework, database or HTTP dependencies.

pub mod color;
pub mod pagination;
pub mod user;
