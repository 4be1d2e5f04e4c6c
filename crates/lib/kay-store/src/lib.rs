//! Response models and schema constants for kay-query.
//!
//! This crate defines the envelope shapes every catalog answers with and the
//! fixed table names the gateway is allowed to touch.

pub mod models;
pub mod schema;

pub use models::*;
