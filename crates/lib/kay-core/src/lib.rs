//! Core catalogs and storage for kay-query.
//!
//! This crate owns the closed query and config catalogs, the control plane
//! that fronts them, the read-only `PostgreSQL` store, and the preflight
//! checklist operators run before handing out credentials.

pub mod catalog;
pub mod control;
pub mod preflight;
pub mod store;
