//! Foundation types for cozy.
//!
//! Shared by every cozy crate: the error taxonomy surfaced at the
//! dispatcher boundary, resolved [`address::Address`] values, scheme
//! capabilities, and the on-disk configuration layout.

pub mod address;
pub mod config;
pub mod error;
pub mod scheme;
