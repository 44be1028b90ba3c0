//! muster-core — shared listing types, ingestion wire types, sanitizer and config.
//! All other Muster crates depend on this one.

pub mod config;
pub mod listing;
pub mod sanitize;
pub mod wire;

pub use listing::{AggregateStats, ListingKey, ListingRecord};
pub use wire::{BatchItem, Operation, ServiceConfig};
