//! CLI command modules.

pub mod http;
pub mod listings;
pub mod report;
pub mod status;
