//! HTTP API handlers — exposes the registry as JSON and accepts reports.

pub mod listings;
pub mod status;

use std::path::PathBuf;

use muster_core::ServiceConfig;
use muster_services::Registry;

#[derive(Clone)]
pub struct ApiState {
    pub registry: Registry,
    /// Served verbatim at `GET /config`.
    pub service_config: ServiceConfig,
    /// Port the daemon listens on, reported by `/stats`.
    pub port: u16,
    /// Directory for the static file fallback.
    pub static_dir: PathBuf,
}

// Re-export handler functions for use in router setup.
pub use listings::{handle_get_listings, handle_put_listings};
pub use status::{handle_config, handle_stats};
