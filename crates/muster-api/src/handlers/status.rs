//! /config and /stats handlers.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use muster_core::{AggregateStats, ServiceConfig};

use super::ApiState;

// ── /config ──────────────────────────────────────────────────────────────────

pub async fn handle_config(State(state): State<ApiState>) -> Json<ServiceConfig> {
    Json(state.service_config)
}

// ── /stats ───────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: AggregateStats,
    pub port: u16,
}

/// Stats as of the last sweep, not the live listing count.
pub async fn handle_stats(State(state): State<ApiState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        stats: state.registry.stats(),
        port: state.port,
    })
}
