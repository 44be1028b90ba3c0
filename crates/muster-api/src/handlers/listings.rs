//! /serverListings handlers — the listing dump and the reporter endpoint.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;

use muster_core::{ListingKey, ListingRecord};
use muster_services::{ingest_batch, IngestError};

use super::ApiState;

// ── GET /serverListings ──────────────────────────────────────────────────────

pub async fn handle_get_listings(
    State(state): State<ApiState>,
) -> Json<BTreeMap<ListingKey, ListingRecord>> {
    Json(state.registry.snapshot().listings)
}

// ── PUT /serverListings ──────────────────────────────────────────────────────

/// Apply a reporter batch. The body is parsed here rather than with the
/// `Json` extractor so that every rejection, including an empty or
/// unparseable body, answers with the protocol's own message.
pub async fn handle_put_listings(
    State(state): State<ApiState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    body: Bytes,
) -> Result<&'static str, (StatusCode, String)> {
    let batch: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            tracing::debug!(peer = %peer, error = %e, "unparseable report body");
            reject(IngestError::Malformed)
        })?
    };

    let report = ingest_batch(&state.registry, peer.ip(), &batch).map_err(reject)?;
    Ok(report.message())
}

fn reject(e: IngestError) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, e.to_string())
}
