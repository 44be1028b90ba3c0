//! Registry stats and client config commands.

use anyhow::Result;
use serde::Deserialize;

use super::http::get_json;

// ── Response types ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    servers: usize,
    total_slots: i64,
    total_players: i64,
    /// `null` when players are reported against zero slots.
    capacity: Option<f64>,
    port: u16,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ConfigResponse {
    service_message: String,
    heartbeat_interval: u64,
}

// ── Commands ──────────────────────────────────────────────────────────────────

pub async fn cmd_status(base: &str) -> Result<()> {
    let resp: StatsResponse = get_json(&format!("{}/stats", base)).await?;

    let capacity = resp
        .capacity
        .map(|c| format!("{:.0}%", c))
        .unwrap_or_else(|| "n/a".to_string());

    println!("═══════════════════════════════════════");
    println!("  Muster Master Server");
    println!("═══════════════════════════════════════");
    println!("  Reporting servers : {}", resp.servers);
    println!("  Total slots       : {}", resp.total_slots);
    println!("  Players           : {}  [ {} capacity ]", resp.total_players, capacity);
    println!("  Port              : {}", resp.port);

    Ok(())
}

pub async fn cmd_config(base: &str) -> Result<()> {
    let resp: ConfigResponse = get_json(&format!("{}/config", base)).await?;

    println!("═══════════════════════════════════════");
    println!("  Client Config");
    println!("═══════════════════════════════════════");
    println!("  Service message    : {}", resp.service_message);
    println!(
        "  Heartbeat interval : {} ms ({:.0}s)",
        resp.heartbeat_interval,
        resp.heartbeat_interval as f64 / 1000.0
    );

    Ok(())
}
