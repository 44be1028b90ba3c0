//! Periodic registry stats readout.

use std::time::Duration;

use tokio::sync::broadcast;

use muster_services::Registry;

/// Log the last sweep's stats every `every` until shutdown.
pub async fn stats_loop(
    registry: Registry,
    every: Duration,
    mut shutdown: broadcast::Receiver<()>,
) -> anyhow::Result<()> {
    let mut interval = tokio::time::interval(every);
    loop {
        tokio::select! {
            _ = shutdown.recv() => return Ok(()),
            _ = interval.tick() => {
                let stats = registry.stats();
                tracing::info!(
                    servers = stats.servers,
                    total_slots = stats.total_slots,
                    players = stats.total_players,
                    capacity = stats.capacity,
                    "registry stats"
                );
            }
        }
    }
}
