//! musterd — Muster master server daemon.

use std::time::Duration;

use anyhow::{Context, Result};

use muster_core::config::MusterConfig;
use muster_services::{Registry, Sweeper};

mod status;

/// How often the stats readout is logged.
const STATS_LOG_INTERVAL: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config
    let config = MusterConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        MusterConfig::default()
    });
    tracing::info!(
        bind = %config.bind,
        port = config.port,
        update_rate_ms = config.update_rate,
        expire_secs = config.expire_time,
        static_dir = %config.static_dir.display(),
        "musterd starting"
    );

    // Shared state
    let registry = Registry::new();

    // ── Shutdown channel ─────────────────────────────────────────────────────
    let (shutdown_tx, _) = tokio::sync::broadcast::channel::<()>(1);

    {
        let shutdown = shutdown_tx.clone();
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("shutdown signal received");
            let _ = shutdown.send(());
        });
    }

    // ── Spawn tasks ──────────────────────────────────────────────────────────

    let sweeper = Sweeper::new(
        registry.clone(),
        config.sweep_period(),
        config.expire_after(),
        shutdown_tx.subscribe(),
    )
    .spawn();

    let stats_task = tokio::spawn(status::stats_loop(
        registry.clone(),
        STATS_LOG_INTERVAL,
        shutdown_tx.subscribe(),
    ));

    let api_task = {
        let state = muster_api::ApiState {
            registry: registry.clone(),
            service_config: config.service_config(),
            port: config.port,
            static_dir: config.static_dir.clone(),
        };
        let bind = config.bind.clone();
        let port = config.port;
        let shutdown = shutdown_tx.subscribe();
        tokio::spawn(async move { muster_api::serve(state, &bind, port, shutdown).await })
    };

    // ── Wait for exit ────────────────────────────────────────────────────────

    let mut shutdown_rx = shutdown_tx.subscribe();

    let outcome = tokio::select! {
        _ = shutdown_rx.recv() => {
            tracing::info!("shutting down");
            Ok(())
        }
        r = api_task => {
            tracing::error!("API server exited: {:?}", r);
            let _ = shutdown_tx.send(());
            r?.context("API server failed")
        }
        r = stats_task => {
            tracing::error!("stats task exited: {:?}", r);
            Ok(())
        }
    };

    if let Err(e) = sweeper.shutdown().await {
        tracing::warn!(error = %e, "sweeper did not stop cleanly");
    }
    tracing::info!(listings = registry.len(), "registry dropped");

    outcome
}
