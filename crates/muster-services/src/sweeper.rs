//! Expiry sweeper — evicts stale listings and recomputes aggregate stats.
//!
//! Eviction only ever happens here. A longer period means stale listings
//! linger longer and stats lag; that is the accepted cost of sweeping on a
//! timer instead of expiring on read.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use muster_core::AggregateStats;

use crate::registry::Registry;

/// Outcome of one sweep pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepReport {
    pub evicted: usize,
    /// Live listings left out of the stats because their counts don't parse.
    pub skipped: usize,
    pub stats: AggregateStats,
}

impl Registry {
    /// Run one sweep pass as of now.
    pub fn sweep(&self, expire_after: Duration) -> SweepReport {
        self.sweep_at(Utc::now(), expire_after)
    }

    /// Run one sweep pass as of `now`.
    ///
    /// Listings older than `expire_after` are removed before the survivors are
    /// totalled, and the new stats replace the old ones before the lock is
    /// released.
    pub fn sweep_at(&self, now: DateTime<Utc>, expire_after: Duration) -> SweepReport {
        let threshold = expire_after.as_secs_f64();
        let mut evicted = 0;
        let mut skipped = 0;
        let mut players: i64 = 0;
        let mut slots: i64 = 0;

        let mut state = self.write();
        state.listings.retain(|key, record| {
            let age = (now - record.added).num_milliseconds() as f64 / 1000.0;
            if age > threshold {
                tracing::trace!(listing = %key, age, "listing expired");
                evicted += 1;
                return false;
            }

            match (record.player_count(), record.slot_count()) {
                (Some(p), Some(s)) => {
                    players = players.saturating_add(p);
                    slots = slots.saturating_add(s);
                }
                _ => {
                    tracing::warn!(
                        listing = %key,
                        players = %record.players,
                        max_players = %record.max_players,
                        "listing counts are not numeric, leaving it out of stats"
                    );
                    skipped += 1;
                }
            }
            true
        });

        let stats = AggregateStats::from_totals(state.listings.len(), players, slots);
        state.stats = stats;

        SweepReport {
            evicted,
            skipped,
            stats,
        }
    }
}

/// Periodic sweep task.
pub struct Sweeper {
    registry: Registry,
    period: Duration,
    expire_after: Duration,
    shutdown: broadcast::Receiver<()>,
}

impl Sweeper {
    pub fn new(
        registry: Registry,
        period: Duration,
        expire_after: Duration,
        shutdown: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            registry,
            period,
            expire_after,
            shutdown,
        }
    }

    /// Start sweeping on a background task.
    ///
    /// The first pass runs one period after spawning. Ticks that fall behind
    /// are delayed, never doubled up, so at most one pass is ever in flight.
    pub fn spawn(self) -> SweeperHandle {
        let (stop_tx, stop_rx) = oneshot::channel();
        let task = tokio::spawn(self.run(stop_rx));
        SweeperHandle {
            stop: Some(stop_tx),
            task,
        }
    }

    async fn run(mut self, mut stop: oneshot::Receiver<()>) -> anyhow::Result<()> {
        let mut interval = tokio::time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            period_ms = self.period.as_millis() as u64,
            expire_secs = self.expire_after.as_secs(),
            "sweeper starting"
        );

        loop {
            tokio::select! {
                _ = self.shutdown.recv() => {
                    tracing::info!("sweeper shutting down");
                    return Ok(());
                }

                _ = &mut stop => {
                    tracing::debug!("sweeper stopped by handle");
                    return Ok(());
                }

                _ = interval.tick() => {
                    let report = self.registry.sweep(self.expire_after);
                    if report.evicted > 0 {
                        tracing::debug!(
                            evicted = report.evicted,
                            remaining = report.stats.servers,
                            "expired stale listings"
                        );
                    }
                }
            }
        }
    }
}

/// Handle to a running [`Sweeper`]. Dropping it stops the sweeper too.
pub struct SweeperHandle {
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<anyhow::Result<()>>,
}

impl SweeperHandle {
    /// Stop the sweeper and wait for its task to finish.
    pub async fn shutdown(mut self) -> anyhow::Result<()> {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        self.task.await?
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the task to exit on its own (daemon-wide shutdown).
    pub async fn join(self) -> anyhow::Result<()> {
        self.task.await?
    }
}
