//! Configuration system for Muster.
//!
//! Resolution order: environment variables → config file → defaults.
//!
//! Config file location:
//!   1. $MUSTER_CONFIG (explicit override)
//!   2. ./muster.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::wire::ServiceConfig;

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MusterConfig {
    /// Address the HTTP listener binds to.
    pub bind: String,
    /// HTTP listen port.
    pub port: u16,
    /// Sweep period in milliseconds.
    #[serde(rename = "updateRate")]
    pub update_rate: u64,
    /// Seconds without a heartbeat before a listing is evicted.
    #[serde(rename = "expireTime")]
    pub expire_time: u64,
    /// Directory served for paths no route claims.
    pub static_dir: PathBuf,
    /// Announcement handed to clients at `GET /config`.
    pub service_message: String,
    /// Heartbeat interval handed to clients at `GET /config`, in ms.
    pub heartbeat_interval: u64,
}

// ── Defaults ──────────────────────────────────────────────────────────────────

impl Default for MusterConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3000,
            update_rate: 1000,
            expire_time: 120,
            static_dir: PathBuf::from("www"),
            service_message: "TEST ANNOUNCEMENT".to_string(),
            heartbeat_interval: 300_000,
        }
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl MusterConfig {
    /// Load config: env vars → file → defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_file(&Self::file_path())?;
        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Config file path.
    pub fn file_path() -> PathBuf {
        std::env::var("MUSTER_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("muster.toml"))
    }

    /// Parse `path`, or defaults if it does not exist.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadFailed(path.to_path_buf(), e))?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(path.to_path_buf(), e))
    }

    /// Apply overrides from `lookup`.
    ///
    /// The bare names `port`, `updateRate` and `expireTime` are honoured for
    /// deployments that already set them; `MUSTER_*` names win when both are
    /// present. Values that fail to parse are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |names: &[&str]| names.iter().rev().find_map(|n| lookup(n));

        if let Some(v) = var(&["port", "MUSTER_PORT"]) {
            parse_into(&mut self.port, "port", &v);
        }
        if let Some(v) = var(&["updateRate", "MUSTER_UPDATE_RATE"]) {
            parse_into(&mut self.update_rate, "updateRate", &v);
        }
        if let Some(v) = var(&["expireTime", "MUSTER_EXPIRE_TIME"]) {
            parse_into(&mut self.expire_time, "expireTime", &v);
        }
        if let Some(v) = var(&["MUSTER_BIND"]) {
            self.bind = v;
        }
        if let Some(v) = var(&["MUSTER_STATIC_DIR"]) {
            self.static_dir = PathBuf::from(v);
        }
        if let Some(v) = var(&["MUSTER_SERVICE_MESSAGE"]) {
            self.service_message = v;
        }
        if let Some(v) = var(&["MUSTER_HEARTBEAT_INTERVAL"]) {
            parse_into(&mut self.heartbeat_interval, "heartbeat_interval", &v);
        }
    }

    /// Sweep period. Clamped to at least 1 ms; a zero period cannot drive a
    /// tokio interval.
    pub fn sweep_period(&self) -> Duration {
        Duration::from_millis(self.update_rate.max(1))
    }

    /// Staleness threshold.
    pub fn expire_after(&self) -> Duration {
        Duration::from_secs(self.expire_time)
    }

    /// The `GET /config` document.
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            service_message: self.service_message.clone(),
            heartbeat_interval: self.heartbeat_interval,
        }
    }
}

fn parse_into<T: std::str::FromStr>(slot: &mut T, name: &str, raw: &str) {
    match raw.trim().parse() {
        Ok(v) => *slot = v,
        Err(_) => tracing::warn!(setting = name, value = raw, "ignoring unparseable override"),
    }
}
