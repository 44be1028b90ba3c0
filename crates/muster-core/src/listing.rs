//! Listing types — the registry's key, stored record and derived stats.

use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Identity of a listing: the reporter's network origin plus the port it
/// advertises in its payload.
///
/// Ordered so the registry map iterates (and serializes) deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListingKey {
    /// Peer address of the reporting connection.
    pub addr: IpAddr,
    /// Sanitized `port` value from the reporter payload.
    pub port: String,
}

impl ListingKey {
    /// IPv4-mapped IPv6 origins are folded back to plain IPv4 so a reporter
    /// keeps one identity regardless of how the listener accepted it.
    pub fn new(addr: IpAddr, port: impl Into<String>) -> Self {
        Self {
            addr: addr.to_canonical(),
            port: port.into(),
        }
    }
}

impl fmt::Display for ListingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.addr, self.port)
    }
}

impl Serialize for ListingKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One reporter's advertised state.
///
/// Every reporter-supplied value has already been through the sanitizer, so
/// all fields are strings. `added` is owned by the registry and restamped on
/// every upsert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingRecord {
    pub name: String,
    pub players: String,
    #[serde(rename = "maxPlayers")]
    pub max_players: String,
    /// Any other reporter fields (map, mode, version, ...).
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
    /// Last time this listing was upserted.
    pub added: DateTime<Utc>,
}

impl ListingRecord {
    /// Build a record from sanitized reporter fields.
    ///
    /// Returns the name of the first required field that is absent. A
    /// reporter-supplied `added` is discarded; the registry stamps its own.
    pub fn from_fields(mut fields: BTreeMap<String, String>) -> Result<Self, &'static str> {
        let name = fields.remove("name").ok_or("name")?;
        let players = fields.remove("players").ok_or("players")?;
        let max_players = fields.remove("maxPlayers").ok_or("maxPlayers")?;
        fields.remove("added");

        Ok(Self {
            name,
            players,
            max_players,
            extra: fields,
            added: Utc::now(),
        })
    }

    /// Current population, if `players` holds a number.
    pub fn player_count(&self) -> Option<i64> {
        parse_count(&self.players)
    }

    /// Advertised capacity, if `maxPlayers` holds a number.
    pub fn slot_count(&self) -> Option<i64> {
        parse_count(&self.max_players)
    }
}

/// Parse the leading integer of a count field.
///
/// Leading whitespace and a `-` sign are accepted, digits are read until the
/// first non-digit, anything after that is ignored. `None` when no digit
/// leads the value or it does not fit in an `i64`.
pub fn parse_count(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    let value: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Population totals derived from the live listings by the last sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    /// Listings alive after the sweep.
    pub servers: usize,
    pub total_slots: i64,
    pub total_players: i64,
    /// `total_players / total_slots * 100`, or 0 with no players.
    ///
    /// Players are not clamped to slots, so this can exceed 100. With zero
    /// slots and some players it is infinite, which serializes as `null`.
    pub capacity: f64,
}

impl AggregateStats {
    pub fn from_totals(servers: usize, total_players: i64, total_slots: i64) -> Self {
        let capacity = if total_players > 0 {
            total_players as f64 / total_slots as f64 * 100.0
        } else {
            0.0
        };

        Self {
            servers,
            total_slots,
            total_players,
            capacity,
        }
    }
}
