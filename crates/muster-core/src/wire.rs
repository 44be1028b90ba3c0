//! Wire types for the reporter protocol and the client config document.
//!
//! A report batch is a JSON array of items shaped like
//! `{ "type": "add" | "update" | "delete", "server": { ... } }`. The server
//! object is arbitrary reporter data, so items are inspected as borrowed views
//! over `serde_json::Value` rather than deserialized into a fixed struct.

use serde::Serialize;
use serde_json::{Map, Value};

/// Fields every `server` object must carry.
pub const REQUIRED_FIELDS: [&str; 4] = ["name", "port", "players", "maxPlayers"];

/// Reporter-local fields dropped before a listing is stored.
pub const DISCARDED_FIELDS: [&str; 2] = ["timeout", "port"];

/// What a batch item asks the registry to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `"add"` and `"update"` are the same operation: replace or create.
    Upsert,
    Delete,
}

impl Operation {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "add" | "update" => Some(Self::Upsert),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// A structurally valid batch item, borrowed from the request body.
#[derive(Debug, Clone, Copy)]
pub struct BatchItem<'a> {
    /// The raw `type` value. May still name an unknown operation.
    pub op_type: &'a Value,
    pub server: &'a Map<String, Value>,
}

impl<'a> BatchItem<'a> {
    /// View `value` as a batch item.
    ///
    /// `None` when the item is not an object, `type` is absent or falsy
    /// (`null`, `false`, `0`, `""`), or `server` is absent or not an object.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        let item = value.as_object()?;
        let op_type = item.get("type").filter(|t| is_present(t))?;
        let server = item.get("server")?.as_object()?;
        Some(Self { op_type, server })
    }

    /// The operation named by `type`, if it is a known one.
    pub fn operation(&self) -> Option<Operation> {
        self.op_type.as_str().and_then(Operation::parse)
    }

    /// First required field missing from `server`, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        REQUIRED_FIELDS
            .iter()
            .copied()
            .find(|field| !self.server.get(*field).is_some_and(|v| !v.is_null()))
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Document served at `GET /config` to game clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceConfig {
    pub service_message: String,
    /// Milliseconds between reporter heartbeats.
    pub heartbeat_interval: u64,
}
