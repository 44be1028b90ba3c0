//! Report ingestion — applies a reporter's batch of add/update/delete items.
//!
//! Items are applied in order while holding the registry's write lock. The
//! first bad item ends the batch: everything before it stays applied,
//! nothing after it is attempted, and the caller gets that one error.
//! Reporters resend their whole state after reconnecting, so repeated
//! adds of known listings are the normal case.

use std::net::IpAddr;

use serde_json::Value;

use muster_core::sanitize::sanitize_fields;
use muster_core::wire::{BatchItem, Operation, DISCARDED_FIELDS};
use muster_core::{ListingKey, ListingRecord};

use crate::registry::{Batch, Registry};

/// Why a batch was rejected or cut short. `Display` is the client-facing
/// response body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    #[error("Malformed request.")]
    Malformed,
    #[error("Missing JSON data: {0}")]
    MissingField(&'static str),
    #[error("Unknown operation type.")]
    UnknownOperation,
}

/// What a successfully applied batch did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub upserted: usize,
    pub removed: usize,
    /// Operation of the last item applied.
    pub last: Option<Operation>,
}

impl IngestReport {
    pub fn applied(&self) -> usize {
        self.upserted + self.removed
    }

    /// Response body for a successful batch, chosen by its last item.
    pub fn message(&self) -> &'static str {
        match self.last {
            Some(Operation::Delete) => "Server removed.",
            _ => "Server added / Updated.",
        }
    }
}

/// Apply a report batch from `origin` to `registry`.
///
/// `body` must be a non-empty JSON array; anything else is rejected before
/// any item is touched.
pub fn ingest_batch(
    registry: &Registry,
    origin: IpAddr,
    body: &Value,
) -> Result<IngestReport, IngestError> {
    let items = match body.as_array() {
        Some(items) if !items.is_empty() => items,
        _ => return Err(IngestError::Malformed),
    };

    registry.apply(|batch| {
        let mut report = IngestReport::default();
        for (index, raw) in items.iter().enumerate() {
            if let Err(e) = apply_item(batch, origin, raw, &mut report) {
                tracing::debug!(
                    %origin,
                    index,
                    applied = report.applied(),
                    skipped = items.len() - index - 1,
                    error = %e,
                    "report batch aborted"
                );
                return Err(e);
            }
        }
        tracing::debug!(
            %origin,
            upserted = report.upserted,
            removed = report.removed,
            "report batch applied"
        );
        Ok(report)
    })
}

fn apply_item(
    batch: &mut Batch<'_>,
    origin: IpAddr,
    raw: &Value,
    report: &mut IngestReport,
) -> Result<(), IngestError> {
    let item = BatchItem::from_value(raw).ok_or(IngestError::Malformed)?;
    if let Some(field) = item.missing_field() {
        return Err(IngestError::MissingField(field));
    }

    let mut fields = sanitize_fields(item.server);
    let port = fields.get("port").cloned().unwrap_or_default();
    let key = ListingKey::new(origin, port);
    for field in DISCARDED_FIELDS {
        fields.remove(field);
    }

    match item.operation() {
        Some(Operation::Upsert) => {
            let record = ListingRecord::from_fields(fields).map_err(IngestError::MissingField)?;
            tracing::trace!(listing = %key, name = %record.name, "listing upserted");
            batch.upsert(key, record);
            report.upserted += 1;
            report.last = Some(Operation::Upsert);
        }
        Some(Operation::Delete) => {
            let existed = batch.remove(&key);
            tracing::trace!(listing = %key, existed, "listing removed");
            report.removed += 1;
            report.last = Some(Operation::Delete);
        }
        None => return Err(IngestError::UnknownOperation),
    }
    Ok(())
}
