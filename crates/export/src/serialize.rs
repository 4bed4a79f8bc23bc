//! Snapshot serialization with an overflow-redacting guard.

use crate::error::ExportError;
use folio_model::Document;
use serde_json::Value;

/// Subtrees nested deeper than this are replaced by the sentinel rather
/// than failing the whole export.
pub const MAX_EXPORT_DEPTH: usize = 64;

/// Marker substituted for content the redacting serializer removed.
pub const REDACTION_SENTINEL: &str = "[unserializable]";

/// Serialize a snapshot to the JSON value submitted to the re-encoding
/// service. Document snapshots are trees and serialize cleanly; the
/// depth guard covers pathological nesting in passthrough fields so a
/// single bad subtree degrades to a sentinel instead of sinking the
/// export.
pub fn snapshot_value(document: &Document) -> Result<Value, ExportError> {
    let value = serde_json::to_value(document)?;
    Ok(redact_overflow(value, MAX_EXPORT_DEPTH))
}

fn redact_overflow(value: Value, budget: usize) -> Value {
    if budget == 0 {
        log::warn!("redacting over-deep subtree from export snapshot");
        return Value::String(REDACTION_SENTINEL.to_string());
    }
    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| redact_overflow(item, budget - 1))
                .collect(),
        ),
        Value::Object(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(key, item)| (key, redact_overflow(item, budget - 1)))
                .collect(),
        ),
        leaf => leaf,
    }
}
