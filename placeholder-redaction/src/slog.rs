//! Audit events through `slog`.
//!
//! With the `slog` feature a `slog::Logger` is an [`AuditSink`]: every event is
//! logged at info level with a `pass` key and an `audit` key holding the event
//! as structured JSON via `slog`'s nested-value support.
//!
//! Logging must not fail the pass it describes. If the event cannot be
//! converted to JSON, the `audit` value falls back to a JSON string.
//!
//! ## Example
//! ```ignore
//! let session = RedactionSession::new(text).with_audit_sink(logger.clone());
//! ```

use serde_json::Value as JsonValue;
use slog::{Key, Logger, Record, Result as SlogResult, Serializer, Value as SlogValue};

use crate::audit::{AuditEvent, AuditSink};

/// A `slog::Value` that emits an audit event as structured JSON.
///
/// Events carry counts and categories only, never original values.
pub struct AuditJson {
    value: JsonValue,
}

impl AuditJson {
    /// Converts `event` into its JSON form.
    pub fn new(event: &AuditEvent) -> Self {
        let value = serde_json::to_value(event)
            .unwrap_or_else(|_| JsonValue::String("Failed to serialize audit event".to_string()));
        Self { value }
    }
}

impl SlogValue for AuditJson {
    fn serialize(
        &self,
        record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        let nested = slog::Serde(self.value.clone());
        SlogValue::serialize(&nested, record, key, serializer)
    }
}

impl AuditSink for Logger {
    fn record(&self, event: &AuditEvent) {
        slog::info!(self, "placeholder audit"; "pass" => event.pass(), "audit" => AuditJson::new(event));
    }
}
