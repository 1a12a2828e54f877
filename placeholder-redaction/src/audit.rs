//! Audit records for redaction and restoration passes.
//!
//! The engines never write anywhere. Each pass summarizes itself as an
//! [`AuditEvent`] and a [`crate::RedactionSession`] hands that event to
//! whatever [`AuditSink`] the host attached. Events carry counts and
//! placeholder categories only; original values never appear in them.

use std::collections::BTreeMap;

use crate::category::EntityCategory;

/// Summary of one redaction pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RedactionAudit {
    /// Distinct placeholders issued, per category.
    pub placeholders: BTreeMap<EntityCategory, usize>,
    /// Occurrences replaced in the text, per category (spans plus sweeps).
    pub replacements: BTreeMap<EntityCategory, usize>,
    /// Spans discarded because they started inside an earlier replacement.
    pub discarded_overlaps: usize,
    /// Spans rejected for bad offsets.
    pub invalid_spans: usize,
    /// Spans excluded by the category filter or confidence floor.
    pub filtered_spans: usize,
    /// Uncovered repeats of a redacted value replaced by the sweep.
    pub swept_occurrences: usize,
    /// Spans whose reported text differed from the source slice.
    pub text_mismatches: usize,
}

/// Summary of one restoration pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RestorationAudit {
    /// Tokens replaced with their original value.
    pub resolved: usize,
    /// Well-formed tokens the map never issued.
    pub unmapped: usize,
    /// Token-like text that fails the grammar.
    pub malformed: usize,
    /// Issued placeholders that did not appear in the text.
    pub missing: usize,
}

/// One audit record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "pass", rename_all = "snake_case")
)]
pub enum AuditEvent {
    /// A redaction pass completed.
    Redaction(RedactionAudit),
    /// A restoration pass completed.
    Restoration(RestorationAudit),
}

impl AuditEvent {
    /// Short name of the pass, `"redaction"` or `"restoration"`.
    pub fn pass(&self) -> &'static str {
        match self {
            AuditEvent::Redaction(_) => "redaction",
            AuditEvent::Restoration(_) => "restoration",
        }
    }
}

/// Write-only destination for audit events.
///
/// Implemented for closures taking `&AuditEvent`, and for `slog::Logger` under
/// the `slog` feature.
pub trait AuditSink {
    /// Records one event. Must not fail; sinks swallow their own errors.
    fn record(&self, event: &AuditEvent);
}

impl<F> AuditSink for F
where
    F: Fn(&AuditEvent),
{
    fn record(&self, event: &AuditEvent) {
        self(event);
    }
}
