//! The redaction pass: spans in, placeholder text and map out.
//!
//! # Overlap policy
//!
//! Admitted spans are ordered by
//!
//! 1. start offset, ascending;
//! 2. length, descending;
//! 3. confidence, descending (NaN ranks lowest);
//! 4. detector order, ascending.
//!
//! They are then applied left to right. A span that starts before the end of
//! the previous replacement is discarded, so earlier, longer, and more
//! confident spans win, and no byte is ever replaced twice.
//!
//! # Leak guarantee
//!
//! After splicing, every remaining verbatim occurrence of a redacted value is
//! swept into the placeholder already issued for it. The text between tokens
//! is then checked once more, and the pass fails with
//! [`RedactionError::ResidualLeak`] rather than return text that still carries
//! a value. Token text itself is fixed grammar and is not checked, so a value
//! such as `CA` may be redacted even though `[LOCATION_A]` contains it.

use std::cmp::Ordering;

use crate::{
    allocator::PlaceholderAllocator,
    audit::{AuditEvent, RedactionAudit},
    category::EntityCategory,
    config::RedactionConfig,
    error::{RedactionError, SpanError},
    map::RedactionMap,
    placeholder::Placeholder,
    span::EntitySpan,
};

/// Why a detector span was not applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The offsets do not fit the text.
    Invalid(SpanError),
    /// The span starts inside an earlier replacement.
    Overlap,
    /// The category filter or confidence floor excluded it.
    Filtered,
}

/// A detector span the pass did not apply.
///
/// Holds offsets only, never the span's text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedSpan {
    /// Position of the span in the detector's output.
    pub index: usize,
    /// The span's category.
    pub category: EntityCategory,
    /// Start byte offset.
    pub start: usize,
    /// End byte offset.
    pub end: usize,
    /// Why it was skipped.
    pub reason: SkipReason,
}

impl SkippedSpan {
    fn new(index: usize, span: &EntitySpan, reason: SkipReason) -> Self {
        Self {
            index,
            category: span.category.clone(),
            start: span.start,
            end: span.end,
            reason,
        }
    }
}

/// The result of a redaction pass.
#[derive(Debug)]
pub struct Redaction {
    text: String,
    map: RedactionMap,
    skipped: Vec<SkippedSpan>,
    audit: RedactionAudit,
}

impl Redaction {
    /// The redacted text, safe to send across the trust boundary.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The map needed to restore text derived from [`Redaction::text`].
    pub fn map(&self) -> &RedactionMap {
        &self.map
    }

    /// Spans that were not applied, in detector order.
    pub fn skipped(&self) -> &[SkippedSpan] {
        &self.skipped
    }

    /// Counters for this pass.
    pub fn audit(&self) -> &RedactionAudit {
        &self.audit
    }

    /// Wraps the counters as an [`AuditEvent`].
    pub fn audit_event(&self) -> AuditEvent {
        AuditEvent::Redaction(self.audit.clone())
    }

    /// Splits into the redacted text and the map.
    pub fn into_parts(self) -> (String, RedactionMap) {
        (self.text, self.map)
    }
}

enum Segment<'t> {
    Text(&'t str),
    Token(Placeholder),
}

/// Replaces detected spans with placeholders.
#[derive(Clone, Debug, Default)]
pub struct RedactionEngine {
    config: RedactionConfig,
}

impl RedactionEngine {
    /// Creates an engine with the given configuration.
    #[must_use]
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &RedactionConfig {
        &self.config
    }

    /// Redacts `text` using `spans` reported by a detector.
    ///
    /// Bad spans are skipped and listed in [`Redaction::skipped`]; they never
    /// abort the pass. Slot exhaustion and residual leaks do abort it, and no
    /// redacted text is returned in that case.
    pub fn redact(&self, text: &str, spans: &[EntitySpan]) -> Result<Redaction, RedactionError> {
        let mut allocator =
            PlaceholderAllocator::with_limit(self.config.max_slots_per_category())
                .reserving_tokens_in(text);
        let mut audit = RedactionAudit::default();
        let mut skipped = Vec::new();

        let mut candidates = Vec::with_capacity(spans.len());
        for (index, span) in spans.iter().enumerate() {
            match span.slice(text) {
                Err(error) => {
                    audit.invalid_spans += 1;
                    skipped.push(SkippedSpan::new(index, span, SkipReason::Invalid(error)));
                }
                Ok(_) if !self.config.admits(span) => {
                    audit.filtered_spans += 1;
                    skipped.push(SkippedSpan::new(index, span, SkipReason::Filtered));
                }
                Ok(value) => candidates.push((index, span, value)),
            }
        }
        // Stable: full ties keep detector order.
        candidates.sort_by(|(_, a, _), (_, b, _)| precedence(a, b));

        let mut segments = Vec::with_capacity(candidates.len() * 2 + 1);
        let mut cursor = 0;
        for (index, span, value) in candidates {
            if span.start < cursor {
                audit.discarded_overlaps += 1;
                skipped.push(SkippedSpan::new(index, span, SkipReason::Overlap));
                continue;
            }
            if span.text != value {
                audit.text_mismatches += 1;
            }
            let placeholder = allocator.allocate(&span.category, value)?;
            *audit
                .replacements
                .entry(span.category.clone())
                .or_default() += 1;
            if cursor < span.start {
                segments.push(Segment::Text(&text[cursor..span.start]));
            }
            segments.push(Segment::Token(placeholder));
            cursor = span.end;
        }
        if cursor < text.len() {
            segments.push(Segment::Text(&text[cursor..]));
        }
        skipped.sort_by_key(|skip| skip.index);

        let segments = sweep(segments, allocator.map(), &mut audit);
        // Token text is fixed grammar; only the text between tokens can leak.
        let leaked = allocator.map().iter().find(|entry| {
            segments.iter().any(|segment| match segment {
                Segment::Text(chunk) => chunk.contains(entry.original()),
                Segment::Token(_) => false,
            })
        });
        if let Some(entry) = leaked {
            return Err(RedactionError::ResidualLeak {
                category: entry.category().clone(),
            });
        }
        let redacted = render(&segments);

        let map = allocator.into_map();
        for entry in &map {
            *audit
                .placeholders
                .entry(entry.category().clone())
                .or_default() += 1;
        }

        Ok(Redaction {
            text: redacted,
            map,
            skipped,
            audit,
        })
    }
}

/// Redacts with the default configuration.
pub fn redact(text: &str, spans: &[EntitySpan]) -> Result<Redaction, RedactionError> {
    RedactionEngine::default().redact(text, spans)
}

fn precedence(a: &EntitySpan, b: &EntitySpan) -> Ordering {
    a.start
        .cmp(&b.start)
        .then_with(|| b.len().cmp(&a.len()))
        .then_with(|| confidence_rank(b.confidence).total_cmp(&confidence_rank(a.confidence)))
}

fn confidence_rank(confidence: f64) -> f64 {
    if confidence.is_nan() {
        f64::NEG_INFINITY
    } else {
        confidence
    }
}

/// Replaces uncovered repeats of redacted values, longest values first.
fn sweep<'t>(
    mut segments: Vec<Segment<'t>>,
    map: &RedactionMap,
    audit: &mut RedactionAudit,
) -> Vec<Segment<'t>> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| b.original().len().cmp(&a.original().len()));

    for entry in entries {
        let value = entry.original();
        if value.is_empty() {
            continue;
        }
        let mut next = Vec::with_capacity(segments.len());
        for segment in segments {
            match segment {
                Segment::Text(chunk) if chunk.contains(value) => {
                    let mut rest = chunk;
                    while let Some(at) = rest.find(value) {
                        if at > 0 {
                            next.push(Segment::Text(&rest[..at]));
                        }
                        next.push(Segment::Token(entry.placeholder().clone()));
                        audit.swept_occurrences += 1;
                        *audit
                            .replacements
                            .entry(entry.category().clone())
                            .or_default() += 1;
                        rest = &rest[at + value.len()..];
                    }
                    if !rest.is_empty() {
                        next.push(Segment::Text(rest));
                    }
                }
                other => next.push(other),
            }
        }
        segments = next;
    }
    segments
}

fn render(segments: &[Segment<'_>]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Token(placeholder) => out.push_str(&placeholder.token()),
        }
    }
    out
}
