//! Error types.
//!
//! Errors are split by blast radius:
//! - [`SpanError`] rejects one detector span; the pass skips it and continues.
//! - [`RedactionError`] aborts the whole pass before any text leaves the
//!   process.
//! - [`CategoryError`] rejects a category tag at construction time.
//!
//! Restoration has no error type. Unresolvable tokens are reported as
//! anomalies instead (see [`crate::AnomalyReport`]).
//!
//! No variant carries an original entity value, so errors are safe to log.

use crate::category::EntityCategory;

/// A detector span that cannot be applied to the source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpanError {
    /// `start >= end`.
    #[error("span {start}..{end} is empty or inverted")]
    Inverted {
        /// Start offset as reported.
        start: usize,
        /// End offset as reported.
        end: usize,
    },
    /// The span reaches past the end of the text.
    #[error("span {start}..{end} exceeds text length {len}")]
    OutOfBounds {
        /// Start offset as reported.
        start: usize,
        /// End offset as reported.
        end: usize,
        /// Length of the source text in bytes.
        len: usize,
    },
    /// An offset splits a UTF-8 code point.
    #[error("offset {offset} is not on a UTF-8 character boundary")]
    NotCharBoundary {
        /// The offending byte offset.
        offset: usize,
    },
}

/// A failure that aborts a redaction pass.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RedactionError {
    /// The category has used up its configured slot space.
    #[error("placeholder slots exhausted for category {category} (limit {limit})")]
    AllocationExhausted {
        /// The category that ran out of slots.
        category: EntityCategory,
        /// The configured per-category limit.
        limit: u32,
    },
    /// A redacted value still occurs in the text between placeholder tokens.
    #[error("a redacted {category} value still occurs in the redacted text")]
    ResidualLeak {
        /// Category of the leaking value.
        category: EntityCategory,
    },
    /// The session already holds a redaction map.
    #[error("session has already been redacted")]
    AlreadyRedacted,
}

/// An invalid category tag.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CategoryError {
    /// The tag is empty.
    #[error("category tag is empty")]
    Empty,
    /// The tag does not match `[A-Z][A-Z0-9]*(_[A-Z0-9]+)*`.
    #[error("invalid category tag {0:?}: expected uppercase segments joined by '_'")]
    InvalidTag(String),
    /// The tag names a built-in category.
    #[error("category tag {0:?} is reserved for a built-in category")]
    Reserved(String),
}

/// A failure in the detect, redact, generate, restore cycle.
///
/// `E` is the generation service's own error type.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError<E> {
    /// Redaction failed; nothing was sent.
    #[error(transparent)]
    Redaction(#[from] RedactionError),
    /// The generation service failed after receiving the redacted text.
    #[error("generation service failed: {0}")]
    Generation(E),
}
