//! Reversible placeholder redaction for text sent to untrusted services.
//!
//! Sensitive values in a text are swapped for typed placeholder tokens such as
//! `[PERSON_A]` or `[EMAIL_B]` before the text leaves the trust boundary. The
//! mapping from token to original value stays local, and the service's response
//! is restored against it on the way back.
//!
//! This crate separates:
//! - **Detection**: finding entity spans. Any [`Detector`] will do; the
//!   `patterns` feature ships a regex [`PatternDetector`].
//! - **Redaction**: resolving overlaps and allocating placeholders
//!   ([`RedactionEngine`], [`PlaceholderAllocator`]).
//! - **Restoration**: replacing tokens in generated text and reporting the ones
//!   that do not belong ([`RestorationEngine`], [`AnomalyReport`]).
//!
//! [`RedactionSession`] ties the three together for one input text and owns the
//! only copy of its [`RedactionMap`].
//!
//! Key rules:
//! - The same value in the same category always gets the same token.
//! - Tokens are issued in order per category: `A`..`Z`, then `AA`, `AB`, ...
//! - No original value survives in redacted text; redaction fails instead.
//! - Restoration never guesses. Unknown or malformed tokens stay in the text
//!   and are reported.
//!
//! What it does not do:
//! - run a statistical recognizer (bring your own [`Detector`])
//! - persist or share maps across sessions
//! - call a generation service itself (bring your own [`Generator`])
//!
//! Integrations live behind feature flags (`serde`, `slog`).

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::default_trait_access,
    clippy::doc_markdown,
    clippy::if_not_else,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::needless_pass_by_value,
    clippy::use_self,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::enum_glob_use,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else,
    clippy::from_over_into,
    clippy::manual_inspect
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

// Module declarations
mod allocator;
mod audit;
mod category;
mod config;
#[cfg(feature = "patterns")]
mod detect;
mod error;
mod map;
mod placeholder;
mod redact;
mod restore;
mod session;
#[cfg(feature = "slog")]
pub mod slog;
mod span;

// Re-exports
pub use allocator::PlaceholderAllocator;
pub use audit::{AuditEvent, AuditSink, RedactionAudit, RestorationAudit};
pub use category::{CustomTag, EntityCategory};
pub use config::{RedactionConfig, DEFAULT_MAX_SLOTS_PER_CATEGORY};
#[cfg(feature = "patterns")]
pub use detect::{CompositeDetector, PatternDetector, PatternRule};
pub use error::{CategoryError, PipelineError, RedactionError, SpanError};
pub use map::{MapEntry, RedactionMap, REDACTED_DEBUG};
pub use placeholder::{Placeholder, Slot};
pub use redact::{redact, Redaction, RedactionEngine, SkipReason, SkippedSpan};
pub use restore::{restore, Anomaly, AnomalyReason, AnomalyReport, Restoration, RestorationEngine};
pub use session::{Detector, Generator, RedactionSession};
pub use span::EntitySpan;
