//! The restoration pass: untrusted text and a map in, restored text and an
//! anomaly report out.
//!
//! Restoration scans once, left to right, and never re-scans a value it has
//! substituted. Only tokens the map issued are replaced. Everything else that
//! looks like a placeholder is left byte-for-byte in place and reported:
//!
//! | Candidate | Outcome |
//! |-----------|---------|
//! | `[PERSON_A]`, issued by the map | replaced |
//! | `[PERSON_Z]`, well-formed, never issued | [`AnomalyReason::UnmappedPlaceholder`] |
//! | `[person_a]`, `[PERSON_1]`, `[GPE_A]` (unknown category) | [`AnomalyReason::MalformedToken`] |
//! | `[PERSON_A`, `PERSON_A]` | [`AnomalyReason::MalformedToken`] |
//! | `PERSON_A`, bare, issued by the map | [`AnomalyReason::MalformedToken`] |
//! | `EMAIL_ADDRESS`, `snake_case`, `[some_link]`, `NOTE_A]` | plain text, ignored |
//!
//! A category is known if it is built in or the map issued a placeholder for
//! it. Restoration cannot fail.

use std::{collections::HashSet, sync::LazyLock};

use regex::Regex;

use crate::{
    audit::{AuditEvent, RestorationAudit},
    category::EntityCategory,
    map::RedactionMap,
    placeholder::Placeholder,
};

/// Anything shaped like `WORD_WORD`, with optional brackets either side.
static CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[?\b[A-Za-z][A-Za-z0-9]*(?:_[A-Za-z0-9]+)+\b\]?")
        .expect("candidate pattern is valid")
});

/// Why a token was left unresolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum AnomalyReason {
    /// Well-formed, but this map never issued it.
    UnmappedPlaceholder,
    /// Resembles a placeholder but breaks the grammar.
    MalformedToken,
}

/// One unresolved token.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Anomaly {
    /// The token exactly as it appeared.
    pub token: String,
    /// Byte offset of the token in the restoration input.
    pub offset: usize,
    /// Why it was not resolved.
    pub reason: AnomalyReason,
}

/// Every anomaly found in one restoration pass, in text order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct AnomalyReport {
    anomalies: Vec<Anomaly>,
}

impl AnomalyReport {
    /// Returns `true` if nothing was flagged.
    pub fn is_empty(&self) -> bool {
        self.anomalies.is_empty()
    }

    /// Number of anomalies.
    pub fn len(&self) -> usize {
        self.anomalies.len()
    }

    /// Iterates in text order.
    pub fn iter(&self) -> impl Iterator<Item = &Anomaly> {
        self.anomalies.iter()
    }

    /// Anomalies with the given reason.
    pub fn with_reason(&self, reason: AnomalyReason) -> impl Iterator<Item = &Anomaly> {
        self.anomalies
            .iter()
            .filter(move |anomaly| anomaly.reason == reason)
    }

    /// Count of [`AnomalyReason::UnmappedPlaceholder`].
    pub fn unmapped(&self) -> usize {
        self.with_reason(AnomalyReason::UnmappedPlaceholder).count()
    }

    /// Count of [`AnomalyReason::MalformedToken`].
    pub fn malformed(&self) -> usize {
        self.with_reason(AnomalyReason::MalformedToken).count()
    }

    fn push(&mut self, token: &str, offset: usize, reason: AnomalyReason) {
        self.anomalies.push(Anomaly {
            token: token.to_owned(),
            offset,
            reason,
        });
    }
}

impl<'a> IntoIterator for &'a AnomalyReport {
    type Item = &'a Anomaly;
    type IntoIter = std::slice::Iter<'a, Anomaly>;

    fn into_iter(self) -> Self::IntoIter {
        self.anomalies.iter()
    }
}

/// The result of a restoration pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Restoration {
    text: String,
    report: AnomalyReport,
    resolved: usize,
    missing: Vec<Placeholder>,
}

impl Restoration {
    /// The restored text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Tokens that were left in place.
    pub fn report(&self) -> &AnomalyReport {
        &self.report
    }

    /// Number of tokens replaced with original values.
    pub fn resolved(&self) -> usize {
        self.resolved
    }

    /// Issued placeholders that never appeared in the input, in issue order.
    pub fn missing(&self) -> &[Placeholder] {
        &self.missing
    }

    /// Counters for this pass.
    pub fn audit(&self) -> RestorationAudit {
        RestorationAudit {
            resolved: self.resolved,
            unmapped: self.report.unmapped(),
            malformed: self.report.malformed(),
            missing: self.missing.len(),
        }
    }

    /// Wraps the counters as an [`AuditEvent`].
    pub fn audit_event(&self) -> AuditEvent {
        AuditEvent::Restoration(self.audit())
    }

    /// Splits into the restored text and the report.
    pub fn into_parts(self) -> (String, AnomalyReport) {
        (self.text, self.report)
    }
}

enum Candidate<'m> {
    Resolved(&'m str),
    Anomalous(AnomalyReason),
    Plain,
}

/// Reverses placeholder substitution on text returned by an untrusted service.
#[derive(Clone, Copy, Debug, Default)]
pub struct RestorationEngine;

impl RestorationEngine {
    /// Creates an engine.
    pub fn new() -> Self {
        Self
    }

    /// Restores every token `map` issued and reports the rest.
    pub fn restore(&self, text: &str, map: &RedactionMap) -> Restoration {
        let mut out = String::with_capacity(text.len());
        let mut report = AnomalyReport::default();
        let mut seen = HashSet::new();
        let mut resolved = 0;
        let mut cursor = 0;

        for found in CANDIDATE.find_iter(text) {
            let token = found.as_str();
            match classify(token, map) {
                Candidate::Resolved(original) => {
                    out.push_str(&text[cursor..found.start()]);
                    out.push_str(original);
                    cursor = found.end();
                    resolved += 1;
                    seen.insert(token);
                }
                Candidate::Anomalous(reason) => report.push(token, found.start(), reason),
                Candidate::Plain => {}
            }
        }
        out.push_str(&text[cursor..]);

        let missing = map
            .iter()
            .filter(|entry| !seen.contains(entry.token()))
            .map(|entry| entry.placeholder().clone())
            .collect();

        Restoration {
            text: out,
            report,
            resolved,
            missing,
        }
    }
}

/// Restores with a fresh [`RestorationEngine`].
pub fn restore(text: &str, map: &RedactionMap) -> Restoration {
    RestorationEngine.restore(text, map)
}

fn classify<'m>(token: &str, map: &'m RedactionMap) -> Candidate<'m> {
    let open = token.starts_with('[');
    let close = token.ends_with(']');
    let body = token.strip_prefix('[').unwrap_or(token);
    let body = body.strip_suffix(']').unwrap_or(body);

    match Placeholder::parse_body(body) {
        Some(placeholder) if is_known(placeholder.category(), map) => {
            if open && close {
                return map.resolve(token).map_or(
                    Candidate::Anomalous(AnomalyReason::UnmappedPlaceholder),
                    Candidate::Resolved,
                );
            }
            // Without any bracket it is only a token if the map issued it.
            if open || close || map.get(&placeholder).is_some() {
                Candidate::Anomalous(AnomalyReason::MalformedToken)
            } else {
                Candidate::Plain
            }
        }
        // Well-formed tag, but not one this session could have issued.
        Some(_) if open => Candidate::Anomalous(AnomalyReason::MalformedToken),
        None if open && resembles_placeholder(body, map) => {
            Candidate::Anomalous(AnomalyReason::MalformedToken)
        }
        _ => Candidate::Plain,
    }
}

fn is_known(category: &EntityCategory, map: &RedactionMap) -> bool {
    !category.is_custom() || map.contains_category(category)
}

/// Shouting case, or a known category in the wrong case.
fn resembles_placeholder(body: &str, map: &RedactionMap) -> bool {
    if body
        .bytes()
        .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
    {
        return true;
    }
    body.rsplit_once('_')
        .and_then(|(tag, _)| EntityCategory::from_tag(&tag.to_ascii_uppercase()).ok())
        .is_some_and(|category| is_known(&category, map))
}
