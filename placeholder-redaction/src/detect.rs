//! Pattern-based detection.
//!
//! [`PatternDetector`] is a regex fallback for entities with a recognizable
//! shape. It is not a replacement for a statistical recognizer (names,
//! organizations and places need one), and it reports raw matches without
//! resolving overlaps; the redaction engine does that.

use std::sync::LazyLock;

use regex::Regex;

use crate::{category::EntityCategory, session::Detector, span::EntitySpan};

/// A single regex rule.
#[derive(Clone, Debug)]
pub struct PatternRule {
    category: EntityCategory,
    regex: Regex,
    confidence: f64,
}

impl PatternRule {
    /// Compiles `pattern` into a rule reporting `category` at `confidence`.
    pub fn new(
        category: EntityCategory,
        pattern: &str,
        confidence: f64,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            category,
            regex: Regex::new(pattern)?,
            confidence,
        })
    }

    /// The category this rule reports.
    pub fn category(&self) -> &EntityCategory {
        &self.category
    }
}

static DEFAULT_RULES: LazyLock<Vec<PatternRule>> = LazyLock::new(|| {
    let rules = [
        (
            EntityCategory::Email,
            r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}",
            0.99,
        ),
        // SSN-shaped identifiers (XXX-XX-XXXX)
        (EntityCategory::Id, r"\b\d{3}-\d{2}-\d{4}\b", 0.95),
        (
            EntityCategory::Phone,
            r"(?:\+\d{1,3}[\s.-]?)?(?:\(\d{3}\)|\b\d{3})[\s.-]?\d{3}[\s.-]\d{4}\b",
            0.85,
        ),
        (
            EntityCategory::Money,
            r"[$€£]\s?\d+(?:,\d{3})*(?:\.\d+)?",
            0.9,
        ),
        (EntityCategory::Date, r"\b\d{4}-\d{2}-\d{2}\b", 0.9),
        (
            EntityCategory::Date,
            r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December|Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sept|Sep|Oct|Nov|Dec)\.? \d{1,2}(?:st|nd|rd|th)?,? \d{4}\b",
            0.8,
        ),
    ];
    rules
        .into_iter()
        .map(|(category, pattern, confidence)| {
            PatternRule::new(category, pattern, confidence).expect("built-in pattern is valid")
        })
        .collect()
});

/// Regex detector for emails, phone numbers, money, dates and SSN-shaped IDs.
#[derive(Clone, Debug)]
pub struct PatternDetector {
    rules: Vec<PatternRule>,
}

impl PatternDetector {
    /// Creates a detector with the built-in rules.
    pub fn new() -> Self {
        Self {
            rules: DEFAULT_RULES.clone(),
        }
    }

    /// Creates a detector with no rules.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Adds a rule.
    #[must_use]
    pub fn with_rule(mut self, rule: PatternRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Keeps only rules for the given categories.
    #[must_use]
    pub fn retain_categories(mut self, categories: &[EntityCategory]) -> Self {
        self.rules.retain(|rule| categories.contains(&rule.category));
        self
    }

    /// The active rules.
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }
}

impl Default for PatternDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for PatternDetector {
    fn detect(&self, text: &str) -> Vec<EntitySpan> {
        self.rules
            .iter()
            .flat_map(|rule| {
                rule.regex.find_iter(text).map(|found| {
                    EntitySpan::new(
                        rule.category.clone(),
                        found.start(),
                        found.end(),
                        found.as_str(),
                        rule.confidence,
                    )
                })
            })
            .collect()
    }
}

/// Runs several detectors and concatenates their spans.
///
/// Typical use pairs a statistical recognizer with [`PatternDetector`] as a
/// fallback for the shapes it misses.
#[derive(Default)]
pub struct CompositeDetector {
    detectors: Vec<Box<dyn Detector>>,
}

impl CompositeDetector {
    /// Creates an empty composite.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a detector.
    #[must_use]
    pub fn with(mut self, detector: impl Detector + 'static) -> Self {
        self.detectors.push(Box::new(detector));
        self
    }

    /// Number of detectors.
    pub fn len(&self) -> usize {
        self.detectors.len()
    }

    /// Returns `true` if there are no detectors.
    pub fn is_empty(&self) -> bool {
        self.detectors.is_empty()
    }
}

impl Detector for CompositeDetector {
    fn detect(&self, text: &str) -> Vec<EntitySpan> {
        self.detectors
            .iter()
            .flat_map(|detector| detector.detect(text))
            .collect()
    }
}
