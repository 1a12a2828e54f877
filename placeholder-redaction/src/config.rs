//! Redaction configuration.

use std::collections::BTreeSet;

use crate::{category::EntityCategory, span::EntitySpan};

/// Default slot limit per category: every slot of one to three letters,
/// `A` through `ZZZ`.
pub const DEFAULT_MAX_SLOTS_PER_CATEGORY: u32 = 26 + 26 * 26 + 26 * 26 * 26;

/// Controls which spans a redaction pass applies and how far slots may grow.
///
/// Use [`RedactionConfig::new`] or `Default` and the `with_*` methods to build
/// one; under the `serde` feature it can also be loaded from a host config
/// file, with missing fields taking their defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct RedactionConfig {
    /// Only these categories are redacted. `None` redacts everything.
    categories: Option<BTreeSet<EntityCategory>>,
    /// Spans with a lower confidence are not applied.
    min_confidence: f64,
    /// Upper bound on slots issued per category.
    max_slots_per_category: u32,
}

impl RedactionConfig {
    /// Redacts every category, at any confidence, with the default slot limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            categories: None,
            min_confidence: 0.0,
            max_slots_per_category: DEFAULT_MAX_SLOTS_PER_CATEGORY,
        }
    }

    /// Restricts redaction to the given categories.
    #[must_use]
    pub fn only<I>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = EntityCategory>,
    {
        self.categories = Some(categories.into_iter().collect());
        self
    }

    /// Sets the confidence floor.
    #[must_use]
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Sets the per-category slot limit.
    #[must_use]
    pub fn with_max_slots_per_category(mut self, max_slots: u32) -> Self {
        self.max_slots_per_category = max_slots;
        self
    }

    /// The category filter, if any.
    pub fn categories(&self) -> Option<&BTreeSet<EntityCategory>> {
        self.categories.as_ref()
    }

    /// The confidence floor.
    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    /// The per-category slot limit.
    pub fn max_slots_per_category(&self) -> u32 {
        self.max_slots_per_category
    }

    /// Returns `true` if `span` passes the category filter and confidence floor.
    pub(crate) fn admits(&self, span: &EntitySpan) -> bool {
        let category_ok = self
            .categories
            .as_ref()
            .map_or(true, |allowed| allowed.contains(&span.category));
        // NaN confidence is admitted: an unscored span is still redacted.
        #[allow(clippy::neg_cmp_op_on_partial_ord)]
        let confidence_ok = !(span.confidence < self.min_confidence);
        category_ok && confidence_ok
    }
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self::new()
    }
}
