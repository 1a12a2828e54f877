//! The session's redaction map.
//!
//! A [`RedactionMap`] associates each issued [`Placeholder`] with the original
//! value it replaced. Lookups run both ways:
//!
//! - forward, token to original value, used by restoration;
//! - reverse, `(category, value)` to placeholder, used by the allocator to
//!   hand out the same placeholder for repeated values.
//!
//! Only [`crate::PlaceholderAllocator`] can add entries. Once a redaction pass
//! hands the map out it is read-only: there is no public mutation, no merge,
//! and no `Clone`, so a map cannot outlive or leak past its session by
//! accident.

use std::{collections::HashMap, fmt};

use crate::{category::EntityCategory, placeholder::Placeholder};

/// Placeholder text printed by `Debug` in place of original values.
pub const REDACTED_DEBUG: &str = "[REDACTED]";

/// One issued placeholder and the value it stands for.
pub struct MapEntry {
    placeholder: Placeholder,
    token: String,
    original: String,
}

impl MapEntry {
    /// The issued placeholder.
    pub fn placeholder(&self) -> &Placeholder {
        &self.placeholder
    }

    /// The rendered token, e.g. `[PERSON_A]`.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The original value.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The entity category.
    pub fn category(&self) -> &EntityCategory {
        self.placeholder.category()
    }
}

impl fmt::Debug for MapEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entry = f.debug_struct("MapEntry");
        entry.field("token", &self.token);
        #[cfg(any(test, feature = "testing"))]
        entry.field("original", &self.original);
        #[cfg(not(any(test, feature = "testing")))]
        entry.field("original", &REDACTED_DEBUG);
        entry.finish()
    }
}

/// Bidirectional placeholder association for one session.
#[derive(Default)]
pub struct RedactionMap {
    // Issue order.
    entries: Vec<MapEntry>,
    by_token: HashMap<String, usize>,
    by_value: HashMap<(EntityCategory, String), usize>,
}

impl RedactionMap {
    /// Number of issued placeholders.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no placeholder was issued.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves a rendered token to its original value.
    ///
    /// Matching is exact; only tokens this map issued resolve.
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.by_token
            .get(token)
            .map(|&index| self.entries[index].original.as_str())
    }

    /// Resolves a placeholder to its original value.
    pub fn get(&self, placeholder: &Placeholder) -> Option<&str> {
        self.resolve(&placeholder.token())
    }

    /// Returns the placeholder issued for `value` under `category`, if any.
    pub fn placeholder_for(&self, category: &EntityCategory, value: &str) -> Option<&Placeholder> {
        // Keyed by owned pairs; the lookup allocates once per call.
        self.by_value
            .get(&(category.clone(), value.to_owned()))
            .map(|&index| &self.entries[index].placeholder)
    }

    /// Returns `true` if any placeholder of `category` was issued.
    pub fn contains_category(&self, category: &EntityCategory) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.placeholder.category() == category)
    }

    /// Iterates over entries in issue order.
    pub fn iter(&self) -> impl Iterator<Item = &MapEntry> {
        self.entries.iter()
    }

    /// Records a freshly minted placeholder.
    pub(crate) fn insert(&mut self, placeholder: Placeholder, original: String) {
        let index = self.entries.len();
        let token = placeholder.token();
        self.by_token.insert(token.clone(), index);
        self.by_value
            .insert((placeholder.category().clone(), original.clone()), index);
        self.entries.push(MapEntry {
            placeholder,
            token,
            original,
        });
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.by_token.clear();
        self.by_value.clear();
    }
}

impl<'a> IntoIterator for &'a RedactionMap {
    type Item = &'a MapEntry;
    type IntoIter = std::slice::Iter<'a, MapEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Debug for RedactionMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.entries).finish()
    }
}
