//! Session-scoped placeholder allocation.
//!
//! The allocator owns the per-category slot counters and the map under
//! construction. Nothing here is global: every counter lives in one allocator
//! and an allocator lives for one session. Hosts that pool allocators must
//! call [`PlaceholderAllocator::reset`] before reuse.

use std::collections::{HashMap, HashSet};

use crate::{
    category::EntityCategory,
    config::DEFAULT_MAX_SLOTS_PER_CATEGORY,
    error::RedactionError,
    map::RedactionMap,
    placeholder::{tokens_in, Placeholder, Slot},
};

/// Assigns stable placeholders to `(category, value)` pairs.
#[derive(Debug)]
pub struct PlaceholderAllocator {
    map: RedactionMap,
    next_slot: HashMap<EntityCategory, u32>,
    // Tokens already present in the source text; never issued.
    reserved: HashSet<String>,
    limit: u32,
}

impl PlaceholderAllocator {
    /// Creates an allocator with the default per-category slot limit.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_SLOTS_PER_CATEGORY)
    }

    /// Creates an allocator that issues at most `limit` slots per category.
    pub fn with_limit(limit: u32) -> Self {
        Self {
            map: RedactionMap::default(),
            next_slot: HashMap::new(),
            reserved: HashSet::new(),
            limit,
        }
    }

    /// Reserves every well-formed token already present in `source`.
    ///
    /// A reserved token is skipped during allocation, so text the user typed
    /// that happens to look like a placeholder is never confused with one
    /// this session issued.
    #[must_use]
    pub fn reserving_tokens_in(mut self, source: &str) -> Self {
        self.reserved.extend(tokens_in(source).map(ToOwned::to_owned));
        self
    }

    /// Returns the placeholder for `(category, value)`, minting one if needed.
    ///
    /// Repeated calls with an identical value and category return the same
    /// placeholder. New values take the next unused slot of their category.
    pub fn allocate(
        &mut self,
        category: &EntityCategory,
        value: &str,
    ) -> Result<Placeholder, RedactionError> {
        if let Some(existing) = self.map.placeholder_for(category, value) {
            return Ok(existing.clone());
        }

        let next = self.next_slot.entry(category.clone()).or_insert(0);
        loop {
            if *next >= self.limit {
                return Err(RedactionError::AllocationExhausted {
                    category: category.clone(),
                    limit: self.limit,
                });
            }
            let placeholder = Placeholder::new(category.clone(), Slot::new(*next));
            *next += 1;
            if self.reserved.contains(&placeholder.token()) {
                continue;
            }
            self.map.insert(placeholder.clone(), value.to_owned());
            return Ok(placeholder);
        }
    }

    /// The map built so far.
    pub fn map(&self) -> &RedactionMap {
        &self.map
    }

    /// Clears counters, reservations, and entries for reuse in a new session.
    pub fn reset(&mut self) {
        self.map.clear();
        self.next_slot.clear();
        self.reserved.clear();
    }

    /// Finishes allocation and hands out the read-only map.
    pub fn into_map(self) -> RedactionMap {
        self.map
    }
}

impl Default for PlaceholderAllocator {
    fn default() -> Self {
        Self::new()
    }
}
